//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (`Option` fields) for patches

pub mod address;
pub mod network_link;
pub mod product;
pub mod user;
