//! Pure domain logic for the supply-network back office.
//!
//! Nothing in this crate touches the database or the network; the `db` and
//! `api` crates call into it to compute hierarchy levels and to validate
//! records before they are persisted.

pub mod error;
pub mod hierarchy;
pub mod network_link;
pub mod network_type;
pub mod pagination;
pub mod types;
pub mod validation;
