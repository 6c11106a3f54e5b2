//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod network_link_repo;
pub mod product_repo;
pub mod user_repo;

pub use network_link_repo::NetworkLinkRepo;
pub use product_repo::ProductRepo;
pub use user_repo::UserRepo;
