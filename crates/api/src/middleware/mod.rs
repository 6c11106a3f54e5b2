//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Decodes the JWT Bearer token.
//! - [`rbac::RequireActive`] -- Requires a user that still exists and is active.
//! - [`rbac::RequireStaff`] -- Requires an active staff user.

pub mod auth;
pub mod rbac;
