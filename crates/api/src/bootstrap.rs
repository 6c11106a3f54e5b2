//! Startup seeding of the first staff account.

use tradenet_db::models::user::CreateUser;
use tradenet_db::repositories::UserRepo;
use tradenet_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Bootstrap admin password rejected: {0}")]
    WeakPassword(String),

    #[error("Password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Create the configured staff user unless a user with that email exists.
///
/// Returns `true` when a user was created. An existing user is left as is,
/// including its password.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> Result<bool, BootstrapError> {
    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::debug!(email = %admin.email, "Bootstrap admin already present");
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(BootstrapError::WeakPassword)?;
    let password_hash = hash_password(&admin.password).map_err(BootstrapError::Hash)?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: admin.email.clone(),
            password_hash,
            is_staff: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
