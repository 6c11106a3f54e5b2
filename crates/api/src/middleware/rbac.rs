//! Access-control extractors.
//!
//! Both extractors reload the user row, so deactivating a user or revoking
//! staff takes effect on the next request even while old tokens are valid.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tradenet_core::error::CoreError;
use tradenet_db::models::user::User;
use tradenet_db::repositories::UserRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an authenticated user whose row still exists and is active.
///
/// Unknown users are rejected with 401, inactive ones with 403.
///
/// ```ignore
/// async fn list(RequireActive(user): RequireActive) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireActive(pub User);

impl FromRequestParts<AppState> for RequireActive {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let user = UserRepo::find_by_id(&state.pool, auth.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;

        if !user.is_active {
            return Err(AppError::Core(CoreError::Forbidden(
                "User account is inactive".into(),
            )));
        }
        Ok(RequireActive(user))
    }
}

/// Requires an active user with the staff flag set. Rejects with 403
/// otherwise.
pub struct RequireStaff(pub User);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireActive(user) = RequireActive::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff access required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
