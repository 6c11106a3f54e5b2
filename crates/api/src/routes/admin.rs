//! Staff-only routes mounted at `/admin/network_links`.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// POST /clear-debt    -> clear_debt
/// PUT  /{id}/debt     -> set_debt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clear-debt", post(admin::clear_debt))
        .route("/{id}/debt", put(admin::set_debt))
}
