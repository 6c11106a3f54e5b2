//! Route definitions for the `/network_links` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::network_links;
use crate::state::AppState;

/// Routes mounted at `/network_links`.
///
/// ```text
/// GET    /        -> list_network_links (?country=&city=&limit=&offset=)
/// POST   /        -> create_network_link
/// GET    /{id}    -> get_network_link
/// PUT    /{id}    -> replace_network_link
/// PATCH  /{id}    -> patch_network_link
/// DELETE /{id}    -> delete_network_link
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(network_links::list_network_links).post(network_links::create_network_link),
        )
        .route(
            "/{id}",
            get(network_links::get_network_link)
                .put(network_links::replace_network_link)
                .patch(network_links::patch_network_link)
                .delete(network_links::delete_network_link),
        )
}
