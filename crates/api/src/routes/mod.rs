pub mod admin;
pub mod auth;
pub mod health;
pub mod network_links;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                 login (public)
///
/// /network_links                              list, create (active user)
/// /network_links/{id}                         get, replace, patch, delete
///
/// /products                                   list (active user), create (staff)
/// /products/{id}                              get (active user), update, delete (staff)
///
/// /admin/network_links/clear-debt             reset debt of many links (staff)
/// /admin/network_links/{id}/debt              set debt of one link (staff)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/network_links", network_links::router())
        .nest("/products", products::router())
        .nest("/admin/network_links", admin::router())
}
