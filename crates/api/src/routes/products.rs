//! Route definitions for the `/products` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /        -> list_products (?network_link_id=&limit=&offset=)
/// POST   /        -> create_product (staff)
/// GET    /{id}    -> get_product
/// PUT    /{id}    -> update_product (staff)
/// DELETE /{id}    -> delete_product (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}
