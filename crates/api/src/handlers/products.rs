//! Handlers for the `/products` resource.
//!
//! Reads are open to any active user; writes require staff.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tradenet_core::error::CoreError;
use tradenet_core::types::DbId;
use tradenet_core::validation::ValidationErrors;
use tradenet_db::models::product::{CreateProduct, UpdateProduct};
use tradenet_db::repositories::{NetworkLinkRepo, ProductRepo};
use tradenet_db::DbPool;
use validator::Validate;

use super::report_missing_ids;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireActive, RequireStaff};
use crate::query::ProductListParams;
use crate::request::JsonBody;
use crate::response::DataResponse;
use crate::state::AppState;

const FIELD_NETWORK_LINKS: &str = "network_links";

/// Body of `POST /products`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub model: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub network_links: Vec<DbId>,
}

/// Body of `PUT /products/{id}`. Absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub model: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub network_links: Option<Vec<DbId>>,
}

async fn check_links_exist(pool: &DbPool, ids: &[DbId]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let existing = NetworkLinkRepo::existing_ids(pool, ids).await?;
    let mut errors = ValidationErrors::new();
    report_missing_ids(&mut errors, FIELD_NETWORK_LINKS, ids, &existing);
    Ok(errors.into_result()?)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

/// GET /api/v1/products
///
/// List products, optionally only those carried by one network link.
pub async fn list_products(
    RequireActive(_user): RequireActive,
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.page();
    let products =
        ProductRepo::list(&state.pool, params.network_link_id, limit, offset).await?;

    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
///
/// Retrieve a product with the ids of the links carrying it.
pub async fn get_product(
    RequireActive(_user): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id_with_links(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/products
pub async fn create_product(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    let input: CreateProductRequest = body.parse()?;
    check_links_exist(&state.pool, &input.network_links).await?;

    let create = CreateProduct {
        name: input.name,
        model: input.model,
        release_date: input.release_date,
        network_links: input.network_links,
    };
    let product = ProductRepo::create(&state.pool, &create).await?;

    tracing::info!(
        product_id = product.id,
        name = %product.name,
        user_id = staff.id,
        "Product created",
    );

    let product = ProductRepo::find_by_id_with_links(&state.pool, product.id)
        .await?
        .ok_or_else(|| not_found(product.id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/products/{id}
///
/// A present `network_links` list replaces the associations.
pub async fn update_product(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    let input: UpdateProductRequest = body.parse()?;
    if let Some(ref links) = input.network_links {
        check_links_exist(&state.pool, links).await?;
    }

    let update = UpdateProduct {
        name: input.name,
        model: input.model,
        release_date: input.release_date,
        network_links: input.network_links,
    };
    ProductRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(product_id = id, user_id = staff.id, "Product updated");

    let product = ProductRepo::find_by_id_with_links(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ProductRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(product_id = id, user_id = staff.id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}
