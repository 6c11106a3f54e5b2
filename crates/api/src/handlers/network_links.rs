//! Handlers for the `/network_links` resource.
//!
//! Every write runs the request guards (debt field, empty product list,
//! referenced ids) here; the repository re-runs the record rules inside its
//! transaction before committing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tradenet_core::error::CoreError;
use tradenet_core::network_link::{
    reject_debt_field, require_products, FIELD_PRODUCTS, FIELD_SUPPLIER,
};
use tradenet_core::network_type::NetworkType;
use tradenet_core::types::DbId;
use tradenet_core::validation::ValidationErrors;
use tradenet_db::models::address::{Address, AddressPatch};
use tradenet_db::models::network_link::{
    CreateNetworkLink, NetworkLink, NetworkLinkDetail, UpdateNetworkLink,
};
use tradenet_db::repositories::{NetworkLinkRepo, ProductRepo};
use tradenet_db::DbPool;
use validator::Validate;

use super::{does_not_exist, report_missing_ids};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireActive;
use crate::query::NetworkLinkListParams;
use crate::request::{deserialize_some, JsonBody, MSG_REQUIRED};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /network_links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateNetworkLinkRequest {
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub name: String,
    #[serde(default)]
    pub network_type: NetworkType,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(nested)]
    pub address: Address,
    #[serde(default)]
    pub supplier: Option<DbId>,
    #[serde(default)]
    pub products: Vec<DbId>,
}

/// Body of `PUT` and `PATCH /network_links/{id}`.
///
/// `supplier` distinguishes absent (`None`) from `null` (`Some(None)`).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateNetworkLinkRequest {
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub name: Option<String>,
    pub network_type: Option<NetworkType>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub address: Option<AddressPatch>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub supplier: Option<Option<DbId>>,
    pub products: Option<Vec<DbId>>,
}

impl UpdateNetworkLinkRequest {
    /// Fields a full update must carry.
    fn missing_required(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.is_none() {
            errors.add_field("name", MSG_REQUIRED);
        }
        if self.email.is_none() {
            errors.add_field("email", MSG_REQUIRED);
        }
        if self.address.is_none() {
            errors.add_field("address", MSG_REQUIRED);
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Representation
// ---------------------------------------------------------------------------

/// Attach level and products to a single link.
async fn to_detail(pool: &DbPool, link: NetworkLink) -> AppResult<NetworkLinkDetail> {
    let graph = NetworkLinkRepo::ancestor_graph(pool, &[link.id]).await?;
    let products = NetworkLinkRepo::products_for(pool, link.id).await?;
    let level = graph.level(link.id);
    Ok(NetworkLinkDetail::new(link, level, products))
}

/// Attach level and products to a page of links, loading the page's supplier
/// chains and product associations once.
async fn to_details(pool: &DbPool, links: Vec<NetworkLink>) -> AppResult<Vec<NetworkLinkDetail>> {
    if links.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<DbId> = links.iter().map(|l| l.id).collect();
    let graph = NetworkLinkRepo::ancestor_graph(pool, &ids).await?;
    let mut products = NetworkLinkRepo::products_for_many(pool, &ids).await?;

    Ok(links
        .into_iter()
        .map(|link| {
            let level = graph.level(link.id);
            let carried = products.remove(&link.id).unwrap_or_default();
            NetworkLinkDetail::new(link, level, carried)
        })
        .collect())
}

/// Check that a referenced supplier and every referenced product exist.
async fn check_references(
    pool: &DbPool,
    errors: &mut ValidationErrors,
    supplier: Option<DbId>,
    products: &[DbId],
) -> AppResult<()> {
    if let Some(supplier) = supplier {
        if !NetworkLinkRepo::exists(pool, supplier).await? {
            errors.add_field(FIELD_SUPPLIER, does_not_exist(supplier));
        }
    }
    if !products.is_empty() {
        let existing = ProductRepo::existing_ids(pool, products).await?;
        report_missing_ids(errors, FIELD_PRODUCTS, products, &existing);
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "NetworkLink",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/network_links
///
/// List links, optionally filtered by exact address country and/or city.
pub async fn list_network_links(
    RequireActive(_user): RequireActive,
    State(state): State<AppState>,
    Query(params): Query<NetworkLinkListParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.page();
    let links = NetworkLinkRepo::list(&state.pool, &params.filter(), limit, offset).await?;
    let details = to_details(&state.pool, links).await?;

    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/network_links/{id}
pub async fn get_network_link(
    RequireActive(_user): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let link = NetworkLinkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse {
        data: to_detail(&state.pool, link).await?,
    }))
}

/// POST /api/v1/network_links
///
/// Create a link with its address and product associations. The debt
/// starts at zero and cannot be supplied.
pub async fn create_network_link(
    RequireActive(user): RequireActive,
    State(state): State<AppState>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    reject_debt_field(&body.0)?;
    let input: CreateNetworkLinkRequest = body.parse()?;

    let mut errors = ValidationErrors::new();
    check_references(&state.pool, &mut errors, input.supplier, &input.products).await?;
    errors.into_result()?;

    let create = CreateNetworkLink {
        name: input.name,
        network_type: input.network_type,
        email: input.email,
        address: input.address,
        supplier_id: input.supplier,
        product_ids: input.products,
    };
    let link = NetworkLinkRepo::create(&state.pool, &create).await?;

    tracing::info!(
        network_link_id = link.id,
        network_type = %link.network_type,
        user_id = user.id,
        "Network link created",
    );

    let detail = to_detail(&state.pool, link).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/network_links/{id}
///
/// Full update: `name`, `email` and `address` must be present.
pub async fn replace_network_link(
    user: RequireActive,
    state: State<AppState>,
    path: Path<DbId>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    update_network_link(user, state, path, body, false).await
}

/// PATCH /api/v1/network_links/{id}
///
/// Partial update: absent fields keep their stored value.
pub async fn patch_network_link(
    user: RequireActive,
    state: State<AppState>,
    path: Path<DbId>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    update_network_link(user, state, path, body, true).await
}

async fn update_network_link(
    RequireActive(user): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: JsonBody,
    partial: bool,
) -> AppResult<Json<DataResponse<NetworkLinkDetail>>> {
    reject_debt_field(&body.0)?;
    let input: UpdateNetworkLinkRequest = body.parse()?;

    let mut errors = if partial {
        ValidationErrors::new()
    } else {
        input.missing_required()
    };
    if let Err(empty) = require_products(input.products.as_deref()) {
        errors.merge(empty);
    }
    errors.into_result()?;

    let current = NetworkLinkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut errors = ValidationErrors::new();
    let address = match input.address {
        Some(patch) => {
            let merged = patch.apply(current.address());
            if let Err(invalid) = merged.validate() {
                errors.merge(ValidationErrors::from(invalid).nested("address"));
            }
            Some(merged)
        }
        None => None,
    };
    check_references(
        &state.pool,
        &mut errors,
        input.supplier.flatten().filter(|s| *s != id),
        input.products.as_deref().unwrap_or_default(),
    )
    .await?;
    errors.into_result()?;

    let update = UpdateNetworkLink {
        name: input.name,
        network_type: input.network_type,
        email: input.email,
        address,
        supplier_id: input.supplier,
        product_ids: input.products,
    };
    let link = NetworkLinkRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(network_link_id = id, user_id = user.id, partial, "Network link updated");

    Ok(Json(DataResponse {
        data: to_detail(&state.pool, link).await?,
    }))
}

/// DELETE /api/v1/network_links/{id}
///
/// Links supplied by the deleted one keep existing with no supplier.
pub async fn delete_network_link(
    RequireActive(user): RequireActive,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = NetworkLinkRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(network_link_id = id, user_id = user.id, "Network link deleted");

    Ok(StatusCode::NO_CONTENT)
}
