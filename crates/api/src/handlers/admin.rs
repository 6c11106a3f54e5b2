//! Staff-only debt actions on network links.
//!
//! These are the only paths that may change `debt_to_supplier`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradenet_core::error::CoreError;
use tradenet_core::network_link::{with_debt_scale, FIELD_DEBT};
use tradenet_core::types::DbId;
use tradenet_core::validation::ValidationErrors;
use tradenet_db::repositories::NetworkLinkRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::request::{JsonBody, MSG_REQUIRED};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /admin/network_links/clear-debt`.
#[derive(Debug, Deserialize, Validate)]
pub struct ClearDebtRequest {
    #[validate(length(min = 1, message = "This field cannot be empty."))]
    pub ids: Vec<DbId>,
}

/// Result of a bulk debt reset.
#[derive(Debug, Serialize)]
pub struct ClearDebtResponse {
    pub updated: u64,
}

/// Debt of one link after a direct update.
#[derive(Debug, Serialize)]
pub struct DebtResponse {
    pub id: DbId,
    pub debt_to_supplier: Decimal,
}

/// Body of `PUT /admin/network_links/{id}/debt`.
#[derive(Debug, Deserialize, Validate)]
pub struct SetDebtRequest {
    pub debt_to_supplier: Option<Decimal>,
}

/// POST /api/v1/admin/network_links/clear-debt
///
/// Reset the debt of every listed link to zero. Unknown ids are skipped.
pub async fn clear_debt(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    let input: ClearDebtRequest = body.parse()?;
    let updated = NetworkLinkRepo::clear_debt(&state.pool, &input.ids).await?;

    tracing::info!(
        requested = input.ids.len(),
        updated,
        user_id = staff.id,
        "Debt cleared",
    );

    Ok(Json(DataResponse {
        data: ClearDebtResponse { updated },
    }))
}

/// PUT /api/v1/admin/network_links/{id}/debt
///
/// Set the debt directly. The record rules still apply, so a negative
/// amount is rejected.
pub async fn set_debt(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: JsonBody,
) -> AppResult<impl IntoResponse> {
    let input: SetDebtRequest = body.parse()?;
    let debt = input
        .debt_to_supplier
        .ok_or_else(|| AppError::from(ValidationErrors::field(FIELD_DEBT, MSG_REQUIRED)))?;

    let link = NetworkLinkRepo::set_debt(&state.pool, id, debt)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NetworkLink",
            id,
        }))?;

    tracing::info!(
        network_link_id = id,
        debt_to_supplier = %link.debt_to_supplier,
        user_id = staff.id,
        "Debt set",
    );

    Ok(Json(DataResponse {
        data: DebtResponse {
            id: link.id,
            debt_to_supplier: with_debt_scale(link.debt_to_supplier),
        },
    }))
}
