//! Network link entity model and DTOs.
//!
//! A link's row is always read joined with its owned address, so
//! [`NetworkLink`] carries the address columns inline. The derived `level`
//! and the product list are attached when building [`NetworkLinkDetail`].

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use tradenet_core::network_link::with_debt_scale;
use tradenet_core::network_type::NetworkType;
use tradenet_core::types::{DbId, Timestamp};

use super::address::Address;
use super::product::ProductSummary;

/// A `network_links` row joined with its `addresses` row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct NetworkLink {
    pub id: DbId,
    pub name: String,
    pub network_type: String,
    pub email: String,
    pub supplier_id: Option<DbId>,
    pub debt_to_supplier: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub country: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
}

impl NetworkLink {
    pub fn address(&self) -> Address {
        Address {
            country: self.country.clone(),
            city: self.city.clone(),
            street: self.street.clone(),
            house_number: self.house_number.clone(),
        }
    }
}

/// API representation of a link: nested address, derived level, and the
/// products it carries.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkLinkDetail {
    pub id: DbId,
    pub name: String,
    pub network_type: String,
    pub level: u32,
    pub email: String,
    pub address: Address,
    pub supplier: Option<DbId>,
    pub debt_to_supplier: Decimal,
    pub created_at: Timestamp,
    pub products: Vec<ProductSummary>,
}

impl NetworkLinkDetail {
    pub fn new(link: NetworkLink, level: u32, products: Vec<ProductSummary>) -> Self {
        let address = link.address();
        Self {
            id: link.id,
            name: link.name,
            network_type: link.network_type,
            level,
            email: link.email,
            address,
            supplier: link.supplier_id,
            debt_to_supplier: with_debt_scale(link.debt_to_supplier),
            created_at: link.created_at,
            products,
        }
    }
}

/// Row-level filters for listing links. `None` means "no filter".
#[derive(Debug, Clone, Default)]
pub struct NetworkLinkFilter {
    /// Exact match on the address country.
    pub country: Option<String>,
    /// Exact match on the address city.
    pub city: Option<String>,
}

/// DTO for inserting a link together with its address.
///
/// The debt always starts at the column default.
#[derive(Debug, Clone)]
pub struct CreateNetworkLink {
    pub name: String,
    pub network_type: NetworkType,
    pub email: String,
    pub address: Address,
    pub supplier_id: Option<DbId>,
    pub product_ids: Vec<DbId>,
}

/// DTO for updating a link. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateNetworkLink {
    pub name: Option<String>,
    pub network_type: Option<NetworkType>,
    pub email: Option<String>,
    /// Already merged with the stored address.
    pub address: Option<Address>,
    /// `Some(None)` clears the supplier.
    pub supplier_id: Option<Option<DbId>>,
    /// If `Some`, replaces all product associations.
    pub product_ids: Option<Vec<DbId>>,
}
