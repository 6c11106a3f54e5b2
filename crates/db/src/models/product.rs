//! Product entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tradenet_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub model: String,
    pub release_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Product as embedded in a network link representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: DbId,
    pub name: String,
    pub model: String,
    pub release_date: NaiveDate,
}

impl From<Product> for ProductSummary {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            model: p.model,
            release_date: p.release_date,
        }
    }
}

/// A product paired with the links that distribute it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithLinks {
    #[serde(flatten)]
    pub product: Product,
    pub network_links: Vec<DbId>,
}

/// Product row tagged with one network link carrying it (junction join).
#[derive(Debug, Clone, FromRow)]
pub struct LinkedProduct {
    pub network_link_id: DbId,
    #[sqlx(flatten)]
    pub product: Product,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub model: String,
    pub release_date: NaiveDate,
    /// Links that distribute this product.
    #[serde(default)]
    pub network_links: Vec<DbId>,
}

/// DTO for updating a product. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub model: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// If `Some`, replaces all link associations. If `None`, leaves unchanged.
    pub network_links: Option<Vec<DbId>>,
}
