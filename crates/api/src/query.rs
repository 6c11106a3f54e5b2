//! Query parameter types for list endpoints.
//!
//! Pagination fields are declared on each struct rather than flattened:
//! `serde(flatten)` cannot parse numbers out of a query string.

use serde::Deserialize;
use tradenet_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use tradenet_core::types::DbId;
use tradenet_db::models::network_link::NetworkLinkFilter;

/// `(limit, offset)` clamped to the allowed range.
fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(offset),
    )
}

/// `GET /network_links?country=&city=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct NetworkLinkListParams {
    /// Exact match on the address country. Empty means no filter.
    pub country: Option<String>,
    /// Exact match on the address city. Empty means no filter.
    pub city: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl NetworkLinkListParams {
    pub fn page(&self) -> (i64, i64) {
        page(self.limit, self.offset)
    }

    /// Row filter; `?country=` is treated the same as no `country` at all.
    pub fn filter(&self) -> NetworkLinkFilter {
        NetworkLinkFilter {
            country: non_empty(&self.country),
            city: non_empty(&self.city),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// `GET /products?network_link_id=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub network_link_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProductListParams {
    pub fn page(&self) -> (i64, i64) {
        page(self.limit, self.offset)
    }
}
