//! Repository for the `network_links`, `addresses` and
//! `network_link_products` tables.
//!
//! A link and its address are written in the same transaction. Every write
//! that can change the supplier or the debt runs
//! [`clean`](tradenet_core::network_link::clean) against the state about to
//! be committed and rolls back on failure.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use tradenet_core::hierarchy::SupplierGraph;
use tradenet_core::network_link::{check_supplier_cycle, clean, LinkState};
use tradenet_core::types::DbId;

use crate::error::DbError;
use crate::models::network_link::{
    CreateNetworkLink, NetworkLink, NetworkLinkFilter, UpdateNetworkLink,
};
use crate::models::product::{LinkedProduct, ProductSummary};

/// Column list for a link joined with its address.
const COLUMNS: &str = "nl.id, nl.name, nl.network_type, nl.email, nl.supplier_id, \
    nl.debt_to_supplier, nl.created_at, nl.updated_at, \
    a.country, a.city, a.street, a.house_number";

/// Join clause shared by every read.
const FROM_JOINED: &str = "network_links nl JOIN addresses a ON a.network_link_id = nl.id";

/// `pg_advisory_xact_lock` key held by every write that changes a supplier.
const SUPPLIER_CHAIN_LOCK: i64 = 0x6e65_7477_6f72_6b;

/// Column list for the `products` table (used in JOIN queries).
const PRODUCT_COLUMNS: &str = "p.id, p.name, p.model, p.release_date, p.created_at, p.updated_at";

/// Provides CRUD operations for network links.
pub struct NetworkLinkRepo;

impl NetworkLinkRepo {
    /// Insert a link, its address, and its product associations as one unit.
    pub async fn create(pool: &PgPool, input: &CreateNetworkLink) -> Result<NetworkLink, DbError> {
        clean(&LinkState {
            id: None,
            supplier: input.supplier_id,
            debt_to_supplier: Decimal::ZERO,
        })?;

        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO network_links (name, network_type, email, supplier_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.network_type.as_str())
        .bind(&input.email)
        .bind(input.supplier_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO addresses (network_link_id, country, city, street, house_number) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&input.address.country)
        .bind(&input.address.city)
        .bind(&input.address.street)
        .bind(&input.address.house_number)
        .execute(&mut *tx)
        .await?;

        if !input.product_ids.is_empty() {
            Self::set_products_inner(&mut tx, id, &input.product_ids).await?;
        }

        let link = Self::find_with(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok(link)
    }

    /// Find a link by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NetworkLink>, sqlx::Error> {
        Self::find_with(pool, id).await
    }

    /// Whether a link with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM network_links WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Subset of `ids` that exist, in ascending order.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM network_links WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List links matching `filter`, ordered by ID. Filters apply before
    /// `limit`/`offset`.
    pub async fn list(
        pool: &PgPool,
        filter: &NetworkLinkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NetworkLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} \
             WHERE ($1::TEXT IS NULL OR a.country = $1) \
               AND ($2::TEXT IS NULL OR a.city = $2) \
             ORDER BY nl.id \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, NetworkLink>(&query)
            .bind(&filter.country)
            .bind(&filter.city)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a link. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. Rejects (and
    /// rolls back) a supplier that is the link itself or that would close a
    /// supplier cycle.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNetworkLink,
    ) -> Result<Option<NetworkLink>, DbError> {
        let mut tx = pool.begin().await?;

        if input.supplier_id.is_some() {
            // Taken before the row lock: supplier changes check for cycles
            // one at a time.
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(SUPPLIER_CHAIN_LOCK)
                .execute(&mut *tx)
                .await?;
        }

        let current: Option<(Option<DbId>, Decimal)> = sqlx::query_as(
            "SELECT supplier_id, debt_to_supplier FROM network_links WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((current_supplier, debt)) = current else {
            return Ok(None);
        };

        let supplier = match input.supplier_id {
            Some(new_supplier) => new_supplier,
            None => current_supplier,
        };
        clean(&LinkState {
            id: Some(id),
            supplier,
            debt_to_supplier: debt,
        })?;

        if let Some(new_supplier) = supplier.filter(|_| supplier != current_supplier) {
            let graph = Self::ancestor_graph_with(&mut *tx, &[new_supplier]).await?;
            check_supplier_cycle(id, supplier, &graph)?;
        }

        sqlx::query(
            "UPDATE network_links SET \
                name = COALESCE($2, name), \
                network_type = COALESCE($3, network_type), \
                email = COALESCE($4, email), \
                supplier_id = $5 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.network_type.map(|t| t.as_str()))
        .bind(&input.email)
        .bind(supplier)
        .execute(&mut *tx)
        .await?;

        if let Some(ref address) = input.address {
            sqlx::query(
                "UPDATE addresses SET \
                    country = $2, city = $3, street = $4, house_number = $5 \
                 WHERE network_link_id = $1",
            )
            .bind(id)
            .bind(&address.country)
            .bind(&address.city)
            .bind(&address.street)
            .bind(&address.house_number)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(ref product_ids) = input.product_ids {
            Self::set_products_inner(&mut tx, id, product_ids).await?;
        }

        let link = Self::find_with(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(link)
    }

    /// Delete a link. Its address and product associations go with it;
    /// links it supplied keep existing with their supplier cleared.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM network_links WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Debt (privileged path only)
    // -----------------------------------------------------------------------

    /// Set the debt of a single link directly.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_debt(
        pool: &PgPool,
        id: DbId,
        debt: Decimal,
    ) -> Result<Option<NetworkLink>, DbError> {
        let mut tx = pool.begin().await?;

        let supplier: Option<Option<DbId>> =
            sqlx::query_scalar("SELECT supplier_id FROM network_links WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(supplier) = supplier else {
            return Ok(None);
        };

        clean(&LinkState {
            id: Some(id),
            supplier,
            debt_to_supplier: debt,
        })?;

        sqlx::query("UPDATE network_links SET debt_to_supplier = $2 WHERE id = $1")
            .bind(id)
            .bind(debt)
            .execute(&mut *tx)
            .await?;

        let link = Self::find_with(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(link)
    }

    /// Reset the debt of every listed link to zero.
    ///
    /// Returns the number of rows updated; unknown IDs are skipped.
    pub async fn clear_debt(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE network_links SET debt_to_supplier = 0 WHERE id = ANY($1)")
                .bind(ids)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Hierarchy
    // -----------------------------------------------------------------------

    /// Edges of `ids` and of every link up their supplier chains, for level
    /// computation. Unrelated links are not loaded.
    pub async fn ancestor_graph(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<SupplierGraph, sqlx::Error> {
        Self::ancestor_graph_with(pool, ids).await
    }

    // -----------------------------------------------------------------------
    // Product association helpers
    // -----------------------------------------------------------------------

    /// Products carried by a single link, ordered by product ID.
    pub async fn products_for(
        pool: &PgPool,
        network_link_id: DbId,
    ) -> Result<Vec<ProductSummary>, sqlx::Error> {
        let mut by_link = Self::products_for_many(pool, &[network_link_id]).await?;
        Ok(by_link.remove(&network_link_id).unwrap_or_default())
    }

    /// Products for several links at once, grouped by link ID. Links with no
    /// products are absent from the map.
    pub async fn products_for_many(
        pool: &PgPool,
        network_link_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<ProductSummary>>, sqlx::Error> {
        let query = format!(
            "SELECT nlp.network_link_id, {PRODUCT_COLUMNS} \
             FROM network_link_products nlp \
             JOIN products p ON p.id = nlp.product_id \
             WHERE nlp.network_link_id = ANY($1) \
             ORDER BY p.id"
        );
        let rows = sqlx::query_as::<_, LinkedProduct>(&query)
            .bind(network_link_ids)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<ProductSummary>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.network_link_id)
                .or_default()
                .push(row.product.into());
        }
        Ok(grouped)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn find_with<'e, E>(executor: E, id: DbId) -> Result<Option<NetworkLink>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE nl.id = $1");
        sqlx::query_as::<_, NetworkLink>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// `UNION` drops rows already produced, so the walk ends on a cycle too.
    async fn ancestor_graph_with<'e, E>(
        executor: E,
        ids: &[DbId],
    ) -> Result<SupplierGraph, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let edges: Vec<(DbId, Option<DbId>)> = sqlx::query_as(
            "WITH RECURSIVE chain (id, supplier_id) AS ( \
                SELECT id, supplier_id FROM network_links WHERE id = ANY($1) \
                UNION \
                SELECT nl.id, nl.supplier_id \
                FROM network_links nl JOIN chain c ON nl.id = c.supplier_id \
             ) \
             SELECT id, supplier_id FROM chain",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(SupplierGraph::from_edges(edges))
    }

    /// Replace product associations within an existing transaction.
    async fn set_products_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        network_link_id: DbId,
        product_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM network_link_products WHERE network_link_id = $1")
            .bind(network_link_id)
            .execute(&mut **tx)
            .await?;

        for &product_id in product_ids {
            sqlx::query(
                "INSERT INTO network_link_products (network_link_id, product_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(network_link_id)
            .bind(product_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
