//! Repository for the `products` table and its link associations.

use sqlx::PgPool;
use tradenet_core::types::DbId;

use crate::models::product::{CreateProduct, Product, ProductWithLinks, UpdateProduct};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, model, release_date, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product and its link associations in a transaction.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO products (name, model, release_date) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.model)
            .bind(input.release_date)
            .fetch_one(&mut *tx)
            .await?;

        if !input.network_links.is_empty() {
            Self::set_links_inner(&mut tx, product.id, &input.network_links).await?;
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Find a product by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by ID, enriched with the IDs of links carrying it.
    pub async fn find_by_id_with_links(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithLinks>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(product) => {
                let network_links = Self::link_ids_for(pool, product.id).await?;
                Ok(Some(ProductWithLinks {
                    product,
                    network_links,
                }))
            }
            None => Ok(None),
        }
    }

    /// List products ordered by ID, optionally only those carried by one link.
    pub async fn list(
        pool: &PgPool,
        network_link_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products p \
             WHERE $1::BIGINT IS NULL OR EXISTS ( \
                 SELECT 1 FROM network_link_products nlp \
                 WHERE nlp.product_id = p.id AND nlp.network_link_id = $1) \
             ORDER BY id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(network_link_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Subset of `ids` that exist, in ascending order.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM products WHERE id = ANY($1) ORDER BY id")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Update a product. Only non-`None` fields are applied.
    ///
    /// If `network_links` is `Some`, replaces link associations.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                model = COALESCE($3, model), \
                release_date = COALESCE($4, release_date) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.model)
            .bind(input.release_date)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref product) = product {
            if let Some(ref link_ids) = input.network_links {
                Self::set_links_inner(&mut tx, product.id, link_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(product)
    }

    /// Delete a product. Its link associations are removed by cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// IDs of the links carrying a product, ascending.
    pub async fn link_ids_for(pool: &PgPool, product_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT network_link_id FROM network_link_products \
             WHERE product_id = $1 \
             ORDER BY network_link_id",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
    }

    /// Replace link associations within an existing transaction.
    async fn set_links_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: DbId,
        network_link_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM network_link_products WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        for &network_link_id in network_link_ids {
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
