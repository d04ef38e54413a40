//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use lotus_core::{CategoryId, ProductId, PublishStatus};

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductUpdate, ProductWithCategory};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    description: String,
    image: String,
    status: i16,
    category_id: Option<i32>,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            description: row.description,
            image: row.image,
            status: PublishStatus::from_i16(row.status),
            category_id: row.category_id.map(CategoryId::new),
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for the list path (category name joined in).
#[derive(Debug, sqlx::FromRow)]
struct ProductWithCategoryRow {
    id: i32,
    name: String,
    price: Decimal,
    description: String,
    image: String,
    status: i16,
    category_id: Option<i32>,
    category_name: Option<String>,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductWithCategoryRow> for ProductWithCategory {
    fn from(row: ProductWithCategoryRow) -> Self {
        Self {
            product: Product {
                id: ProductId::new(row.id),
                name: row.name,
                price: row.price,
                description: row.description,
                image: row.image,
                status: PublishStatus::from_i16(row.status),
                category_id: row.category_id.map(CategoryId::new),
                stock: row.stock,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            category_name: row.category_name,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product")
            .fetch_one(self.pool)
            .await?;
        Ok(total)
    }

    /// List one page of products, newest first, with category names joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_page(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductWithCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductWithCategoryRow>(
            r"
            SELECT
                p.id, p.name, p.price, p.description, p.image, p.status,
                p.category_id, c.name AS category_name,
                p.stock, p.created_at, p.updated_at
            FROM product p
            LEFT JOIN category c ON c.id = p.category_id
            ORDER BY p.id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, description, image, status,
                   category_id, stock, created_at, updated_at
            FROM product
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product. Bumps the owning category's denormalized product
    /// count in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO product (name, price, description, image, status, category_id, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, price, description, image, status,
                      category_id, stock, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image)
        .bind(input.status.as_i16())
        .bind(input.category_id.map(|id| id.as_i32()))
        .bind(input.stock)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(category_id) = input.category_id {
            adjust_product_count(&mut tx, category_id, 1).await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }

    /// Update a product, returning the previous row so the caller can
    /// reconcile replaced image files.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductUpdate,
    ) -> Result<(Product, Product), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let old = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, price, description, image, status,
                   category_id, stock, created_at, updated_at
            FROM product
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let updated = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE product
            SET name = $2, price = $3, description = $4, image = $5,
                status = $6, category_id = $7, stock = $8, updated_at = now()
            WHERE id = $1
            RETURNING id, name, price, description, image, status,
                      category_id, stock, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image)
        .bind(input.status.as_i16())
        .bind(input.category_id.map(|id| id.as_i32()))
        .bind(input.stock)
        .fetch_one(&mut *tx)
        .await?;

        // Keep the denormalized counts in step when a product moves category.
        let old_category = old.category_id.map(CategoryId::new);
        if old_category != input.category_id {
            if let Some(prev) = old_category {
                adjust_product_count(&mut tx, prev, -1).await?;
            }
            if let Some(next) = input.category_id {
                adjust_product_count(&mut tx, next, 1).await?;
            }
        }

        tx.commit().await?;

        Ok((old.into(), updated.into()))
    }

    /// Delete a product, returning the deleted row so the caller can remove
    /// its image files.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            DELETE FROM product
            WHERE id = $1
            RETURNING id, name, price, description, image, status,
                      category_id, stock, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if let Some(category_id) = row.category_id {
            adjust_product_count(&mut tx, CategoryId::new(category_id), -1).await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }
}

/// Shift a category's denormalized product count, clamping at zero.
async fn adjust_product_count(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    category_id: CategoryId,
    delta: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE category
        SET product_count = GREATEST(product_count + $2, 0)
        WHERE id = $1
        ",
    )
    .bind(category_id.as_i32())
    .bind(delta)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
