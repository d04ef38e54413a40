//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use lotus_core::{CategoryId, PublishStatus};

use super::RepositoryError;
use crate::models::Category;

/// Internal row type for category queries.
#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    icon: String,
    status: i16,
    product_count: i32,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            icon: row.icon,
            status: PublishStatus::from_i16(row.status),
            product_count: row.product_count,
            created_at: row.created_at,
        }
    }
}

/// Fields for creating or updating a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub icon: String,
    pub status: PublishStatus,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every category, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, icon, status, product_count, created_at
            FROM category
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count categories matching an optional name filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError> {
        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM category
            WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'
            ",
        )
        .bind(search)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    /// List one page of categories matching an optional name filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, icon, status, product_count, created_at
            FROM category
            WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO category (name, icon, status)
            VALUES ($1, $2, $3)
            RETURNING id, name, icon, status, product_count, created_at
            ",
        )
        .bind(&input.name)
        .bind(&input.icon)
        .bind(input.status.as_i16())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE category
            SET name = $2, icon = $3, status = $4
            WHERE id = $1
            RETURNING id, name, icon, status, product_count, created_at
            ",
        )
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(&input.icon)
        .bind(input.status.as_i16())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a category. Products referencing it fall back to NULL via the
    /// `ON DELETE SET NULL` foreign key.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Recompute every category's denormalized product count from scratch.
    ///
    /// Used by the CLI to repair drift; the request path maintains the
    /// counts incrementally.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recount_products(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE category c
            SET product_count = (
                SELECT COUNT(*) FROM product p WHERE p.category_id = c.id
            )
            ",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
