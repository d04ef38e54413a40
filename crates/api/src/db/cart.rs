//! Cart repository: admission control and quantity adjustment.
//!
//! Every stock-sensitive path locks the product row (`FOR UPDATE`) for the
//! duration of its read-check-write sequence, so a concurrent checkout can
//! never invalidate an observed stock value before the dependent write
//! lands.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use lotus_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{CartItem, CartLineView};

/// Internal row type for cart item queries.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for the cart page (product data joined in).
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    product_id: i32,
    name: String,
    price: Decimal,
    image: String,
    stock: i32,
    quantity: i32,
}

impl From<CartLineRow> for CartLineView {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            price: row.price,
            image: row.image,
            stock: row.stock,
            quantity: row.quantity,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add `quantity` units of a product to a user's cart, honoring live
    /// stock.
    ///
    /// The candidate total is the existing cart quantity plus the request.
    /// Stock is only checked here, never decremented - that happens at
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::InsufficientStock` if the candidate total
    /// exceeds live stock (no mutation in that case).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let stock = lock_product_stock(&mut tx, product_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let held: Option<(i32,)> = sqlx::query_as(
            r"
            SELECT quantity FROM cart_item
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let held = held.map_or(0, |(q,)| q);
        let candidate = held + quantity;

        if candidate > stock {
            return Err(RepositoryError::InsufficientStock {
                available: stock,
                held,
            });
        }

        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            INSERT INTO cart_item (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = now()
            RETURNING id, user_id, product_id, quantity, created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(candidate)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Set a cart row to an exact quantity.
    ///
    /// A requested quantity of zero or less deletes the row (removal
    /// semantics, not an error) and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart row doesn't exist.
    /// Returns `RepositoryError::InsufficientStock` if the requested
    /// quantity exceeds the owning product's live stock.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        id: CartItemId,
        quantity: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        if quantity <= 0 {
            let removed = self.remove(id).await?;
            if !removed {
                return Err(RepositoryError::NotFound);
            }
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;

        let line: Option<(i32, i32)> = sqlx::query_as(
            r"
            SELECT ci.product_id, ci.quantity
            FROM cart_item ci
            WHERE ci.id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let (product_id, held) = line.ok_or(RepositoryError::NotFound)?;

        let stock = lock_product_stock(&mut tx, ProductId::new(product_id))
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if quantity > stock {
            return Err(RepositoryError::InsufficientStock {
                available: stock,
                held,
            });
        }

        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            UPDATE cart_item
            SET quantity = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, product_id, quantity, created_at, updated_at
            ",
        )
        .bind(id.as_i32())
        .bind(quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }

    /// List a user's cart lines joined with live product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartLineView>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id, ci.product_id, p.name, p.price, p.image, p.stock, ci.quantity
            FROM cart_item ci
            INNER JOIN product p ON p.id = ci.product_id
            WHERE ci.user_id = $1
            ORDER BY ci.id ASC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Remove a cart row.
    ///
    /// # Returns
    ///
    /// Returns `true` if the row was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_item WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Lock a product row and return its live stock, or `None` if the product
/// doesn't exist.
async fn lock_product_stock(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: ProductId,
) -> Result<Option<i32>, RepositoryError> {
    let row: Option<(i32,)> = sqlx::query_as(
        r"
        SELECT stock FROM product
        WHERE id = $1
        FOR UPDATE
        ",
    )
    .bind(product_id.as_i32())
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|(stock,)| stock))
}
