//! Order repository: the checkout transaction and admin order listing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use lotus_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::config::CartClearMode;
use crate::models::{CheckoutRequest, Order, OrderItem, OrderWithItems};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    customer_name: String,
    customer_phone: String,
    customer_address: String,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_address: row.customer_address,
            total: row.total,
            status,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert a cart into a durable order, atomically reconciling stock.
    ///
    /// Runs as a single transaction:
    /// 1. Insert the order in `pending` status.
    /// 2. Per line item: conditionally decrement the product's stock
    ///    (`stock = stock - q WHERE stock >= q`), then record the order
    ///    item. A failed decrement aborts the whole transaction - nothing
    ///    is committed.
    /// 3. Clear the user's cart per `clear` mode.
    ///
    /// The caller is responsible for publishing the new-order event, and
    /// must do so only after this function returns (publish-after-commit).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a line references a missing
    /// product.
    /// Returns `RepositoryError::InsufficientStock` if any line's quantity
    /// exceeds the product's live stock at commit time.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn place(
        &self,
        request: &CheckoutRequest,
        clear: CartClearMode,
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (order_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO store_order
                (user_id, customer_name, customer_phone, customer_address, total, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(request.user_id.as_i32())
        .bind(&request.customer_name)
        .bind(&request.customer_phone)
        .bind(&request.customer_address)
        .bind(request.total)
        .bind(OrderStatus::Pending.to_string())
        .fetch_one(&mut *tx)
        .await?;

        for line in &request.items {
            // Conditional decrement: only succeeds while enough stock
            // remains, so two concurrent checkouts can never drive the
            // counter negative.
            let decremented = sqlx::query(
                r"
                UPDATE product
                SET stock = stock - $2, updated_at = now()
                WHERE id = $1 AND stock >= $2
                ",
            )
            .bind(line.product_id.as_i32())
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                let live: Option<(i32,)> =
                    sqlx::query_as("SELECT stock FROM product WHERE id = $1")
                        .bind(line.product_id.as_i32())
                        .fetch_optional(&mut *tx)
                        .await?;

                // Dropping the transaction rolls back the order row and
                // every prior decrement.
                return match live {
                    None => Err(RepositoryError::NotFound),
                    Some((stock,)) => Err(RepositoryError::InsufficientStock {
                        available: stock,
                        held: line.quantity,
                    }),
                };
            }

            sqlx::query(
                r"
                INSERT INTO order_item (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(line.product_id.as_i32())
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        match clear {
            CartClearMode::All => {
                sqlx::query("DELETE FROM cart_item WHERE user_id = $1")
                    .bind(request.user_id.as_i32())
                    .execute(&mut *tx)
                    .await?;
            }
            CartClearMode::Ordered => {
                let product_ids: Vec<i32> = request
                    .items
                    .iter()
                    .map(|line| line.product_id.as_i32())
                    .collect();

                sqlx::query(
                    "DELETE FROM cart_item WHERE user_id = $1 AND product_id = ANY($2)",
                )
                .bind(request.user_id.as_i32())
                .bind(&product_ids)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }

    /// List every order with its line items, newest first (admin list).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is
    /// unknown.
    pub async fn list_with_items(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, customer_name, customer_phone, customer_address,
                   total, status, created_at
            FROM store_order
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let order_ids: Vec<i32> = order_rows.iter().map(|r| r.id).collect();

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, quantity, price
            FROM order_item
            WHERE order_id = ANY($1)
            ORDER BY id ASC
            ",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in order_rows {
            let id = row.id;
            orders.push(OrderWithItems {
                order: row.try_into()?,
                items: item_rows
                    .iter()
                    .filter(|item| item.order_id == id)
                    .map(|item| OrderItem {
                        id: OrderItemId::new(item.id),
                        order_id: OrderId::new(item.order_id),
                        product_id: ProductId::new(item.product_id),
                        quantity: item.quantity,
                        price: item.price,
                    })
                    .collect(),
            });
        }

        Ok(orders)
    }

    /// Get a single order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, customer_name, customer_phone, customer_address,
                   total, status, created_at
            FROM store_order
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, quantity, price
            FROM order_item
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems {
            order: row.try_into()?,
            items: items.into_iter().map(Into::into).collect(),
        }))
    }
}
