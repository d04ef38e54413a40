//! Order entities and the checkout request shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lotus_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A placed order. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Customer snapshot taken at checkout, not joined back to the user row.
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A line item of a placed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Price at time of purchase, decoupled from the live product price.
    pub price: Decimal,
}

/// Order with its line items, as served to the admin order list.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One line of a checkout request.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutLine {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Price at time of checkout, recorded on the order item.
    pub price: Decimal,
}

/// A checkout request: the user's cart lines plus a customer snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub items: Vec<CheckoutLine>,
    pub total: Decimal,
}
