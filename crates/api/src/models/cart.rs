//! Cart line entities and views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use lotus_core::{CartItemId, ProductId, UserId};

/// A pending cart line: one row per (user, product).
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart line joined with live product data, as served to the cart page.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub stock: i32,
    pub quantity: i32,
}
