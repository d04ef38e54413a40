//! Product entity and list views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lotus_core::{CategoryId, ProductId, PublishStatus};

/// A product row.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    /// Comma-joined image filenames; ordering is significant.
    pub image: String,
    pub status: PublishStatus,
    pub category_id: Option<CategoryId>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image: String,
    pub status: PublishStatus,
    pub category_id: Option<CategoryId>,
    pub stock: i32,
}

/// Fields for updating a product. The image list is always written in full;
/// the merge with previously stored images happens in the route layer.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image: String,
    pub status: PublishStatus,
    pub category_id: Option<CategoryId>,
    pub stock: i32,
}

/// A product joined with its category name, as read by the list path.
#[derive(Debug, Clone)]
pub struct ProductWithCategory {
    pub product: Product,
    pub category_name: Option<String>,
}

/// Product as served to clients: category name joined in, image field
/// rewritten to absolute URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub image: String,
    pub status: PublishStatus,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// One page of the product listing, shaped like the client expects and
/// cached as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub data: Vec<ProductView>,
}
