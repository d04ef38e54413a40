//! Category entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lotus_core::{CategoryId, PublishStatus};

/// A product category.
///
/// `product_count` is denormalized and maintained at the application level
/// whenever products are created, re-categorized, or deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub status: PublishStatus,
    pub product_count: i32,
    pub created_at: DateTime<Utc>,
}
