//! Category product count repair.
//!
//! The API maintains `category.product_count` incrementally; this command
//! recomputes every count from scratch in case the two ever drift.

use lotus_api::db::CategoryRepository;

use super::{CommandError, connect};

/// Recompute all denormalized category product counts.
///
/// # Errors
///
/// Returns `CommandError::Database` if the query fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let updated = CategoryRepository::new(&pool)
        .recount_products()
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    tracing::info!(categories = updated, "product counts recomputed");
    Ok(())
}
