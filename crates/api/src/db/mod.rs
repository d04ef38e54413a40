//! Database operations for the Lotus `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `product` - Catalog products with live stock counts
//! - `category` - Product categories with a denormalized product count
//! - `app_user` - Storefront users (argon2 password hashes)
//! - `cart_item` - Pending per-user cart lines
//! - `store_order` / `order_item` - Placed orders and their line items
//!
//! Queries use runtime binding with `#[derive(sqlx::FromRow)]` row types
//! that convert into the domain models via `From` impls.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p lotus-cli -- migrate
//! ```

pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A requested quantity exceeds the product's live stock.
    ///
    /// `available` is the stock observed under lock at decision time;
    /// `held` is the quantity the user already has in their cart.
    #[error("insufficient stock: {available} available, {held} already held")]
    InsufficientStock { available: i32, held: i32 },
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
