//! HTTP route handlers for the Lotus API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (verifies database)
//!
//! # Catalog
//! GET    /api/home              - Paginated product list (cached)
//! GET    /api/products/{id}     - Product detail
//! POST   /api/products          - Create product (multipart, up to 5 images)
//! PUT    /api/products/{id}     - Update product (multipart, keepOldImages flag)
//! DELETE /api/products/{id}     - Delete product and its image files
//!
//! # Categories
//! GET    /api/categories-all    - Full category list
//! GET    /api/categories        - Paginated/filtered category list
//! POST   /api/categories        - Create category
//! PUT    /api/categories/{id}   - Update category
//! DELETE /api/categories/{id}   - Delete category
//!
//! # Auth
//! POST /api/register            - Register (argon2-hashed password)
//! POST /api/login               - Login (sanitized user in response)
//!
//! # Cart
//! POST   /api/cart              - Add to cart (stock admission control)
//! GET    /api/cart/{userId}     - A user's cart joined with product data
//! PUT    /api/cart/{id}         - Set exact quantity (<= 0 removes)
//! DELETE /api/cart/{id}         - Remove cart row
//!
//! # Checkout & admin lists
//! POST /api/checkout            - Place order (atomic stock reconciliation)
//! GET  /api/orders              - Orders with line items, newest first
//! GET  /api/orders/{id}         - One order with line items
//! GET  /api/users               - Users (password hashes stripped)
//!
//! # Real-time
//! GET /ws                       - WebSocket refresh events
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod events;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(products::home))
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/categories-all", get(categories::list_all))
        .route(
            "/categories",
            get(categories::search).post(categories::create),
        )
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::remove),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the cart and checkout routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", post(cart::add))
        // GET takes a user id; PUT/DELETE take a cart row id.
        .route(
            "/cart/{id}",
            get(cart::list).put(cart::update).delete(cart::remove),
        )
        .route("/checkout", post(checkout::checkout))
}

/// Create the admin list routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::show))
        .route("/users", get(users::list))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(catalog_routes())
        .merge(auth_routes())
        .merge(cart_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api)
        .route("/ws", get(events::ws))
}
