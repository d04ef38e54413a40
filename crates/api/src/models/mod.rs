//! Domain models and shared response shapes.
//!
//! Entities mirror the database schema; the `*View` types are the JSON
//! shapes handed to clients (image fields already rewritten to absolute
//! URLs, password hashes stripped).

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartItem, CartLineView};
pub use category::Category;
pub use order::{CheckoutLine, CheckoutRequest, Order, OrderItem, OrderWithItems};
pub use product::{
    NewProduct, Product, ProductPage, ProductUpdate, ProductView, ProductWithCategory,
};
pub use user::{User, UserView};
