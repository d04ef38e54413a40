//! Checkout orchestration.
//!
//! Converts a user's cart lines into a durable order. The multi-step
//! write (order, line items, stock decrements, cart clearing) runs as one
//! transaction in [`OrderRepository::place`]; this service validates the
//! request up front and publishes the new-order event strictly after the
//! transaction has committed.

use sqlx::PgPool;

use lotus_core::OrderId;

use crate::config::CartClearMode;
use crate::db::{OrderRepository, RepositoryError};
use crate::events::{EventBus, StoreEvent};
use crate::models::CheckoutRequest;

/// Errors that can occur during checkout.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The request is malformed (empty cart, non-positive quantity).
    #[error("invalid checkout request: {0}")]
    Invalid(String),

    /// Repository error, including insufficient stock.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Checkout orchestrator.
pub struct CheckoutService<'a> {
    orders: OrderRepository<'a>,
    events: &'a EventBus,
    clear: CartClearMode,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, events: &'a EventBus, clear: CartClearMode) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            events,
            clear,
        }
    }

    /// Place an order from a checkout request.
    ///
    /// Either every line item is recorded and every stock decrement applied,
    /// or nothing is committed.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Invalid` for an empty or malformed request.
    /// Returns `CheckoutError::Repository` with
    /// `RepositoryError::InsufficientStock` when any line exceeds live
    /// stock, or `RepositoryError::NotFound` for a vanished product.
    pub async fn place_order(&self, request: &CheckoutRequest) -> Result<OrderId, CheckoutError> {
        validate(request)?;

        let order_id = self.orders.place(request, self.clear).await?;

        // The transaction is committed; anything from here on is
        // best-effort and must not fail the request.
        self.events.publish(StoreEvent::NewOrder {
            order_id,
            total: request.total,
            customer_name: request.customer_name.clone(),
        });

        tracing::info!(
            order_id = %order_id,
            user_id = %request.user_id,
            lines = request.items.len(),
            "order placed"
        );

        Ok(order_id)
    }
}

/// Reject malformed requests before touching the database.
fn validate(request: &CheckoutRequest) -> Result<(), CheckoutError> {
    if request.items.is_empty() {
        return Err(CheckoutError::Invalid("cart is empty".to_string()));
    }

    if let Some(line) = request.items.iter().find(|line| line.quantity <= 0) {
        return Err(CheckoutError::Invalid(format!(
            "quantity for product {} must be positive",
            line.product_id
        )));
    }

    if request.customer_name.trim().is_empty() {
        return Err(CheckoutError::Invalid("customer name is required".to_string()));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lotus_core::{ProductId, UserId};
    use rust_decimal::Decimal;

    use crate::models::CheckoutLine;

    fn request(items: Vec<CheckoutLine>) -> CheckoutRequest {
        CheckoutRequest {
            user_id: UserId::new(1),
            customer_name: "Linh".to_string(),
            customer_phone: "0901234567".to_string(),
            customer_address: "12 Hang Gai".to_string(),
            items,
            total: Decimal::new(5000, 2),
        }
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        let req = request(vec![]);
        assert!(matches!(validate(&req), Err(CheckoutError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        let req = request(vec![CheckoutLine {
            product_id: ProductId::new(1),
            quantity: 0,
            price: Decimal::new(2500, 2),
        }]);
        assert!(matches!(validate(&req), Err(CheckoutError::Invalid(_))));
    }

    #[test]
    fn test_validate_requires_customer_name() {
        let mut req = request(vec![CheckoutLine {
            product_id: ProductId::new(1),
            quantity: 2,
            price: Decimal::new(2500, 2),
        }]);
        req.customer_name = "   ".to_string();
        assert!(matches!(validate(&req), Err(CheckoutError::Invalid(_))));
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let req = request(vec![CheckoutLine {
            product_id: ProductId::new(1),
            quantity: 2,
            price: Decimal::new(2500, 2),
        }]);
        assert!(validate(&req).is_ok());
    }
}
