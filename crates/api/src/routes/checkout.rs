//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::error::Result;
use crate::models::CheckoutRequest;
use crate::services::CheckoutService;
use crate::state::AppState;

/// `POST /api/checkout` - convert the cart into a durable order.
///
/// All-or-nothing: a failure on any line (insufficient stock, vanished
/// product) rolls back the order, every recorded line item, and every
/// stock decrement.
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl IntoResponse> {
    let service = CheckoutService::new(
        state.pool(),
        state.events(),
        state.config().checkout_clear,
    );

    let order_id = service.place_order(&payload).await?;

    // Stock changed; cached product pages are stale.
    state.list_cache().invalidate_all();
    state.product_cache().invalidate_all();

    Ok((StatusCode::CREATED, Json(json!({ "order_id": order_id }))))
}
