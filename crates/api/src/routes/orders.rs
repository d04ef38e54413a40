//! Order route handlers (admin list).

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use lotus_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// `GET /api/orders` - every order with its line items, newest first.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool()).list_with_items().await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}` - one order with its line items.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .get_with_items(OrderId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("order {id}")))?;

    Ok(Json(order))
}
