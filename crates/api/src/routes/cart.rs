//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use lotus_core::{CartItemId, ProductId, UserId};

use crate::db::CartRepository;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Add-to-cart payload.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Quantity adjustment payload.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

/// `POST /api/cart` - add units of a product to a user's cart.
///
/// Fails with 409 and the live stock numbers when the candidate total
/// (held + requested) exceeds stock. Stock itself is untouched here.
pub async fn add(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    if payload.quantity <= 0 {
        return Err(ApiError::BadRequest("quantity must be positive".to_string()));
    }

    let item = CartRepository::new(state.pool())
        .add(payload.user_id, payload.product_id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/cart/{userId}` - a user's cart joined with live product data.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let mut lines = CartRepository::new(state.pool())
        .list_for_user(UserId::new(user_id))
        .await?;

    for line in &mut lines {
        line.image = state.images().rewrite_image_list(&line.image);
    }

    Ok(Json(lines))
}

/// `PUT /api/cart/{id}` - set a cart row to an exact quantity.
///
/// A quantity of zero or less removes the row; that is a successful
/// response, not an error.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCartRequest>,
) -> Result<impl IntoResponse> {
    let updated = CartRepository::new(state.pool())
        .set_quantity(CartItemId::new(id), payload.quantity)
        .await?;

    match updated {
        Some(item) => Ok(Json(json!(item))),
        None => Ok(Json(json!({ "removed": true }))),
    }
}

/// `DELETE /api/cart/{id}` - remove a cart row.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let removed = CartRepository::new(state.pool())
        .remove(CartItemId::new(id))
        .await?;

    if !removed {
        return Err(ApiError::NotFound(format!("cart item {id}")));
    }

    Ok(Json(json!({ "message": "cart item removed" })))
}
