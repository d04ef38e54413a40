//! Auth route handlers.
//!
//! Responses carry a sanitized [`UserView`] - never the stored row, never
//! the password hash. No session or token is issued.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::models::UserView;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/register` - create a user with a hashed password.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(&payload.name, &payload.email, &payload.password, &payload.phone)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

/// `POST /api/login` - verify credentials.
///
/// A missing account and a wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&payload.email, &payload.password).await?;

    Ok(Json(UserView::from(&user)))
}
