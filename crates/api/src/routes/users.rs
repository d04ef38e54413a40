//! User route handlers (admin list).

use axum::{Json, extract::State, response::IntoResponse};

use crate::db::UserRepository;
use crate::error::Result;
use crate::models::UserView;
use crate::state::AppState;

/// `GET /api/users` - every user, newest first, password hashes stripped.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool()).list().await?;
    let views: Vec<UserView> = users.iter().map(UserView::from).collect();
    Ok(Json(views))
}
