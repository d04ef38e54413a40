//! Category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use lotus_core::{CategoryId, PublishStatus};

use crate::db::CategoryRepository;
use crate::db::categories::CategoryInput;
use crate::error::{ApiError, Result};
use crate::events::StoreEvent;
use crate::state::AppState;

/// Default page size for the category list.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Search and pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Category create/update payload.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub status: Option<i16>,
}

impl CategoryPayload {
    fn into_input(self) -> Result<CategoryInput> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::BadRequest("category name is required".to_string()));
        }

        Ok(CategoryInput {
            name,
            icon: self.icon,
            status: self.status.map_or_else(PublishStatus::default, PublishStatus::from_i16),
        })
    }
}

/// `GET /api/categories-all` - full category list.
pub async fn list_all(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool()).list_all().await?;
    Ok(Json(categories))
}

/// `GET /api/categories` - paginated category list with optional name filter.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let repo = CategoryRepository::new(state.pool());
    let total = repo.count(search).await?;
    let offset = i64::from(page - 1) * i64::from(limit);
    let data = repo.search(search, i64::from(limit), offset).await?;

    Ok(Json(json!({
        "page": page,
        "limit": limit,
        "total": total,
        "data": data,
    })))
}

/// `POST /api/categories` - create a category.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse> {
    let input = payload.into_input()?;

    let category = CategoryRepository::new(state.pool()).create(&input).await?;
    state.events().publish(StoreEvent::RefreshCategories);

    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /api/categories/{id}` - update a category.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse> {
    let input = payload.into_input()?;

    let category = CategoryRepository::new(state.pool())
        .update(CategoryId::new(id), &input)
        .await?;
    state.events().publish(StoreEvent::RefreshCategories);

    Ok(Json(category))
}

/// `DELETE /api/categories/{id}` - delete a category.
///
/// Products referencing it fall back to no category; the deleted rows'
/// products keep their files and data.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let deleted = CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;

    if !deleted {
        return Err(ApiError::NotFound(format!("category {id}")));
    }

    // Category names shown in product lists are stale now.
    state.list_cache().invalidate_all();
    state.events().publish(StoreEvent::RefreshCategories);

    Ok(Json(json!({ "message": "category deleted" })))
}
