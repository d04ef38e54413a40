//! Product route handlers.
//!
//! Create and update accept `multipart/form-data` carrying the scalar
//! fields plus up to five `images` parts. The database stores bare
//! filenames; every response rewrites them to absolute URLs.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use lotus_core::{CategoryId, ProductId, PublishStatus};

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::events::StoreEvent;
use crate::models::{NewProduct, Product, ProductPage, ProductUpdate, ProductView};
use crate::state::AppState;
use crate::uploads::ImageStore;

/// Maximum number of images per product.
const MAX_IMAGES: usize = 5;

/// Default page size for the product list.
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Scalar fields collected from the product multipart form.
///
/// Every field is optional at the wire level; `create` falls back to
/// defaults, `update` falls back to the stored row. `category` is doubly
/// optional: an absent field keeps the current value, an empty value
/// clears it.
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    price: Option<Decimal>,
    description: Option<String>,
    status: Option<PublishStatus>,
    category: Option<Option<CategoryId>>,
    stock: Option<i32>,
    keep_old_images: bool,
    /// Stored filenames of the uploaded images, in upload order.
    images: Vec<String>,
}

/// Parse the product multipart form, storing image parts as they stream in.
///
/// On any error the files saved so far are removed again so a rejected
/// request leaves nothing behind on disk.
async fn parse_product_form(store: &ImageStore, mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    let result: Result<()> = async {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == "images" {
                if form.images.len() >= MAX_IMAGES {
                    return Err(ApiError::BadRequest(format!(
                        "at most {MAX_IMAGES} images are accepted"
                    )));
                }

                let original = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;

                let stored = store
                    .save(&original, content_type.as_deref(), &data)
                    .await?;
                form.images.push(stored);
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read field {name}: {e}")))?;

            match name.as_str() {
                "name" => form.name = Some(value),
                "price" => {
                    let price = value.parse::<Decimal>().map_err(|_| {
                        ApiError::BadRequest(format!("invalid price: {value}"))
                    })?;
                    form.price = Some(price);
                }
                "description" => form.description = Some(value),
                "status" => {
                    let status = value.parse::<i16>().map_err(|_| {
                        ApiError::BadRequest(format!("invalid status: {value}"))
                    })?;
                    form.status = Some(PublishStatus::from_i16(status));
                }
                "category_id" => {
                    if value.is_empty() {
                        form.category = Some(None);
                    } else {
                        let id = value.parse::<i32>().map_err(|_| {
                            ApiError::BadRequest(format!("invalid category_id: {value}"))
                        })?;
                        form.category = Some(Some(CategoryId::new(id)));
                    }
                }
                "stock" => {
                    let stock = value.parse::<i32>().map_err(|_| {
                        ApiError::BadRequest(format!("invalid stock: {value}"))
                    })?;
                    if stock < 0 {
                        return Err(ApiError::BadRequest(
                            "stock cannot be negative".to_string(),
                        ));
                    }
                    form.stock = Some(stock);
                }
                "keepOldImages" => form.keep_old_images = value == "true",
                _ => {}
            }
        }

        Ok(())
    }
    .await;

    if let Err(e) = result {
        for stored in &form.images {
            store.remove(stored).await;
        }
        return Err(e);
    }

    Ok(form)
}

/// Build the client-facing view of a product, rewriting image URLs.
fn to_view(store: &ImageStore, product: Product, category_name: Option<String>) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        price: product.price,
        description: product.description,
        image: store.rewrite_image_list(&product.image),
        status: product.status,
        category_id: product.category_id,
        category_name,
        stock: product.stock,
        created_at: product.created_at,
    }
}

/// `GET /api/home` - paginated product list with category names joined in.
///
/// Pages are cached whole (short TTL) and invalidated by every product
/// mutation.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);

    if let Some(cached) = state.list_cache().get(&(page, limit)).await {
        return Ok(Json(cached.as_ref().clone()));
    }

    let repo = ProductRepository::new(state.pool());
    let total = repo.count().await?;
    let offset = i64::from(page - 1) * i64::from(limit);
    let rows = repo.list_page(i64::from(limit), offset).await?;

    let data = rows
        .into_iter()
        .map(|entry| to_view(state.images(), entry.product, entry.category_name))
        .collect();

    let result = ProductPage {
        page,
        limit,
        total,
        data,
    };

    state
        .list_cache()
        .insert((page, limit), Arc::new(result.clone()))
        .await;

    Ok(Json(result))
}

/// `GET /api/products/{id}` - product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    if let Some(cached) = state.product_cache().get(&id).await {
        return Ok(Json(cached.as_ref().clone()));
    }

    let repo = ProductRepository::new(state.pool());
    let mut product = repo
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("product {id}")))?;

    product.image = state.images().rewrite_image_list(&product.image);

    state
        .product_cache()
        .insert(id, Arc::new(product.clone()))
        .await;

    Ok(Json(product))
}

/// `POST /api/products` - create a product from a multipart form.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = parse_product_form(state.images(), multipart).await?;

    let input = match build_new_product(form) {
        Ok(input) => input,
        Err((images, e)) => {
            for stored in &images {
                state.images().remove(stored).await;
            }
            return Err(e);
        }
    };

    let repo = ProductRepository::new(state.pool());
    let product = repo.create(&input).await?;

    state.invalidate_product(product.id).await;
    state.events().publish(StoreEvent::RefreshData);

    let view = to_view(state.images(), product, None);
    Ok((StatusCode::CREATED, Json(view)))
}

/// Turn a parsed form into a create input, or hand back the saved image
/// names so the caller can clean up.
fn build_new_product(form: ProductForm) -> std::result::Result<NewProduct, (Vec<String>, ApiError)> {
    let Some(name) = form.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return Err((
            form.images,
            ApiError::BadRequest("product name is required".to_string()),
        ));
    };
    let name = name.to_string();

    let Some(price) = form.price else {
        return Err((
            form.images,
            ApiError::BadRequest("product price is required".to_string()),
        ));
    };

    Ok(NewProduct {
        name,
        price,
        description: form.description.unwrap_or_default(),
        image: form.images.join(","),
        status: form.status.unwrap_or_default(),
        category_id: form.category.flatten(),
        stock: form.stock.unwrap_or(0),
    })
}

/// `PUT /api/products/{id}` - update a product from a multipart form.
///
/// With `keepOldImages=true` the uploads are appended to the existing image
/// list; otherwise non-empty uploads replace it and the replaced files are
/// deleted from disk (best-effort) after the row update commits.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let id = ProductId::new(id);
    let form = parse_product_form(state.images(), multipart).await?;

    let repo = ProductRepository::new(state.pool());
    let existing = match repo.get(id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            for stored in &form.images {
                state.images().remove(stored).await;
            }
            return Err(ApiError::NotFound(format!("product {id}")));
        }
        Err(e) => {
            for stored in &form.images {
                state.images().remove(stored).await;
            }
            return Err(e.into());
        }
    };

    let old_images: Vec<String> = existing
        .image
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    // Old images first, then new uploads; replacement only happens when
    // something was actually uploaded.
    let (final_images, replaced): (Vec<String>, Vec<String>) = if form.keep_old_images {
        let mut merged = old_images;
        merged.extend(form.images.iter().cloned());
        (merged, Vec::new())
    } else if form.images.is_empty() {
        (old_images, Vec::new())
    } else {
        (form.images.clone(), old_images)
    };

    let input = ProductUpdate {
        name: form.name.unwrap_or_else(|| existing.name.clone()),
        price: form.price.unwrap_or(existing.price),
        description: form
            .description
            .unwrap_or_else(|| existing.description.clone()),
        status: form.status.unwrap_or(existing.status),
        category_id: form.category.unwrap_or(existing.category_id),
        stock: form.stock.unwrap_or(existing.stock),
        image: final_images.join(","),
    };

    let (_, updated) = match repo.update(id, &input).await {
        Ok(pair) => pair,
        Err(e) => {
            for stored in &form.images {
                state.images().remove(stored).await;
            }
            return Err(e.into());
        }
    };

    for name in &replaced {
        state.images().remove(name).await;
    }

    state.invalidate_product(id).await;
    state.events().publish(StoreEvent::RefreshData);

    let view = to_view(state.images(), updated, None);
    Ok(Json(view))
}

/// `DELETE /api/products/{id}` - delete a product and its image files.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let id = ProductId::new(id);

    let repo = ProductRepository::new(state.pool());
    let product = repo.delete(id).await.map_err(|e| match e {
        crate::db::RepositoryError::NotFound => ApiError::NotFound(format!("product {id}")),
        other => other.into(),
    })?;

    // File cleanup is best-effort and must not fail the request.
    state.images().remove_all(&product.image).await;

    state.invalidate_product(id).await;
    state.events().publish(StoreEvent::RefreshData);

    Ok(Json(json!({ "message": "product deleted" })))
}
