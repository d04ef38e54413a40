//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use lotus_core::ProductId;

use crate::config::ApiConfig;
use crate::events::EventBus;
use crate::models::{Product, ProductPage};
use crate::uploads::ImageStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    events: EventBus,
    images: ImageStore,
    /// Cached product list pages keyed by (page, limit), already shaped
    /// for the client. Mirrors the source system's short-TTL list cache.
    list_cache: Cache<(u32, u32), Arc<ProductPage>>,
    /// Cached product detail responses keyed by product id.
    product_cache: Cache<i32, Arc<Product>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let ttl = Duration::from_secs(config.list_cache_ttl_secs);
        let images = ImageStore::new(config.upload_dir.clone(), &config.base_url);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                events: EventBus::new(),
                images,
                list_cache: Cache::builder().time_to_live(ttl).build(),
                product_cache: Cache::builder().time_to_live(ttl).build(),
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Get a reference to the image store.
    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.inner.images
    }

    /// Get a reference to the product list cache.
    #[must_use]
    pub fn list_cache(&self) -> &Cache<(u32, u32), Arc<ProductPage>> {
        &self.inner.list_cache
    }

    /// Get a reference to the product detail cache.
    #[must_use]
    pub fn product_cache(&self) -> &Cache<i32, Arc<Product>> {
        &self.inner.product_cache
    }

    /// Drop every cached list page and one product's detail entry.
    ///
    /// Called by every product mutation path before it publishes a refresh
    /// event.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.list_cache.invalidate_all();
        self.inner.product_cache.invalidate(&id.as_i32()).await;
    }
}
