//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::{CategoryCache, ChangeFeed};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    categories: CategoryCache,
    changes: ChangeFeed,
}

impl AppState {
    /// Create a new application state with an empty cache and change feed.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                categories: CategoryCache::new(),
                changes: ChangeFeed::new(),
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Category list cache.
    #[must_use]
    pub fn categories(&self) -> &CategoryCache {
        &self.inner.categories
    }

    /// Live change feed for `/events`.
    #[must_use]
    pub fn changes(&self) -> &ChangeFeed {
        &self.inner.changes
    }
}
