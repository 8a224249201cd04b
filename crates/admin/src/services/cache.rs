//! In-memory cache for the category list.
//!
//! Lists are cached for five minutes and dropped early whenever a write
//! goes through this process or a change notification arrives from the
//! database (see [`super::changes`]).
//!
//! A fill that started before an invalidation is discarded, so a list read
//! ahead of a write never lands in the cache after it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use esep_core::{TableChange, WatchedTable};

use crate::db::{CategoryRepository, RepositoryError};
use crate::models::Category;

/// Cache key for list queries.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ListKey {
    /// Every category, ordered by name.
    Categories,
}

/// Shared category cache. Cloning is cheap.
#[derive(Clone)]
pub struct CategoryCache {
    lists: Cache<ListKey, Arc<Vec<Category>>>,
    /// Bumped on every invalidation.
    generation: Arc<AtomicU64>,
}

impl CategoryCache {
    #[must_use]
    pub fn new() -> Self {
        let lists = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();
        Self {
            lists,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// All categories, from cache when warm.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    pub async fn categories(&self, pool: &PgPool) -> Result<Arc<Vec<Category>>, RepositoryError> {
        if let Some(categories) = self.lists.get(&ListKey::Categories).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let generation = self.generation();
        let categories = Arc::new(CategoryRepository::new(pool).list_all().await?);
        self.fill(generation, Arc::clone(&categories)).await;
        Ok(categories)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store a list read at `generation`.
    ///
    /// Returns false, leaving the cache empty, if an invalidation happened
    /// since that generation was read.
    async fn fill(&self, generation: u64, categories: Arc<Vec<Category>>) -> bool {
        if self.generation() != generation {
            debug!("Discarding category list read before an invalidation");
            return false;
        }
        self.lists.insert(ListKey::Categories, categories).await;

        // An invalidation may have slipped in between the check and the insert.
        if self.generation() != generation {
            self.lists.invalidate(&ListKey::Categories).await;
            return false;
        }
        true
    }

    /// Drop the cached category list.
    pub async fn invalidate_categories(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.lists.invalidate(&ListKey::Categories).await;
    }

    /// React to a database change notification.
    ///
    /// Returns true when a cached entry was dropped.
    pub async fn apply(&self, change: &TableChange) -> bool {
        match change.table {
            WatchedTable::Categories => {
                self.invalidate_categories().await;
                true
            }
            WatchedTable::Registrations | WatchedTable::Panchayaths | WatchedTable::Announcements => {
                false
            }
        }
    }
}

impl Default for CategoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use esep_core::ChangeOp;

    use super::*;

    #[tokio::test]
    async fn test_apply_only_drops_on_category_changes() {
        let cache = CategoryCache::new();
        let category_change = TableChange {
            table: WatchedTable::Categories,
            op: ChangeOp::Update,
            id: None,
        };
        let registration_change = TableChange {
            table: WatchedTable::Registrations,
            op: ChangeOp::Insert,
            id: None,
        };
        assert!(cache.apply(&category_change).await);
        assert!(!cache.apply(&registration_change).await);
    }

    #[tokio::test]
    async fn test_invalidate_clears_entry() {
        let cache = CategoryCache::new();
        cache
            .lists
            .insert(ListKey::Categories, Arc::new(Vec::new()))
            .await;
        assert!(cache.lists.get(&ListKey::Categories).await.is_some());

        cache.invalidate_categories().await;
        assert!(cache.lists.get(&ListKey::Categories).await.is_none());
    }

    #[tokio::test]
    async fn test_fill_discarded_after_invalidation() {
        let cache = CategoryCache::new();
        let generation = cache.generation();

        // A write commits while the list query is still in flight.
        cache.invalidate_categories().await;

        assert!(!cache.fill(generation, Arc::new(Vec::new())).await);
        assert!(cache.lists.get(&ListKey::Categories).await.is_none());
    }

    #[tokio::test]
    async fn test_fill_kept_without_invalidation() {
        let cache = CategoryCache::new();
        let generation = cache.generation();

        assert!(cache.fill(generation, Arc::new(Vec::new())).await);
        assert!(cache.lists.get(&ListKey::Categories).await.is_some());
    }
}
