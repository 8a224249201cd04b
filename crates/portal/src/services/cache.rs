//! In-memory cache for the public lists.
//!
//! Every page view needs the catalog, and the registration form needs the
//! panchayaths, so both are kept for ten minutes. Entries are dropped as soon
//! as the matching table changes (see [`super::listener`]). A fill that
//! started before an invalidation is discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use esep_core::{TableChange, WatchedTable};

use crate::db::{AnnouncementRepository, CatalogRepository, PanchayathRepository, RepositoryError};
use crate::models::{CatalogCategory, PanchayathOption, PublicAnnouncement};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum ListKey {
    Categories,
    Panchayaths,
    /// Announcements live on the given day.
    Announcements(NaiveDate),
}

#[derive(Debug, Clone)]
enum CachedList {
    Categories(Arc<Vec<CatalogCategory>>),
    Panchayaths(Arc<Vec<PanchayathOption>>),
    Announcements(Arc<Vec<PublicAnnouncement>>),
}

/// Shared list cache. Cloning is cheap.
#[derive(Clone)]
pub struct CatalogCache {
    lists: Cache<ListKey, CachedList>,
    /// Bumped on every invalidation.
    generation: Arc<AtomicU64>,
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        let lists = Cache::builder()
            .max_capacity(32)
            .time_to_live(Duration::from_secs(600)) // 10 minutes
            .support_invalidation_closures()
            .build();
        Self {
            lists,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Active categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    pub async fn categories(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<CatalogCategory>>, RepositoryError> {
        if let Some(CachedList::Categories(list)) = self.lists.get(&ListKey::Categories).await {
            debug!("Cache hit for categories");
            return Ok(list);
        }

        let generation = self.generation();
        let list = Arc::new(CatalogRepository::new(pool).list_active().await?);
        self.fill(generation, ListKey::Categories, CachedList::Categories(Arc::clone(&list)))
            .await;
        Ok(list)
    }

    /// Active panchayaths ordered by district and name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    pub async fn panchayaths(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<PanchayathOption>>, RepositoryError> {
        if let Some(CachedList::Panchayaths(list)) = self.lists.get(&ListKey::Panchayaths).await {
            debug!("Cache hit for panchayaths");
            return Ok(list);
        }

        let generation = self.generation();
        let list = Arc::new(PanchayathRepository::new(pool).list_active().await?);
        self.fill(generation, ListKey::Panchayaths, CachedList::Panchayaths(Arc::clone(&list)))
            .await;
        Ok(list)
    }

    /// Announcements still live on `today`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    pub async fn announcements(
        &self,
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<Arc<Vec<PublicAnnouncement>>, RepositoryError> {
        let key = ListKey::Announcements(today);
        if let Some(CachedList::Announcements(list)) = self.lists.get(&key).await {
            debug!("Cache hit for announcements");
            return Ok(list);
        }

        let generation = self.generation();
        let list = Arc::new(AnnouncementRepository::new(pool).list_live(today).await?);
        self.fill(generation, key, CachedList::Announcements(Arc::clone(&list)))
            .await;
        Ok(list)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Store a list read at `generation` unless an invalidation happened since.
    async fn fill(&self, generation: u64, key: ListKey, list: CachedList) -> bool {
        if self.generation() != generation {
            debug!(?key, "Discarding list read before an invalidation");
            return false;
        }
        self.lists.insert(key, list).await;

        if self.generation() != generation {
            self.lists.invalidate(&key).await;
            return false;
        }
        true
    }

    /// React to a database change notification.
    ///
    /// Returns true when cached entries were dropped.
    pub async fn apply(&self, change: &TableChange) -> bool {
        if change.table == WatchedTable::Registrations {
            return false;
        }
        self.bump();

        match change.table {
            WatchedTable::Categories => {
                self.lists.invalidate(&ListKey::Categories).await;
            }
            WatchedTable::Panchayaths => {
                self.lists.invalidate(&ListKey::Panchayaths).await;
            }
            WatchedTable::Announcements => {
                // Keys are per-day, so drop them all.
                if let Err(e) = self
                    .lists
                    .invalidate_entries_if(|key, _| matches!(key, ListKey::Announcements(_)))
                {
                    tracing::warn!(error = %e, "Falling back to full cache clear");
                    self.lists.invalidate_all();
                }
            }
            WatchedTable::Registrations => {}
        }
        true
    }

    /// Drop every cached list.
    pub fn clear(&self) {
        self.bump();
        self.lists.invalidate_all();
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use esep_core::ChangeOp;

    use super::*;

    fn change(table: WatchedTable) -> TableChange {
        TableChange {
            table,
            op: ChangeOp::Update,
            id: None,
        }
    }

    #[tokio::test]
    async fn test_category_change_drops_catalog() {
        let cache = CatalogCache::new();
        cache
            .lists
            .insert(ListKey::Categories, CachedList::Categories(Arc::new(Vec::new())))
            .await;
        cache
            .lists
            .insert(ListKey::Panchayaths, CachedList::Panchayaths(Arc::new(Vec::new())))
            .await;

        assert!(cache.apply(&change(WatchedTable::Categories)).await);
        assert!(cache.lists.get(&ListKey::Categories).await.is_none());
        assert!(cache.lists.get(&ListKey::Panchayaths).await.is_some());
    }

    #[tokio::test]
    async fn test_registration_change_keeps_everything() {
        let cache = CatalogCache::new();
        cache
            .lists
            .insert(ListKey::Categories, CachedList::Categories(Arc::new(Vec::new())))
            .await;

        assert!(!cache.apply(&change(WatchedTable::Registrations)).await);
        assert!(cache.lists.get(&ListKey::Categories).await.is_some());
    }

    #[tokio::test]
    async fn test_announcement_change_drops_every_day() {
        let cache = CatalogCache::new();
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let next = day.succ_opt().unwrap();
        for d in [day, next] {
            cache
                .lists
                .insert(
                    ListKey::Announcements(d),
                    CachedList::Announcements(Arc::new(Vec::new())),
                )
                .await;
        }

        assert!(cache.apply(&change(WatchedTable::Announcements)).await);
        cache.lists.run_pending_tasks().await;
        assert!(cache.lists.get(&ListKey::Announcements(day)).await.is_none());
        assert!(cache.lists.get(&ListKey::Announcements(next)).await.is_none());
    }

    #[tokio::test]
    async fn test_fill_discarded_after_change() {
        let cache = CatalogCache::new();
        let generation = cache.generation();

        assert!(cache.apply(&change(WatchedTable::Panchayaths)).await);
        assert!(
            !cache
                .fill(generation, ListKey::Panchayaths, CachedList::Panchayaths(Arc::new(Vec::new())))
                .await
        );
        assert!(cache.lists.get(&ListKey::Panchayaths).await.is_none());
    }

    #[tokio::test]
    async fn test_registration_change_keeps_generation() {
        let cache = CatalogCache::new();
        let generation = cache.generation();

        assert!(!cache.apply(&change(WatchedTable::Registrations)).await);
        assert!(
            cache
                .fill(generation, ListKey::Categories, CachedList::Categories(Arc::new(Vec::new())))
                .await
        );
    }
}
