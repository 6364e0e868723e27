//! Guest directory cache
//!
//! The guest list is read once from the store and shared as an
//! `Arc<[Guest]>` snapshot. An empty snapshot means "not loaded yet", so the
//! next reader fetches again. Imports call [`GuestDirectory::invalidate`] so
//! the next reader sees newly added guests.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::matching::find_guest;
use crate::models::{default_guest_list, Guest};
use crate::store::Store;

pub struct GuestDirectory {
    store: Arc<dyn Store>,
    cache: RwLock<Arc<[Guest]>>,
}

impl GuestDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            cache: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Current guest list, fetching it on a cache miss
    ///
    /// Without store settings the built-in sample list is cached instead.
    /// A failed fetch leaves the cache empty.
    pub async fn load(&self) -> Result<Arc<[Guest]>> {
        {
            let cached = self.cache.read().await;
            if !cached.is_empty() {
                return Ok(Arc::clone(&cached));
            }
        }

        let guests: Arc<[Guest]> = if self.store.is_configured() {
            let guests = self
                .store
                .fetch_guests()
                .await
                .map_err(Error::DirectoryUnavailable)?;
            Arc::from(guests)
        } else {
            warn!("Store not configured, using built-in guest list");
            Arc::from(default_guest_list())
        };

        *self.cache.write().await = Arc::clone(&guests);
        Ok(guests)
    }

    /// Drop the cached snapshot
    pub async fn invalidate(&self) {
        *self.cache.write().await = Arc::from(Vec::new());
        info!("Guest directory cache cleared");
    }

    /// Look up a guest by normalized name
    pub async fn find(&self, name: &str) -> Result<Option<Guest>> {
        let guests = self.load().await?;
        Ok(find_guest(name, &guests).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn test_unconfigured_store_uses_builtin_list() {
        let directory = GuestDirectory::new(Arc::new(MemoryStore::unconfigured()));

        let guests = directory.load().await.unwrap();
        assert_eq!(guests.len(), 5);
        assert_eq!(guests[1].name, "Jane Smith");

        let found = directory.find("  alice WILLIAMS").await.unwrap().unwrap();
        assert_eq!(found.id, "4");
    }

    #[tokio::test]
    async fn test_load_is_cached_until_invalidated() {
        let store = Arc::new(MemoryStore::with_guests(&["Alice Smith"]));
        let directory = GuestDirectory::new(store.clone());

        assert_eq!(directory.load().await.unwrap().len(), 1);
        store.add_guest("Bob Jones");
        assert_eq!(directory.load().await.unwrap().len(), 1);
        assert_eq!(store.guest_fetches(), 1);

        directory.invalidate().await;
        assert_eq!(directory.load().await.unwrap().len(), 2);
        assert_eq!(store.guest_fetches(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_cached() {
        let store = Arc::new(MemoryStore::with_guests(&["Alice Smith"]));
        store.fail_fetches(true);
        let directory = GuestDirectory::new(store.clone());

        assert!(matches!(
            directory.load().await,
            Err(Error::DirectoryUnavailable(_))
        ));

        store.fail_fetches(false);
        assert_eq!(directory.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_store_refetches() {
        let store = Arc::new(MemoryStore::new());
        let directory = GuestDirectory::new(store.clone());

        assert!(directory.load().await.unwrap().is_empty());
        assert!(directory.load().await.unwrap().is_empty());
        assert_eq!(store.guest_fetches(), 2);
    }
}
