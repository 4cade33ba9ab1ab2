//! Memoized total counts for filtered list queries.

use std::collections::HashMap;

use parking_lot::Mutex;

use folio_store::{BookStore, Filter, FilterKey, StoreError};

/// Count cache keyed by the filter's canonical form.
///
/// Pagination needs the total on every list call; totals over large
/// filtered sets are the expensive aggregate here. Entries stay valid
/// only until the next successful mutating write: every mutating handler
/// calls [`CountCache::invalidate_all`] synchronously before responding,
/// so a read ordered after a completed write never observes a stale
/// count. Concurrent misses for one key may each hit storage; the last
/// writer wins, which is harmless because they computed the same value.
#[derive(Default)]
pub struct CountCache {
    entries: Mutex<HashMap<FilterKey, u64>>,
}

impl CountCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total count of books matching `filter`, served from the cache when
    /// possible. The guard is dropped before the storage await.
    pub async fn get_count(
        &self,
        store: &dyn BookStore,
        filter: &Filter,
    ) -> Result<u64, StoreError> {
        let key = filter.canonical();

        if let Some(count) = self.entries.lock().get(&key).copied() {
            return Ok(count);
        }

        let count = store.count_matching(filter).await?;
        self.entries.lock().insert(key, count);
        Ok(count)
    }

    /// Drop every memoized entry. Called by mutating handlers after the
    /// write lands and before the response is returned.
    pub fn invalidate_all(&self) {
        self.entries.lock().clear();
    }

    #[cfg(test)]
    fn cached(&self, filter: &Filter) -> Option<u64> {
        self.entries.lock().get(&filter.canonical()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use folio_store::BookRecord;

    /// Store stub that counts how often the aggregate query runs.
    struct CountingStore {
        total: u64,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new(total: u64) -> Self {
            Self {
                total,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl BookStore for CountingStore {
        async fn count_matching(&self, _filter: &Filter) -> Result<u64, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.total)
        }

        async fn list_matching(
            &self,
            _filter: &Filter,
            _skip: u64,
            _limit: u64,
        ) -> Result<Vec<BookRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn get_by_id(&self, _book_id: &str) -> Result<Option<BookRecord>, StoreError> {
            Ok(None)
        }

        async fn get_by_name(&self, _name: &str) -> Result<Option<BookRecord>, StoreError> {
            Ok(None)
        }

        async fn insert(&self, _book: BookRecord) -> Result<(), StoreError> {
            Ok(())
        }

        async fn replace(&self, _book_id: &str, _book: BookRecord) -> Result<(), StoreError> {
            Ok(())
        }

        async fn delete(&self, _book_id: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn register_author(&self, _name: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn register_genre(&self, _name: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn list_authors(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }

        async fn list_genres(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn hit_skips_storage() {
        let store = CountingStore::new(4);
        let cache = CountCache::new();
        let filter = Filter::default();

        assert_eq!(cache.get_count(&store, &filter).await.unwrap(), 4);
        assert_eq!(cache.get_count(&store, &filter).await.unwrap(), 4);
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn equivalent_filters_share_an_entry() {
        let store = CountingStore::new(2);
        let cache = CountCache::new();

        let one_way = Filter {
            authors: Some(vec!["B".to_string(), "A".to_string()]),
            ..Filter::default()
        };
        let another = Filter {
            authors: Some(vec!["A".to_string(), "B".to_string()]),
            ..Filter::default()
        };

        cache.get_count(&store, &one_way).await.unwrap();
        cache.get_count(&store, &another).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_a_fresh_query() {
        let store = CountingStore::new(4);
        let cache = CountCache::new();
        let filter = Filter::default();

        cache.get_count(&store, &filter).await.unwrap();
        assert!(cache.cached(&filter).is_some());

        cache.invalidate_all();
        assert!(cache.cached(&filter).is_none());

        cache.get_count(&store, &filter).await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }
}
