//! Cache-aside store shared by every collection
//!
//! One store instance is wired into all collections at startup. Keys are
//! namespaced per resource kind (`movie-`, `pid-`, `gid-`, `credits-`,
//! `cid-`, `year-`, `month-`) and never collide across kinds. The store
//! defines get/put plus a single flush performed at process start; expiry
//! policy is whatever the underlying `moka` caches were configured with,
//! never a decision of the calling code.

use crate::data::ProviderData;
use cinetmdb::{MovieDetails, Person};
use moka::future::Cache as MokaCache;
use std::sync::Arc;
use std::time::Duration;

/// Cache store for catalog snapshots
///
/// Four typed regions:
/// - `data`: one [`ProviderData`] per resource id
/// - `lists`: ordered id lists under a scope key
///   (`movies-folder-{year}-{month}`, `credits-list-{movieId}`,
///   `genres-list`)
/// - `movie_details` / `person_details`: raw remote snapshots keyed
///   `{id}:{locale}`, backing lazy property resolution
#[derive(Clone)]
pub struct CatalogCache {
    data: Arc<MokaCache<String, ProviderData>>,
    lists: Arc<MokaCache<String, Arc<Vec<String>>>>,
    movie_details: Arc<MokaCache<String, Arc<MovieDetails>>>,
    person_details: Arc<MokaCache<String, Arc<Person>>>,
}

impl CatalogCache {
    /// Creates a cache with default capacity and no expiry
    pub fn new() -> Self {
        Self::with_settings(1000, None)
    }

    /// Creates a cache with explicit capacity and optional TTL
    ///
    /// `ttl = None` means entries never expire; eviction is capacity-only.
    pub fn with_settings(max_capacity: u64, ttl: Option<Duration>) -> Self {
        macro_rules! build {
            ($capacity:expr) => {{
                let mut builder = MokaCache::builder().max_capacity($capacity);
                if let Some(ttl) = ttl {
                    builder = builder.time_to_live(ttl);
                }
                builder.build()
            }};
        }

        Self {
            data: Arc::new(build!(max_capacity * 2)),
            lists: Arc::new(build!(max_capacity)),
            movie_details: Arc::new(build!(max_capacity)),
            person_details: Arc::new(build!(max_capacity)),
        }
    }

    // ============ Entity records ============

    /// Returns the record cached under a resource id
    pub async fn get_data(&self, id: &str) -> Option<ProviderData> {
        self.data.get(id).await
    }

    /// Stores a record under its resource id
    pub async fn put_data(&self, id: String, data: ProviderData) {
        self.data.insert(id, data).await;
    }

    // ============ Id lists ============

    /// Returns the ordered id list cached under a scope key
    pub async fn get_list(&self, scope: &str) -> Option<Arc<Vec<String>>> {
        self.lists.get(scope).await
    }

    /// Stores an ordered id list under a scope key
    pub async fn put_list(&self, scope: String, ids: Arc<Vec<String>>) {
        self.lists.insert(scope, ids).await;
    }

    // ============ Raw remote snapshots ============

    /// Returns a movie detail snapshot for `{movie_id}:{locale}`
    pub async fn get_movie_details(&self, key: &str) -> Option<Arc<MovieDetails>> {
        self.movie_details.get(key).await
    }

    /// Stores a movie detail snapshot
    pub async fn put_movie_details(&self, key: String, details: Arc<MovieDetails>) {
        self.movie_details.insert(key, details).await;
    }

    /// Returns a person snapshot for `{person_id}:{locale}`
    pub async fn get_person_details(&self, key: &str) -> Option<Arc<Person>> {
        self.person_details.get(key).await
    }

    /// Stores a person snapshot
    pub async fn put_person_details(&self, key: String, person: Arc<Person>) {
        self.person_details.insert(key, person).await;
    }

    // ============ Maintenance ============

    /// Flushes every region
    ///
    /// Called exactly once, at process start, when the tree facade is
    /// constructed. Nothing invalidates entries afterwards within this
    /// layer.
    pub async fn flush_all(&self) {
        self.data.invalidate_all();
        self.lists.invalidate_all();
        self.movie_details.invalidate_all();
        self.person_details.invalidate_all();
    }

    /// Returns entry counts per region
    pub async fn stats(&self) -> CacheStats {
        self.data.run_pending_tasks().await;
        self.lists.run_pending_tasks().await;
        self.movie_details.run_pending_tasks().await;
        self.person_details.run_pending_tasks().await;

        CacheStats {
            data_count: self.data.entry_count(),
            lists_count: self.lists.entry_count(),
            movie_details_count: self.movie_details.entry_count(),
            person_details_count: self.person_details.entry_count(),
        }
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheStats {
    /// Number of entity records in cache
    pub data_count: u64,
    /// Number of id lists in cache
    pub lists_count: u64,
    /// Number of movie detail snapshots in cache
    pub movie_details_count: u64,
    /// Number of person snapshots in cache
    pub person_details_count: u64,
}

impl CacheStats {
    /// Returns the total number of cached entries
    pub fn total_count(&self) -> u64 {
        self.data_count + self.lists_count + self.movie_details_count + self.person_details_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ResourceKind;

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = CatalogCache::new();

        let data = ProviderData::new("movie-14", ResourceKind::Movie, "American Beauty");
        cache.put_data("movie-14".to_string(), data.clone()).await;

        let retrieved = cache.get_data("movie-14").await;
        assert_eq!(retrieved, Some(data));

        assert!(cache.get_data("movie-15").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_lists_keep_order() {
        let cache = CatalogCache::new();

        let ids = Arc::new(vec!["movie-2".to_string(), "movie-1".to_string()]);
        cache
            .put_list("movies-folder-2024-01".to_string(), ids.clone())
            .await;

        let retrieved = cache.get_list("movies-folder-2024-01").await.unwrap();
        assert_eq!(*retrieved, *ids);
    }

    #[tokio::test]
    async fn test_flush_all_empties_every_region() {
        let cache = CatalogCache::new();

        cache
            .put_data(
                "pid-976".to_string(),
                ProviderData::new("pid-976", ResourceKind::Person, "Jason Statham"),
            )
            .await;
        cache
            .put_list("genres-list".to_string(), Arc::new(vec![]))
            .await;

        cache.flush_all().await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_count(), 0);
    }
}
