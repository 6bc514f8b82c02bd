//! Collections: cache-aside access to catalog entities
//!
//! Every remote-backed collection implements the same get-or-compute
//! sequence against the shared [`CatalogCache`](crate::cache::CatalogCache):
//! compute a deterministic key, return the snapshot on hit, otherwise call
//! the remote catalog, store each mapped record under its own id key (and,
//! for list operations, the ordered id list under the scope key), then
//! return. The sequence is not atomic per key: two concurrent cold misses
//! may both fetch and the second write wins, which duplicates a remote call
//! but corrupts nothing.
//!
//! Static collections (the browsing scaffold) never touch network or cache.

pub mod credits;
pub mod genres;
pub mod movies;
pub mod persons;
pub mod scaffold;

pub use credits::CreditsCollection;
pub use genres::GenreCollection;
pub use movies::MovieCollection;
pub use persons::PersonCollection;
pub use scaffold::Scaffold;

use crate::cache::CatalogCache;
use crate::error::{Result, TreeError};
use crate::events::IndexingNotifier;
use cinetmdb::Catalog;
use std::sync::Arc;

/// Maps a remote result onto the tree's absence semantics
///
/// A remote 404 means the entity does not exist: `Ok(None)`. Every other
/// failure is a transient [`TreeError::RemoteUnavailable`], kept distinct so
/// callers can tell the two apart.
pub(crate) fn absent_if_missing<T>(result: cinetmdb::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(TreeError::RemoteUnavailable(e)),
    }
}

/// All collections wired to one catalog, one cache and one notifier
///
/// Constructed once at process start; collections are shared by reference
/// between the bindings, and no entity is owned by more than one collection.
pub struct Collections {
    pub scaffold: Scaffold,
    pub movies: MovieCollection,
    pub credits: CreditsCollection,
    pub persons: PersonCollection,
    pub genres: GenreCollection,
}

impl Collections {
    /// Wires every collection to the shared catalog and cache
    pub fn new(
        catalog: Arc<dyn Catalog>,
        cache: CatalogCache,
        notifier: IndexingNotifier,
        language: String,
        page_limit: usize,
        years_back: usize,
    ) -> Self {
        Self {
            scaffold: Scaffold::new(years_back),
            movies: MovieCollection::new(
                catalog.clone(),
                cache.clone(),
                notifier.clone(),
                language.clone(),
                page_limit,
            ),
            credits: CreditsCollection::new(catalog.clone(), cache.clone()),
            persons: PersonCollection::new(
                catalog.clone(),
                cache.clone(),
                notifier,
                language.clone(),
            ),
            genres: GenreCollection::new(catalog, cache, language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinetmdb::TmdbError;

    #[test]
    fn test_absent_if_missing_distinguishes_404_from_failure() {
        let missing: cinetmdb::Result<u32> = Err(TmdbError::NotFound("movie 0".to_string()));
        assert!(matches!(absent_if_missing(missing), Ok(None)));

        let broken: cinetmdb::Result<u32> = Err(TmdbError::RateLimitExceeded);
        assert!(matches!(
            absent_if_missing(broken),
            Err(TreeError::RemoteUnavailable(_))
        ));

        let ok: cinetmdb::Result<u32> = Ok(7);
        assert!(matches!(absent_if_missing(ok), Ok(Some(7))));
    }
}
