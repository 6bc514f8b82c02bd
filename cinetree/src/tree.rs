//! The catalog tree facade consumed by the host tree store
//!
//! One [`CatalogTree`] is constructed at process start and shared by every
//! caller. Construction performs the single startup cache flush and wires
//! the collections, the bindings and the registry together as explicit
//! values; there is no global state.
//!
//! This is the outermost boundary of the core, and the only place where a
//! transient remote failure is degraded: a node that cannot be fetched
//! surfaces as an ordinary not-found for that single node, never as a
//! whole-tree failure.

use crate::cache::CatalogCache;
use crate::collections::movies::{MOVIE_I18N_PROPERTIES, MOVIE_LAZY_PROPERTIES};
use crate::collections::persons::PERSON_I18N_PROPERTIES;
use crate::collections::Collections;
use crate::data::{NodeRecord, ProviderData, ResourceKind};
use crate::error::{Result, TreeError};
use crate::events::{IndexingEvent, IndexingNotifier, DEFAULT_EVENT_CAPACITY};
use crate::path;
use crate::registry::BindingRegistry;
use cineconfig::Config;
use cinetmdb::Catalog;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Construction-time settings of the tree
#[derive(Debug, Clone)]
pub struct TreeSettings {
    /// Locale used for eager records and default property resolution
    pub language: String,
    /// Cache capacity per region
    pub cache_capacity: u64,
    /// Cache TTL; `None` means entries never expire
    pub cache_ttl: Option<Duration>,
    /// Size of the rolling year window
    pub years_back: usize,
    /// Discovery page cap; 0 fetches every page
    pub discover_page_limit: usize,
    /// Capacity of the indexing event channel
    pub event_capacity: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            cache_capacity: 1000,
            cache_ttl: None,
            years_back: 10,
            discover_page_limit: 0,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl TreeSettings {
    /// Reads the settings from a cineconfig configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let ttl_seconds = config.get_cache_ttl_seconds()?;
        Ok(Self {
            language: config.get_tmdb_language(),
            cache_capacity: config.get_cache_capacity()? as u64,
            cache_ttl: (ttl_seconds > 0).then(|| Duration::from_secs(ttl_seconds as u64)),
            years_back: config.get_years_back()?,
            discover_page_limit: config.get_discover_page_limit()?,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        })
    }
}

/// The browsable virtual tree over a remote movie catalog
pub struct CatalogTree {
    registry: BindingRegistry,
    cache: CatalogCache,
    language: String,
}

impl CatalogTree {
    /// Builds the tree and returns it with the indexing event stream
    ///
    /// The shared cache store is flushed here, once, at process start.
    pub async fn new(
        catalog: Arc<dyn Catalog>,
        settings: TreeSettings,
    ) -> (Self, mpsc::Receiver<IndexingEvent>) {
        let cache = CatalogCache::with_settings(settings.cache_capacity, settings.cache_ttl);
        cache.flush_all().await;
        info!(language = %settings.language, "Catalog tree starting with a flushed cache");

        let (notifier, events) = IndexingNotifier::channel(settings.event_capacity);
        let collections = Arc::new(Collections::new(
            catalog,
            cache.clone(),
            notifier,
            settings.language.clone(),
            settings.discover_page_limit,
            settings.years_back,
        ));
        let registry = BindingRegistry::standard(collections);

        (
            Self {
                registry,
                cache,
                language: settings.language,
            },
            events,
        )
    }

    /// Builds the tree from the global configuration
    pub async fn from_config(
        catalog: Arc<dyn Catalog>,
    ) -> anyhow::Result<(Self, mpsc::Receiver<IndexingEvent>)> {
        let config = cineconfig::get_config();
        let settings = TreeSettings::from_config(config.as_ref())?;
        Ok(Self::new(catalog, settings).await)
    }

    /// The binding registry, in resolution order
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// The shared cache store
    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Checks whether a path addresses an existing node
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidPath`] when the path fails shape validation.
    /// Every other failure mode, including a transient remote failure,
    /// degrades to `false`.
    pub async fn item_exists(&self, path: &str) -> Result<bool> {
        path::validate(path)?;

        let binding = match self.registry.resolve_by_path(path) {
            Ok(binding) => binding,
            Err(TreeError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        let id = match binding.find_node_id(path).await {
            Ok(id) => id,
            Err(TreeError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        match binding.get_data(&id).await {
            Ok(data) => Ok(data.is_some()),
            Err(TreeError::RemoteUnavailable(e)) => {
                warn!("Remote failure checking {}: {}", path, e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Lists the children of a path as host-facing records
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidPath`] on malformed input and
    /// [`TreeError::NotFound`] when no binding owns the path. A transient
    /// remote failure degrades to an empty listing.
    pub async fn get_children(&self, path: &str) -> Result<Vec<NodeRecord>> {
        path::validate(path)?;
        let binding = self.registry.resolve_by_path(path)?;

        let children = match binding.list_children(path).await {
            Ok(children) => children,
            Err(TreeError::RemoteUnavailable(e)) => {
                warn!("Remote failure listing {}: {}", path, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut records = Vec::with_capacity(children.len());
        for child in children {
            match self.resolve_record(child).await {
                Ok(record) => records.push(record),
                Err(TreeError::RemoteUnavailable(e)) => {
                    warn!("Remote failure resolving a child of {}: {}", path, e);
                }
                Err(TreeError::NotFound(id)) => {
                    warn!("Child {} of {} has no binding", id, path);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }

    /// Returns the host-facing record behind an identifier
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] when no binding owns the identifier. An
    /// entity the remote does not know, or a transient remote failure,
    /// yields `Ok(None)`.
    pub async fn get_data(&self, id: &str) -> Result<Option<NodeRecord>> {
        let binding = self.registry.resolve_by_id(id)?;

        let data = match binding.get_data(id).await {
            Ok(Some(data)) => data,
            Ok(None) => return Ok(None),
            Err(TreeError::RemoteUnavailable(e)) => {
                warn!("Remote failure fetching {}: {}", id, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match self.resolve_record(data).await {
            Ok(record) => Ok(Some(record)),
            Err(TreeError::RemoteUnavailable(e)) => {
                warn!("Remote failure deriving the path of {}: {}", id, e);
                Ok(None)
            }
            // A credit whose movie vanished remotely has no derivable path
            Err(TreeError::NotFound(what)) => {
                warn!("No path derivable for {}: {} is gone", id, what);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves one property of an entity on demand
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] when no binding owns the identifier or the
    /// entity does not exist. A transient remote failure degrades to an
    /// empty result.
    pub async fn get_property(&self, id: &str, locale: &str, name: &str) -> Result<Vec<String>> {
        let binding = self.registry.resolve_by_id(id)?;

        match binding.get_property(id, locale, name).await {
            Ok(values) => Ok(values),
            Err(TreeError::RemoteUnavailable(e)) => {
                warn!("Remote failure resolving {}.{}: {}", id, name, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Searches entities of one kind, returning their canonical paths
    ///
    /// A transient remote failure in one binding degrades to that binding
    /// contributing nothing.
    pub async fn search(&self, kind: ResourceKind, query: &str) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        for binding in self.registry.bindings() {
            if !binding.kinds().contains(&kind) {
                continue;
            }
            match binding.search(query).await {
                Ok(found) => paths.extend(found),
                Err(TreeError::RemoteUnavailable(e)) => {
                    warn!("Remote failure searching '{}': {}", query, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(paths)
    }

    /// Renders entity data into a host-facing record
    async fn resolve_record(&self, data: ProviderData) -> Result<NodeRecord> {
        let binding = self.registry.resolve_by_id(&data.id)?;
        let node_path = binding.path_for(&data).await?;
        Ok(self.record_for(data, node_path))
    }

    fn record_for(&self, data: ProviderData, node_path: String) -> NodeRecord {
        match data.kind {
            ResourceKind::Movie => {
                let lazy: Vec<String> = MOVIE_LAZY_PROPERTIES
                    .iter()
                    .filter(|name| !data.properties.contains_key(**name))
                    .map(|name| name.to_string())
                    .collect();
                let i18n: Vec<String> = MOVIE_I18N_PROPERTIES
                    .iter()
                    .map(|name| name.to_string())
                    .collect();
                NodeRecord::from_data(data, node_path)
                    .with_lazy(lazy)
                    .with_lazy_i18n(&self.language, i18n)
            }
            ResourceKind::Person => {
                let i18n: Vec<String> = PERSON_I18N_PROPERTIES
                    .iter()
                    .map(|name| name.to_string())
                    .collect();
                NodeRecord::from_data(data, node_path).with_lazy_i18n(&self.language, i18n)
            }
            _ => NodeRecord::from_data(data, node_path),
        }
    }
}
