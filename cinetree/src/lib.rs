//! # cinetree
//!
//! A remote movie catalog exposed as a synthetic, browsable hierarchical
//! tree. Paths such as `/movies/2024/2024-01/866398/cast_976` resolve to
//! stable identifiers and back, and each identifier resolves to a record of
//! attributes, some computed eagerly and some only on demand.
//!
//! ## Architecture
//!
//! - [`path`]: the pure path codec (build, leaf, parent, validate).
//! - [`data`]: [`ProviderData`] entity snapshots and host-facing
//!   [`NodeRecord`]s.
//! - [`cache`]: the shared cache-aside store, flushed once at startup.
//! - [`collections`]: static scaffolding plus cache-aside remote
//!   collections with paginated discovery and per-id pre-warming.
//! - [`bindings`]: one handler per resource kind, owning a disjoint slice
//!   of the path/identifier grammar.
//! - [`registry`]: ordered first-match dispatch over those grammars.
//! - [`events`]: at-most-once indexing notifications after first full
//!   fetches.
//! - [`tree`]: the [`CatalogTree`] facade the host tree store talks to.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cinetmdb::TmdbClient;
//! use cinetree::{CatalogTree, TreeSettings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = Arc::new(TmdbClient::from_config()?);
//!     let (tree, mut events) = CatalogTree::new(catalog, TreeSettings::default()).await;
//!
//!     for child in tree.get_children("/movies/2024/2024-01").await? {
//!         println!("{} -> {}", child.id, child.path);
//!     }
//!
//!     while let Ok(event) = events.try_recv() {
//!         println!("index {}", event.id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod bindings;
pub mod cache;
pub mod collections;
pub mod data;
pub mod error;
pub mod events;
pub mod path;
pub mod registry;
pub mod tree;

pub use bindings::Binding;
pub use cache::{CacheStats, CatalogCache};
pub use data::{NodeRecord, ProviderData, ResourceKind};
pub use error::{Result, TreeError};
pub use events::{IndexingEvent, IndexingNotifier};
pub use registry::BindingRegistry;
pub use tree::{CatalogTree, TreeSettings};
