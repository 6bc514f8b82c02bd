//! Bindings: one handler per resource kind
//!
//! Each binding owns a slice of the path/identifier grammar through a pair
//! of anchored regular expressions, and delegates data access to a
//! collection. Bindings are stateless beyond their collection references;
//! every call is a function of the input and the current cache/remote state.

mod credits;
mod genre;
mod movie;
mod person;
mod scaffold;

pub use credits::CreditsBinding;
pub use genre::GenreBinding;
pub use movie::MovieBinding;
pub use person::PersonBinding;
pub use scaffold::{CategoryBinding, MonthBinding, RootBinding, YearBinding};

use crate::data::{ProviderData, ResourceKind};
use crate::error::{Result, TreeError};
use regex::Regex;

/// Per-resource-kind handler over one slice of the path/id grammar
///
/// `find_node_id` derives an identifier from a path without network access
/// (the genre binding consults the cached genre table, which is current
/// cache state, not a remote round trip on the hot path). `get_data`,
/// `list_children` and `get_property` may trigger cache-aside remote calls.
#[async_trait::async_trait]
pub trait Binding: Send + Sync {
    /// Binding name, used in logs and ambiguity reports
    fn name(&self) -> &'static str;

    /// Resource kinds this binding produces
    fn kinds(&self) -> &'static [ResourceKind];

    /// Anchored pattern over virtual paths
    fn path_pattern(&self) -> &Regex;

    /// Anchored pattern over resource identifiers
    fn id_pattern(&self) -> &Regex;

    /// Derives the identifier addressed by a matching path
    async fn find_node_id(&self, path: &str) -> Result<String>;

    /// Returns the entity behind an identifier, if it exists
    async fn get_data(&self, id: &str) -> Result<Option<ProviderData>>;

    /// Lists the children of a matching path
    async fn list_children(&self, path: &str) -> Result<Vec<ProviderData>>;

    /// Re-derives the canonical browsing path of an entity
    async fn path_for(&self, data: &ProviderData) -> Result<String>;

    /// Resolves one property of an entity
    ///
    /// The default serves from the entity record and ignores the locale;
    /// bindings with lazy or localized properties override this.
    async fn get_property(&self, id: &str, locale: &str, name: &str) -> Result<Vec<String>> {
        let _ = locale;
        match self.get_data(id).await? {
            Some(data) => Ok(data.property(name).to_vec()),
            None => Err(TreeError::NotFound(id.to_string())),
        }
    }

    /// Searches entities of this binding's kinds, returning paths
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let _ = query;
        Ok(Vec::new())
    }
}

/// Applies a binding pattern, failing with `NotFound` on mismatch
pub(crate) fn captures<'a>(pattern: &Regex, input: &'a str) -> Result<regex::Captures<'a>> {
    pattern
        .captures(input)
        .ok_or_else(|| TreeError::NotFound(input.to_string()))
}
