//! Error handling for the virtual catalog tree

use cinetmdb::TmdbError;
use thiserror::Error;

/// Result type for cinetree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised by the path/identifier layer and the collections
///
/// `NotFound` and `InvalidPath` are surfaced to callers as typed errors.
/// `RemoteUnavailable` is distinct from "the remote said the entity does not
/// exist" (which collections report as `Ok(None)`), so callers and future
/// retry policies can tell a transient failure from a genuine miss. The
/// facade is the only place where `RemoteUnavailable` is degraded to an
/// absent result.
#[derive(Error, Debug)]
pub enum TreeError {
    /// No binding matches a path or identifier, or a lookup yielded nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path fails shape validation before any binding is consulted
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Transport/parse failure talking to the remote catalog
    #[error("Remote catalog unavailable: {0}")]
    RemoteUnavailable(#[source] TmdbError),

    /// Two bindings match the same input; a registration defect
    #[error("Ambiguous resolution: {0}")]
    AmbiguousResolution(String),
}

impl TreeError {
    /// Checks whether the error is a transient remote failure
    pub fn is_remote(&self) -> bool {
        matches!(self, TreeError::RemoteUnavailable(_))
    }
}
