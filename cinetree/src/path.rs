//! Virtual path codec
//!
//! Pure functions over slash-separated paths. Paths always start with `/`;
//! the root is `/` itself. The root is special-cased throughout: it has no
//! parent, and a top-level node's parent is the empty string (meaning "the
//! root"), which is distinct from having no parent at all.

use crate::error::{Result, TreeError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VALID_PATH: Regex = Regex::new(r"^(/[^/ ]*)+/?$").unwrap();
}

/// Incremental builder for virtual paths
///
/// Segments are normalized so that exactly one `/` separates them, whatever
/// decoration they carry. An empty builder renders as `/`, never as `""`.
///
/// # Examples
///
/// ```
/// use cinetree::path::PathBuilder;
///
/// let mut builder = PathBuilder::new();
/// builder.append("movies").append("/2024/").append("2024-01");
/// assert_eq!(builder.build(), "/movies/2024/2024-01");
///
/// assert_eq!(PathBuilder::new().build(), "/");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    segments: Vec<String>,
}

impl PathBuilder {
    /// Creates an empty builder (renders as the root)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded with an existing path
    pub fn from_path(path: &str) -> Self {
        let mut builder = Self::new();
        builder.append(path);
        builder
    }

    /// Appends a segment, normalizing separators
    ///
    /// Leading/trailing slashes on the segment are ignored, and a segment
    /// containing interior slashes contributes one path segment per part.
    /// Empty parts are dropped, so doubled separators can never appear.
    pub fn append(&mut self, segment: &str) -> &mut Self {
        for part in segment.split('/') {
            if !part.is_empty() {
                self.segments.push(part.to_string());
            }
        }
        self
    }

    /// Renders the path; `/` for an empty builder
    pub fn build(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }
        path
    }
}

/// Returns the last segment of a path
///
/// Returns `""` for the root or for empty input. A trailing slash is
/// tolerated and ignored.
pub fn leaf(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => "",
    }
}

/// Returns the name of a path's parent node
///
/// - `None` for the root: it has no parent.
/// - `Some("")` for a top-level segment: its parent is the root, whose name
///   is the empty string.
/// - `Some(second-to-last segment)` otherwise.
pub fn parent(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        // Root (or empty input normalized to it)
        return None;
    }
    let without_leaf = &trimmed[..trimmed.rfind('/')?];
    Some(leaf(without_leaf).to_string())
}

/// Validates the shape of a path
///
/// # Errors
///
/// Returns [`TreeError::InvalidPath`] when the path does not match
/// `^(/[^/ ]*)+/?$`.
pub fn validate(path: &str) -> Result<()> {
    if VALID_PATH.is_match(path) {
        Ok(())
    } else {
        Err(TreeError::InvalidPath(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_normalizes_separators() {
        let mut builder = PathBuilder::new();
        builder.append("/movies/").append("2024").append("/2024-01");
        assert_eq!(builder.build(), "/movies/2024/2024-01");
    }

    #[test]
    fn test_empty_builder_is_root() {
        assert_eq!(PathBuilder::new().build(), "/");
    }

    #[test]
    fn test_builder_never_doubles_separators() {
        let mut builder = PathBuilder::new();
        builder.append("//movies//").append("//");
        assert_eq!(builder.build(), "/movies");
    }

    #[test]
    fn test_from_path_round_trips() {
        let builder = PathBuilder::from_path("/movies/2024/2024-01/866398");
        assert_eq!(builder.build(), "/movies/2024/2024-01/866398");
    }

    #[test]
    fn test_leaf() {
        assert_eq!(leaf("/movies/2024/2024-01"), "2024-01");
        assert_eq!(leaf("/movies"), "movies");
        assert_eq!(leaf("/movies/"), "movies");
        assert_eq!(leaf("/"), "");
        assert_eq!(leaf(""), "");
    }

    #[test]
    fn test_parent_of_root_is_none() {
        assert_eq!(parent("/"), None);
        assert_eq!(parent(""), None);
    }

    #[test]
    fn test_parent_of_top_level_is_empty() {
        assert_eq!(parent("/movies"), Some("".to_string()));
    }

    #[test]
    fn test_parent_is_second_to_last_segment() {
        assert_eq!(parent("/movies/2024"), Some("movies".to_string()));
        assert_eq!(
            parent("/movies/2024/2024-01/866398"),
            Some("2024-01".to_string())
        );
    }

    #[test]
    fn test_validate_accepts_well_formed_paths() {
        assert!(validate("/").is_ok());
        assert!(validate("/movies").is_ok());
        assert!(validate("/movies/2024/2024-01").is_ok());
        assert!(validate("/movies/").is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_paths() {
        assert!(validate("").is_err());
        assert!(validate("movies").is_err());
        assert!(validate("/mov ies").is_err());
        assert!(matches!(
            validate("no-slash"),
            Err(TreeError::InvalidPath(_))
        ));
    }
}
