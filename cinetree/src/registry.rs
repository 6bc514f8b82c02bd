//! Binding registry: ordered first-match dispatch over paths and identifiers
//!
//! Resolution is first-match over a fixed registration order, and that order
//! is part of the contract: scaffolding bindings (root, category, year,
//! month) come first, then movie, credits, genre, person. The patterns are
//! required to be mutually disjoint; overlap is a registration defect, not a
//! supported feature, and debug builds log a warning when more than one
//! binding matches an input.

use crate::bindings::{
    Binding, CategoryBinding, CreditsBinding, GenreBinding, MonthBinding, MovieBinding,
    PersonBinding, RootBinding, YearBinding,
};
use crate::collections::Collections;
use crate::error::{Result, TreeError};
use std::sync::Arc;
use tracing::warn;

/// Ordered collection of bindings
pub struct BindingRegistry {
    bindings: Vec<Arc<dyn Binding>>,
}

impl BindingRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Creates the standard registry in the documented registration order
    pub fn standard(collections: Arc<Collections>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RootBinding::new(collections.clone())));
        registry.register(Arc::new(CategoryBinding::new(collections.clone())));
        registry.register(Arc::new(YearBinding::new(collections.clone())));
        registry.register(Arc::new(MonthBinding::new(collections.clone())));
        registry.register(Arc::new(MovieBinding::new(collections.clone())));
        registry.register(Arc::new(CreditsBinding::new(collections.clone())));
        registry.register(Arc::new(GenreBinding::new(collections.clone())));
        registry.register(Arc::new(PersonBinding::new(collections)));
        registry
    }

    /// Appends a binding; registration order is resolution order
    pub fn register(&mut self, binding: Arc<dyn Binding>) {
        self.bindings.push(binding);
    }

    /// The registered bindings, in resolution order
    pub fn bindings(&self) -> &[Arc<dyn Binding>] {
        &self.bindings
    }

    /// Returns the first binding whose path pattern matches
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] when no binding matches.
    pub fn resolve_by_path(&self, path: &str) -> Result<Arc<dyn Binding>> {
        self.resolve(path, |b, input| b.path_pattern().is_match(input))
    }

    /// Returns the first binding whose id pattern matches
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] when no binding matches.
    pub fn resolve_by_id(&self, id: &str) -> Result<Arc<dyn Binding>> {
        self.resolve(id, |b, input| b.id_pattern().is_match(input))
    }

    fn resolve(
        &self,
        input: &str,
        matches: impl Fn(&dyn Binding, &str) -> bool,
    ) -> Result<Arc<dyn Binding>> {
        let mut found: Option<&Arc<dyn Binding>> = None;
        for binding in &self.bindings {
            if matches(binding.as_ref(), input) {
                match found {
                    None => {
                        found = Some(binding);
                        if !cfg!(debug_assertions) {
                            break;
                        }
                    }
                    Some(first) => {
                        // First registered wins, but overlap is a defect
                        warn!(
                            "Bindings '{}' and '{}' both match '{}'",
                            first.name(),
                            binding.name(),
                            input
                        );
                    }
                }
            }
        }
        found
            .cloned()
            .ok_or_else(|| TreeError::NotFound(input.to_string()))
    }

    /// Verifies pattern disjointness over a corpus of sample inputs
    ///
    /// # Errors
    ///
    /// [`TreeError::AmbiguousResolution`] naming the first input matched by
    /// more than one binding.
    pub fn verify_disjoint(&self, paths: &[&str], ids: &[&str]) -> Result<()> {
        for path in paths {
            let matching: Vec<&str> = self
                .bindings
                .iter()
                .filter(|b| b.path_pattern().is_match(path))
                .map(|b| b.name())
                .collect();
            if matching.len() > 1 {
                return Err(TreeError::AmbiguousResolution(format!(
                    "path '{}' matches {:?}",
                    path, matching
                )));
            }
        }
        for id in ids {
            let matching: Vec<&str> = self
                .bindings
                .iter()
                .filter(|b| b.id_pattern().is_match(id))
                .map(|b| b.name())
                .collect();
            if matching.len() > 1 {
                return Err(TreeError::AmbiguousResolution(format!(
                    "id '{}' matches {:?}",
                    id, matching
                )));
            }
        }
        Ok(())
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
