//! In-memory documents addressed by `classloader://` locations.

use std::collections::HashMap;
use std::sync::Arc;

/// A registry of named, in-memory configuration documents.
///
/// Documents are addressed by a slash-separated path such as
/// `apiregions/regions.properties`; a location of
/// `classloader://apiregions` resolves file names against this registry.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    documents: Arc<HashMap<String, String>>,
}

impl EmbeddedResources {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, returning the registry for chaining.
    pub fn with(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.documents).insert(normalize(path.into()), contents.into());
        self
    }

    /// Get the contents of a document.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.documents
            .get(path.trim_start_matches('/'))
            .map(String::as_str)
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the registry has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn normalize(path: String) -> String {
    path.trim_start_matches('/').to_string()
}
