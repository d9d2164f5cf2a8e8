//! The restart-persisted bundle-location table.

use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;

use apiregions_core::error::{ConfigError, Error, Result};

use crate::constants::BUNDLE_LOCATION_FEATURE_FILENAME;

/// Trait for the host module's private data area.
///
/// A data area stores small named documents that survive restarts.
pub trait DataArea: Send + Sync {
    /// Read a document.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(contents))` - The document contents.
    /// * `Ok(None)` - If the document does not exist.
    /// * `Err` - If the document exists but could not be read.
    fn read(&self, name: &str) -> Result<Option<String>>;

    /// Replace a document.
    fn write(&self, name: &str, contents: &str) -> Result<()>;
}

/// A data area backed by a filesystem directory.
#[derive(Debug, Clone)]
pub struct DirectoryDataArea {
    root: PathBuf,
}

impl DirectoryDataArea {
    /// Create a data area rooted at a directory. The directory is created
    /// on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataArea for DirectoryDataArea {
    fn read(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.root.join(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write(&self, name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        // Each writer stages into its own sibling file; readers only ever
        // see a complete document
        let mut staging = NamedTempFile::new_in(&self.root)?;
        staging.write_all(contents.as_bytes())?;
        staging.flush()?;
        staging
            .persist(self.root.join(name))
            .map_err(|e| Error::Io(e.error))?;

        Ok(())
    }
}

/// A live, thread-safe map from bundle id or location to feature ids.
///
/// Unlike the overlay-derived tables this map is mutated in place by its
/// callers. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct BundleLocationFeatureMap {
    entries: Arc<DashMap<String, HashSet<String>>>,
}

impl BundleLocationFeatureMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the map from a data area.
    ///
    /// A missing document yields an empty map.
    ///
    /// # Returns
    ///
    /// * `Ok(BundleLocationFeatureMap)` - The loaded map.
    /// * `Err(ConfigError::Persistence)` - If the document is not a valid
    ///   JSON object of string arrays.
    pub fn load(area: &dyn DataArea) -> Result<Self> {
        let map = Self::new();

        let Some(contents) = area.read(BUNDLE_LOCATION_FEATURE_FILENAME)? else {
            debug!("No persisted bundle locations found");
            return Ok(map);
        };

        let document: BTreeMap<String, BTreeSet<String>> = serde_json::from_str(&contents)
            .map_err(|e| {
                ConfigError::Persistence(format!(
                    "{} is not a valid document: {}",
                    BUNDLE_LOCATION_FEATURE_FILENAME, e
                ))
            })?;

        for (key, features) in document {
            map.entries.insert(key, features.into_iter().collect());
        }

        debug!(entries = map.len(), "Loaded persisted bundle locations");
        Ok(map)
    }

    /// Write the current contents to a data area.
    pub fn persist(&self, area: &dyn DataArea) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.to_sorted())?;
        area.write(BUNDLE_LOCATION_FEATURE_FILENAME, &contents)?;

        debug!(entries = self.len(), "Persisted bundle locations");
        Ok(())
    }

    /// Get the features recorded for a key.
    pub fn get(&self, key: &str) -> Option<HashSet<String>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Replace the features recorded for a key.
    pub fn insert(&self, key: impl Into<String>, features: HashSet<String>) -> Option<HashSet<String>> {
        self.entries.insert(key.into(), features)
    }

    /// Record one more feature for a key.
    ///
    /// # Returns
    ///
    /// `true` if the feature was not already recorded.
    pub fn add(&self, key: impl Into<String>, feature: impl Into<String>) -> bool {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(feature.into())
    }

    /// Remove a key.
    pub fn remove(&self, key: &str) -> Option<HashSet<String>> {
        self.entries.remove(key).map(|(_, features)| features)
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy the contents into an ordered map.
    pub fn to_sorted(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().iter().cloned().collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_live_updates_are_shared() {
        let map = BundleLocationFeatureMap::new();
        let clone = map.clone();

        assert!(map.add("foo://bar", "blah"));
        assert!(!map.add("foo://bar", "blah"));
        clone.insert("foo://tar", set(&["a", "b"]));

        assert_eq!(map.len(), 2);
        assert_eq!(clone.get("foo://bar"), Some(set(&["blah"])));
        assert_eq!(map.remove("foo://tar"), Some(set(&["a", "b"])));
        assert!(!clone.contains_key("foo://tar"));
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let area = DirectoryDataArea::new(dir.path().join("data"));

        let map = BundleLocationFeatureMap::new();
        map.insert("a", set(&["x"]));
        map.insert("b", set(&["z", "y", "x"]));
        map.persist(&area).unwrap();

        let written = fs::read_to_string(area.root().join(BUNDLE_LOCATION_FEATURE_FILENAME)).unwrap();
        assert!(written.find("\"x\"").unwrap() < written.find("\"y\"").unwrap());

        let loaded = BundleLocationFeatureMap::load(&area).unwrap();
        assert_eq!(loaded.to_sorted(), map.to_sorted());
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let area = DirectoryDataArea::new(dir.path());
        assert!(BundleLocationFeatureMap::load(&area).unwrap().is_empty());

        area.write(BUNDLE_LOCATION_FEATURE_FILENAME, "[1, 2]").unwrap();
        assert!(matches!(
            BundleLocationFeatureMap::load(&area),
            Err(Error::Config(ConfigError::Persistence(_)))
        ));
    }
}
