//! The configuration store.
//!
//! This module loads the base configuration files, merges them with
//! named overlays into four mapping tables, and publishes the result as
//! immutable snapshots. It also owns the restart-persisted bundle-location
//! table.

mod configuration;
mod loader;
mod persisted;
mod tables;

pub use configuration::RegionConfiguration;
pub use persisted::{BundleLocationFeatureMap, DataArea, DirectoryDataArea};
pub use tables::{RegionSnapshot, RegionTables};

use apiregions_core::PropertyValue;
use std::collections::HashMap;

/// Trait for receivers of configuration administration events.
///
/// A configuration administration service delivers one event per change
/// to a configuration instance, identified by its source id.
pub trait ConfigurationListener: Send + Sync {
    /// A configuration instance was created or changed.
    ///
    /// # Arguments
    ///
    /// * `source_id` - The configuration instance identifier.
    /// * `props` - The full set of properties of the instance.
    fn updated(&self, source_id: &str, props: &HashMap<String, PropertyValue>);

    /// A configuration instance was deleted.
    ///
    /// # Arguments
    ///
    /// * `source_id` - The configuration instance identifier.
    fn deleted(&self, source_id: &str);
}
