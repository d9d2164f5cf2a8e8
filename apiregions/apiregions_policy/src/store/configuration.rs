//! The configuration store.

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use apiregions_core::error::{ConfigError, Result};
use apiregions_core::id::Region;
use apiregions_core::{Environment, FrozenSet, PropertyValue};

use super::loader::{load_base, parse_overlay};
use super::persisted::{BundleLocationFeatureMap, DataArea};
use super::tables::{RegionSnapshot, RegionTables, SourceData, TableBuilder};
use super::ConfigurationListener;
use crate::constants::{APIREGIONS_JOINGLOBAL, BASE_FILENAMES, DEFAULT_REGIONS};
use crate::source::{EmbeddedResources, LocationPropertySource, PropertySource};

/// The configuration store.
///
/// Holds the base file contents and the active overlays, and publishes the
/// merged tables as an immutable [`RegionSnapshot`]. Every overlay change
/// rebuilds all four tables from scratch and swaps the published snapshot
/// atomically; readers holding an older snapshot are unaffected.
pub struct RegionConfiguration {
    base: SourceData,
    overlays: Mutex<IndexMap<String, SourceData>>,
    snapshot: ArcSwap<RegionSnapshot>,
    default_regions: FrozenSet<Region>,
    join_global_regions: FrozenSet<Region>,
    registration_properties: IndexMap<String, String>,
    bundle_locations: BundleLocationFeatureMap,
    data_area: Option<Arc<dyn DataArea>>,
}

impl RegionConfiguration {
    /// Create a store from a property source.
    ///
    /// # Arguments
    ///
    /// * `source` - Where the base files are read from.
    /// * `env` - The host environment, for the default and joined regions.
    /// * `data_area` - Where the bundle-location table is persisted, if anywhere.
    pub fn new(
        source: &dyn PropertySource,
        env: &dyn Environment,
        data_area: Option<Arc<dyn DataArea>>,
    ) -> Self {
        let base = load_base(source);
        debug!(entries = base.len(), "Loaded base configuration");

        let registration_properties = BASE_FILENAMES
            .iter()
            .filter_map(|file_name| {
                source
                    .location(file_name)
                    .map(|location| (file_name.to_string(), location))
            })
            .collect();

        let bundle_locations = match &data_area {
            Some(area) => BundleLocationFeatureMap::load(area.as_ref()).unwrap_or_else(|e| {
                warn!("Unable to load persisted bundle locations: {}", e);
                BundleLocationFeatureMap::new()
            }),
            None => BundleLocationFeatureMap::new(),
        };

        let mut builder = TableBuilder::new();
        builder.merge(&base);

        Self {
            base,
            overlays: Mutex::new(IndexMap::new()),
            snapshot: ArcSwap::from_pointee(RegionSnapshot::new(1, builder.build())),
            default_regions: region_list(env, DEFAULT_REGIONS),
            join_global_regions: region_list(env, APIREGIONS_JOINGLOBAL),
            registration_properties,
            bundle_locations,
            data_area,
        }
    }

    /// Create a store reading the base files from the locations named in
    /// the host environment.
    ///
    /// # Returns
    ///
    /// * `Ok(RegionConfiguration)` - The loaded store.
    /// * `Err(ConfigError::NoConfiguration)` - If the environment names no
    ///   location for any of the base files.
    pub fn from_environment(
        env: &dyn Environment,
        embedded: EmbeddedResources,
        data_area: Option<Arc<dyn DataArea>>,
    ) -> Result<Self> {
        let source = LocationPropertySource::from_environment(env, embedded)?;
        Ok(Self::new(&source, env, data_area))
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<RegionSnapshot> {
        self.snapshot.load_full()
    }

    /// The currently published tables.
    pub fn tables(&self) -> RegionTables {
        self.snapshot.load().tables().clone()
    }

    /// Regions assigned to features without an explicit region mapping.
    pub fn default_regions(&self) -> &FrozenSet<Region> {
        &self.default_regions
    }

    /// Regions whose packages are folded into `global`.
    pub fn join_global_regions(&self) -> &FrozenSet<Region> {
        &self.join_global_regions
    }

    /// Locations the base files were resolved from, keyed by file name.
    pub fn registration_properties(&self) -> &IndexMap<String, String> {
        &self.registration_properties
    }

    /// The live bundle-location table.
    pub fn bundle_location_feature_map(&self) -> &BundleLocationFeatureMap {
        &self.bundle_locations
    }

    /// Ids of the active overlays, in registration order.
    pub fn overlay_ids(&self) -> Vec<String> {
        self.overlays.lock().keys().cloned().collect()
    }

    /// Register or replace an overlay and republish the tables.
    ///
    /// Replacing an existing overlay keeps its registration position.
    pub fn apply_overlay(&self, source_id: &str, props: &HashMap<String, PropertyValue>) {
        let data = parse_overlay(source_id, props);

        let mut overlays = self.overlays.lock();
        let replaced = overlays.insert(source_id.to_string(), data).is_some();
        let generation = self.rebuild(&overlays);

        info!(source_id, replaced, generation, "Applied configuration overlay");
    }

    /// Deregister an overlay and republish the tables.
    ///
    /// # Returns
    ///
    /// `true` if the overlay was active. Removing an unknown overlay does
    /// nothing.
    pub fn remove_overlay(&self, source_id: &str) -> bool {
        let mut overlays = self.overlays.lock();
        if overlays.shift_remove(source_id).is_none() {
            debug!(source_id, "Ignoring removal of unknown overlay");
            return false;
        }
        let generation = self.rebuild(&overlays);

        info!(source_id, generation, "Removed configuration overlay");
        true
    }

    /// Write the bundle-location table to the data area.
    pub fn persist(&self) -> Result<()> {
        let area = self.data_area.as_ref().ok_or_else(|| {
            ConfigError::Persistence("no data area is configured".to_string())
        })?;
        self.bundle_locations.persist(area.as_ref())
    }

    // Callers hold the overlay lock, which serializes rebuilds.
    fn rebuild(&self, overlays: &IndexMap<String, SourceData>) -> u64 {
        let mut builder = TableBuilder::new();
        builder.merge(&self.base);
        for data in overlays.values() {
            builder.merge(data);
        }

        let generation = self.snapshot.load().generation() + 1;
        self.snapshot
            .store(Arc::new(RegionSnapshot::new(generation, builder.build())));
        generation
    }
}

impl ConfigurationListener for RegionConfiguration {
    fn updated(&self, source_id: &str, props: &HashMap<String, PropertyValue>) {
        self.apply_overlay(source_id, props);
    }

    fn deleted(&self, source_id: &str) {
        self.remove_overlay(source_id);
    }
}

fn region_list(env: &dyn Environment, key: &str) -> FrozenSet<Region> {
    env.list_property(key).into_iter().map(Region::from).collect()
}
