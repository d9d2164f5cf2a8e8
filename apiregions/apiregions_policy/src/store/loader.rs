//! Turning base files and overlays into [`SourceData`].

use std::collections::HashMap;
use tracing::warn;

use apiregions_core::id::{BundleId, BundleIdentity};
use apiregions_core::PropertyValue;

use super::tables::SourceData;
use crate::constants::{
    BUNDLE_FEATURE_FILENAME, FEATURE_REGION_FILENAME, IDBSNVER_FILENAME, PROP_BUNDLE_FEATURES,
    PROP_FEATURE_REGIONS, PROP_IDBSNVER, PROP_REGION_PACKAGE, REGION_PACKAGE_FILENAME,
};
use crate::source::{parse_entry, PropertyEntry, PropertySource};

/// Read all four base files from a property source.
///
/// A file that is missing or cannot be read contributes nothing; the
/// failure is logged and the other files are still loaded.
pub(crate) fn load_base(source: &dyn PropertySource) -> SourceData {
    let read = |file_name: &str| match source.read_if_present(file_name) {
        Ok(entries) => entries.unwrap_or_default(),
        Err(e) => {
            warn!(file = file_name, "Unable to read configuration file: {}", e);
            Vec::new()
        }
    };

    SourceData {
        bsn_ver: read(IDBSNVER_FILENAME)
            .into_iter()
            .filter_map(|entry| base_bsn_ver_entry(IDBSNVER_FILENAME, entry))
            .collect(),
        bundle_features: typed_entries(read(BUNDLE_FEATURE_FILENAME)),
        feature_regions: typed_entries(read(FEATURE_REGION_FILENAME)),
        region_packages: typed_entries(read(REGION_PACKAGE_FILENAME)),
    }
}

/// Parse the recognised properties of an overlay.
///
/// Unrecognised property keys are ignored. In the identity table the
/// overlay form is inverted relative to the base file: each entry is
/// `bundleId=symbolicName~version` with exactly one value.
pub(crate) fn parse_overlay(source_id: &str, props: &HashMap<String, PropertyValue>) -> SourceData {
    let entries = |key: &str| -> Vec<PropertyEntry> {
        let Some(value) = props.get(key) else {
            return Vec::new();
        };
        value
            .entries()
            .into_iter()
            .enumerate()
            .filter_map(|(index, text)| match parse_entry(source_id, index + 1, text) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(source_id, property = key, "Skipping overlay entry: {}", e);
                    None
                }
            })
            .collect()
    };

    SourceData {
        bsn_ver: entries(PROP_IDBSNVER)
            .into_iter()
            .filter_map(|entry| overlay_bsn_ver_entry(source_id, entry))
            .collect(),
        bundle_features: typed_entries(entries(PROP_BUNDLE_FEATURES)),
        feature_regions: typed_entries(entries(PROP_FEATURE_REGIONS)),
        region_packages: typed_entries(entries(PROP_REGION_PACKAGE)),
    }
}

fn typed_entries<K, V>(entries: Vec<PropertyEntry>) -> Vec<(K, Vec<V>)>
where
    K: From<String>,
    V: From<String>,
{
    entries
        .into_iter()
        .map(|entry| {
            (
                K::from(entry.key),
                entry.values.into_iter().map(V::from).collect(),
            )
        })
        .collect()
}

fn base_bsn_ver_entry(
    source_name: &str,
    entry: PropertyEntry,
) -> Option<(BundleIdentity, Vec<BundleId>)> {
    match entry.key.parse::<BundleIdentity>() {
        Ok(identity) => Some((
            identity,
            entry.values.into_iter().map(BundleId::from).collect(),
        )),
        Err(e) => {
            warn!(source = source_name, line = entry.line, "Skipping bundle identity: {}", e);
            None
        }
    }
}

fn overlay_bsn_ver_entry(
    source_id: &str,
    entry: PropertyEntry,
) -> Option<(BundleIdentity, Vec<BundleId>)> {
    let [value] = entry.values.as_slice() else {
        warn!(
            source_id,
            line = entry.line,
            "Skipping bundle identity overlay entry '{}': expected exactly one value, found {}",
            entry.key,
            entry.values.len()
        );
        return None;
    };

    match value.parse::<BundleIdentity>() {
        Ok(identity) => Some((identity, vec![BundleId::from(entry.key)])),
        Err(e) => {
            warn!(source_id, line = entry.line, "Skipping bundle identity: {}", e);
            None
        }
    }
}
