//! The four mapping tables and their merge rules.

use indexmap::{IndexMap, IndexSet};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::hash::Hash;

use apiregions_core::id::{BundleId, BundleIdentity, FeatureId, PackageName, Region};
use apiregions_core::{FrozenList, FrozenMap, FrozenSet};

/// The parsed contribution of one configuration source.
///
/// Base files and overlays both reduce to this shape. Entries keep the
/// order they had in their source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SourceData {
    pub bsn_ver: Vec<(BundleIdentity, Vec<BundleId>)>,
    pub bundle_features: Vec<(BundleId, Vec<FeatureId>)>,
    pub feature_regions: Vec<(FeatureId, Vec<Region>)>,
    pub region_packages: Vec<(Region, Vec<PackageName>)>,
}

impl SourceData {
    /// Total number of entries across all four tables.
    pub fn len(&self) -> usize {
        self.bsn_ver.len()
            + self.bundle_features.len()
            + self.feature_regions.len()
            + self.region_packages.len()
    }
}

/// Accumulates sources into mutable tables before they are frozen.
#[derive(Debug, Default)]
pub(crate) struct TableBuilder {
    bsn_ver: IndexMap<BundleIdentity, Vec<BundleId>>,
    bundle_features: IndexMap<BundleId, IndexSet<FeatureId>>,
    feature_regions: IndexMap<FeatureId, IndexSet<Region>>,
    region_packages: IndexMap<Region, IndexSet<PackageName>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one source. The identity table appends, the others union.
    pub fn merge(&mut self, data: &SourceData) {
        for (identity, ids) in &data.bsn_ver {
            if ids.is_empty() {
                continue;
            }
            self.bsn_ver
                .entry(identity.clone())
                .or_default()
                .extend(ids.iter().cloned());
        }

        union_into(&mut self.bundle_features, &data.bundle_features);
        union_into(&mut self.feature_regions, &data.feature_regions);
        union_into(&mut self.region_packages, &data.region_packages);
    }

    /// Freeze the accumulated tables.
    pub fn build(self) -> RegionTables {
        RegionTables {
            bsn_ver_map: self
                .bsn_ver
                .into_iter()
                .map(|(k, v)| (k, FrozenList::from(v)))
                .collect(),
            bundle_feature_map: freeze(self.bundle_features),
            feature_region_map: freeze(self.feature_regions),
            region_package_map: freeze(self.region_packages),
        }
    }
}

fn union_into<K, V>(table: &mut IndexMap<K, IndexSet<V>>, entries: &[(K, Vec<V>)])
where
    K: Hash + Eq + Clone,
    V: Hash + Eq + Clone,
{
    for (key, values) in entries {
        // Keys never map to an empty collection
        if values.is_empty() {
            continue;
        }
        table
            .entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
}

fn freeze<K, V>(table: IndexMap<K, IndexSet<V>>) -> FrozenMap<K, FrozenSet<V>>
where
    K: Hash + Eq,
    V: Hash + Eq,
{
    table
        .into_iter()
        .map(|(k, v)| (k, FrozenSet::from(v)))
        .collect()
}

/// The four published mapping tables.
///
/// Every collection is read-only; mutators fail with
/// [`apiregions_core::Error::UnsupportedMutation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionTables {
    bsn_ver_map: FrozenMap<BundleIdentity, FrozenList<BundleId>>,
    bundle_feature_map: FrozenMap<BundleId, FrozenSet<FeatureId>>,
    feature_region_map: FrozenMap<FeatureId, FrozenSet<Region>>,
    region_package_map: FrozenMap<Region, FrozenSet<PackageName>>,
}

impl RegionTables {
    /// Bundle identity to bundle ids, in source registration order.
    pub fn bsn_ver_map(&self) -> &FrozenMap<BundleIdentity, FrozenList<BundleId>> {
        &self.bsn_ver_map
    }

    /// Bundle id to features.
    pub fn bundle_feature_map(&self) -> &FrozenMap<BundleId, FrozenSet<FeatureId>> {
        &self.bundle_feature_map
    }

    /// Feature to regions, in first-seen order.
    pub fn feature_region_map(&self) -> &FrozenMap<FeatureId, FrozenSet<Region>> {
        &self.feature_region_map
    }

    /// Region to packages, before any join into `global`.
    pub fn region_package_map(&self) -> &FrozenMap<Region, FrozenSet<PackageName>> {
        &self.region_package_map
    }

    /// Check if all four tables are empty.
    pub fn is_empty(&self) -> bool {
        self.bsn_ver_map.is_empty()
            && self.bundle_feature_map.is_empty()
            && self.feature_region_map.is_empty()
            && self.region_package_map.is_empty()
    }
}

impl Serialize for RegionTables {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Identity keys are written in their `bsn~version` form
        let bsn_ver: IndexMap<String, &FrozenList<BundleId>> = self
            .bsn_ver_map
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let mut state = serializer.serialize_struct("RegionTables", 4)?;
        state.serialize_field("bsnVerMap", &bsn_ver)?;
        state.serialize_field("bundleFeatureMap", &self.bundle_feature_map)?;
        state.serialize_field("featureRegionMap", &self.feature_region_map)?;
        state.serialize_field("regionPackageMap", &self.region_package_map)?;
        state.end()
    }
}

/// One published generation of the tables.
#[derive(Debug, Clone, Default)]
pub struct RegionSnapshot {
    generation: u64,
    tables: RegionTables,
}

impl RegionSnapshot {
    pub(crate) fn new(generation: u64, tables: RegionTables) -> Self {
        Self { generation, tables }
    }

    /// Monotonically increasing number of the rebuild that produced this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The published tables.
    pub fn tables(&self) -> &RegionTables {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiregions_core::Version;

    fn identity(bsn: &str) -> BundleIdentity {
        BundleIdentity::new(bsn, Version::new(1, 0, 0))
    }

    #[test]
    fn test_identity_table_appends() {
        let a = SourceData {
            bsn_ver: vec![(identity("b1"), vec![BundleId::from("g:b1:1")])],
            ..Default::default()
        };
        let b = SourceData {
            bsn_ver: vec![(
                identity("b1"),
                vec![BundleId::from("g:b1:1"), BundleId::from("g2:b1:1")],
            )],
            ..Default::default()
        };

        let mut builder = TableBuilder::new();
        builder.merge(&a);
        builder.merge(&b);
        let tables = builder.build();

        let ids = tables.bsn_ver_map().get(&identity("b1")).unwrap();
        let expected = vec![
            BundleId::from("g:b1:1"),
            BundleId::from("g:b1:1"),
            BundleId::from("g2:b1:1"),
        ];
        assert_eq!(ids.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_set_tables_union_and_skip_empty() {
        let a = SourceData {
            feature_regions: vec![
                (FeatureId::from("f"), vec![Region::from("r0"), Region::from("r1")]),
                (FeatureId::from("empty"), vec![]),
            ],
            ..Default::default()
        };
        let b = SourceData {
            feature_regions: vec![(FeatureId::from("f"), vec![Region::from("r1"), Region::from("r2")])],
            ..Default::default()
        };

        let mut builder = TableBuilder::new();
        builder.merge(&a);
        builder.merge(&b);
        let tables = builder.build();

        let regions: Vec<&str> = tables
            .feature_region_map()
            .get("f")
            .unwrap()
            .iter()
            .map(Region::as_str)
            .collect();
        assert_eq!(regions, vec!["r0", "r1", "r2"]);
        assert!(!tables.feature_region_map().contains_key("empty"));
    }

    #[test]
    fn test_serialize_tables() {
        let data = SourceData {
            bsn_ver: vec![(identity("b1"), vec![BundleId::from("g:b1:1")])],
            region_packages: vec![(Region::global(), vec![PackageName::from("a.b.c")])],
            ..Default::default()
        };
        let mut builder = TableBuilder::new();
        builder.merge(&data);

        let json = serde_json::to_value(builder.build()).unwrap();
        assert_eq!(json["bsnVerMap"]["b1~1.0.0"][0], "g:b1:1");
        assert_eq!(json["regionPackageMap"]["global"][0], "a.b.c");
    }
}
