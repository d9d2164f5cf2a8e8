//! Effective policy derivation.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use apiregions_core::id::{PackageName, Region};
use apiregions_core::{FrozenMap, FrozenSet};

use crate::store::{RegionSnapshot, RegionTables};

/// Fold the packages of the joined regions into `global`.
///
/// Every joined region key is removed from the result and its packages are
/// added to `global`, which is created if needed. Joining `global` itself
/// has no effect. The input is not modified.
///
/// # Arguments
///
/// * `region_packages` - The region to package table.
/// * `joined` - The regions to fold into `global`.
///
/// # Returns
///
/// The adjusted region to package table.
pub fn join_regions_to_global(
    region_packages: &FrozenMap<Region, FrozenSet<PackageName>>,
    joined: &FrozenSet<Region>,
) -> FrozenMap<Region, FrozenSet<PackageName>> {
    if joined.is_empty() {
        return region_packages.clone();
    }

    let is_joined = |region: &Region| !region.is_global() && joined.contains(region);

    let moved: IndexSet<PackageName> = region_packages
        .iter()
        .filter(|(region, _)| is_joined(*region))
        .flat_map(|(_, packages)| packages.iter().cloned())
        .collect();

    let mut result: IndexMap<Region, IndexSet<PackageName>> = IndexMap::new();
    for (region, packages) in region_packages {
        if is_joined(region) {
            continue;
        }
        let mut packages: IndexSet<PackageName> = packages.iter().cloned().collect();
        if region.is_global() {
            packages.extend(moved.iter().cloned());
        }
        result.insert(region.clone(), packages);
    }

    if !moved.is_empty() && !result.contains_key(&Region::global()) {
        result.insert(Region::global(), moved);
    }

    result
        .into_iter()
        .map(|(region, packages)| (region, FrozenSet::from(packages)))
        .collect()
}

/// The policy enforced by every hook created from one snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePolicy {
    generation: u64,
    tables: RegionTables,
    region_packages: FrozenMap<Region, FrozenSet<PackageName>>,
    default_regions: FrozenSet<Region>,
}

impl EffectivePolicy {
    /// Derive the policy for a snapshot.
    pub fn derive(
        snapshot: &RegionSnapshot,
        default_regions: &FrozenSet<Region>,
        join_global_regions: &FrozenSet<Region>,
    ) -> Self {
        let tables = snapshot.tables().clone();
        let region_packages =
            join_regions_to_global(tables.region_package_map(), join_global_regions);

        Self {
            generation: snapshot.generation(),
            tables,
            region_packages,
            default_regions: default_regions.clone(),
        }
    }

    /// The generation of the snapshot this policy was derived from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The snapshot tables.
    pub fn tables(&self) -> &RegionTables {
        &self.tables
    }

    /// The region to package table after joining regions into `global`.
    pub fn region_packages(&self) -> &FrozenMap<Region, FrozenSet<PackageName>> {
        &self.region_packages
    }

    /// Regions of features without an explicit region mapping.
    pub fn default_regions(&self) -> &FrozenSet<Region> {
        &self.default_regions
    }

    /// Check if a package is visible to every region.
    pub fn is_global_package(&self, package: &PackageName) -> bool {
        self.region_packages
            .get(&Region::global())
            .is_some_and(|packages| packages.contains(package))
    }

    /// Check if a region exposes a package.
    pub fn region_exposes(&self, region: &Region, package: &PackageName) -> bool {
        self.region_packages
            .get(region)
            .is_some_and(|packages| packages.contains(package))
    }
}
