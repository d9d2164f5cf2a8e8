//! Resolver hooks.

use indexmap::IndexSet;
use std::sync::Arc;
use tracing::debug;

use apiregions_core::id::{BundleId, FeatureId, PackageName, Region};

use super::policy::EffectivePolicy;
use crate::model::{BundleRevision, Capability, Requirement, Verdict, WiringDecision};
use crate::store::BundleLocationFeatureMap;

/// Trait for the callbacks of one resolution attempt.
///
/// The host resolver obtains a hook from a [`super::ResolverHookFactory`]
/// at the start of each attempt, invokes the filters any number of times,
/// and calls [`ResolverHook::end`] when the attempt is over.
pub trait ResolverHook: Send + Sync {
    /// Filter the revisions that may be resolved.
    ///
    /// # Arguments
    ///
    /// * `candidates` - The revisions under consideration. Revisions removed
    ///   from the list are not resolved.
    fn filter_resolvable(&self, _candidates: &mut Vec<BundleRevision>) {}

    /// Filter the revisions colliding with a singleton.
    ///
    /// # Arguments
    ///
    /// * `singleton` - The singleton revision.
    /// * `collisions` - Revisions with the same symbolic name.
    fn filter_singleton_collisions(
        &self,
        _singleton: &BundleRevision,
        _collisions: &mut Vec<BundleRevision>,
    ) {
    }

    /// Filter the capabilities that may satisfy a requirement.
    ///
    /// # Arguments
    ///
    /// * `requirement` - The requirement being resolved.
    /// * `candidates` - Capabilities matching the requirement. Capabilities
    ///   removed from the list are not wired.
    fn filter_matches(&self, requirement: &Requirement, candidates: &mut Vec<Capability>);

    /// The resolution attempt is over.
    fn end(&self) {}
}

/// A hook that accepts every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllHook;

impl ResolverHook for AcceptAllHook {
    fn filter_matches(&self, _requirement: &Requirement, _candidates: &mut Vec<Capability>) {}
}

/// A hook enforcing region visibility for package imports.
///
/// The hook works against the policy captured when it was created; later
/// configuration changes do not affect it.
#[derive(Debug, Clone)]
pub struct RegionResolverHook {
    policy: Arc<EffectivePolicy>,
    bundle_locations: BundleLocationFeatureMap,
}

impl RegionResolverHook {
    /// Create a hook for a policy.
    pub fn new(policy: Arc<EffectivePolicy>, bundle_locations: BundleLocationFeatureMap) -> Self {
        Self {
            policy,
            bundle_locations,
        }
    }

    /// The policy this hook enforces.
    pub fn policy(&self) -> &EffectivePolicy {
        &self.policy
    }

    /// The features a revision belongs to.
    ///
    /// These are the features of every bundle id listed for the revision's
    /// identity, of its own `symbolicName:version` id, and of its location.
    pub fn features_of(&self, revision: &BundleRevision) -> IndexSet<FeatureId> {
        let tables = self.policy.tables();
        let mut features = IndexSet::new();

        let mut bundle_ids: Vec<BundleId> = tables
            .bsn_ver_map()
            .get(&revision.identity)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default();
        bundle_ids.push(revision.bundle_id());

        for bundle_id in &bundle_ids {
            if let Some(bundle_features) = tables.bundle_feature_map().get(bundle_id) {
                features.extend(bundle_features.iter().cloned());
            }
        }

        if let Some(location) = &revision.location {
            if let Some(location_features) = self.bundle_locations.get(location) {
                features.extend(location_features.into_iter().map(FeatureId::from));
            }
        }

        features
    }

    /// The regions of a set of features, in precedence order.
    ///
    /// Features without an explicit mapping are placed in the default regions.
    pub fn regions_of(&self, features: &IndexSet<FeatureId>) -> IndexSet<Region> {
        let mut regions = IndexSet::new();
        for feature in features {
            match self.policy.tables().feature_region_map().get(feature) {
                Some(mapped) => regions.extend(mapped.iter().cloned()),
                None => regions.extend(self.policy.default_regions().iter().cloned()),
            }
        }
        regions
    }

    /// Decide whether a requester may wire to a package exported by a provider.
    pub fn evaluate(
        &self,
        requester: &BundleRevision,
        provider: &BundleRevision,
        package: &PackageName,
    ) -> WiringDecision {
        let requester_features = self.features_of(requester);
        let provider_features = self.features_of(provider);
        let requester_regions = self.regions_of(&requester_features);
        let provider_regions = self.regions_of(&provider_features);

        let verdict = if requester_features.is_empty() {
            Verdict::RequesterUnrestricted
        } else if self.policy.is_global_package(package) {
            Verdict::GlobalPackage
        } else if provider_features.is_empty() {
            Verdict::ExporterUnrestricted
        } else {
            requester_regions
                .iter()
                .find(|region| {
                    provider_regions.contains(*region) && self.policy.region_exposes(region, package)
                })
                .map(|region| Verdict::SharedRegion(region.clone()))
                .unwrap_or(Verdict::Rejected)
        };

        WiringDecision {
            package: package.clone(),
            requester_regions: requester_regions.into_iter().collect(),
            exporter_regions: provider_regions.into_iter().collect(),
            verdict,
        }
    }
}

impl ResolverHook for RegionResolverHook {
    fn filter_matches(&self, requirement: &Requirement, candidates: &mut Vec<Capability>) {
        if !requirement.is_package() {
            return;
        }

        candidates.retain(|capability| {
            let Some(package) = capability.package.as_ref().or(requirement.package.as_ref())
            else {
                return true;
            };

            let decision = self.evaluate(&requirement.requirer, &capability.provider, package);
            if !decision.is_accepted() {
                debug!(
                    requester = %requirement.requirer,
                    exporter = %capability.provider,
                    package = %package,
                    requester_regions = ?decision.requester_regions,
                    exporter_regions = ?decision.exporter_regions,
                    "Rejected package wiring outside shared regions"
                );
            }
            decision.is_accepted()
        });
    }

    fn end(&self) {
        debug!(generation = self.policy.generation(), "Resolution attempt ended");
    }
}
