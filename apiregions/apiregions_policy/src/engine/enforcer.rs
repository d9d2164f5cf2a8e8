//! The resolver hook factory.

use arc_swap::ArcSwapOption;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use apiregions_core::{Environment, PropertyValue};

use super::hook::{AcceptAllHook, RegionResolverHook, ResolverHook};
use super::policy::EffectivePolicy;
use crate::constants::{DISABLE_PROPERTY, REGIONS_PROPERTY_NAME};
use crate::model::BundleRevision;
use crate::store::RegionConfiguration;

/// Trait for factories handing out one hook per resolution attempt.
pub trait ResolverHookFactory: Send + Sync {
    /// Begin a resolution attempt.
    ///
    /// # Arguments
    ///
    /// * `triggers` - The revisions that triggered the attempt, if known.
    ///
    /// # Returns
    ///
    /// A hook used for the duration of the attempt.
    fn begin(&self, triggers: Option<&[BundleRevision]>) -> Box<dyn ResolverHook>;
}

/// The region enforcing resolver hook factory.
///
/// Derives the effective policy from the configuration store's current
/// snapshot and caches it until the store publishes a new generation.
pub struct RegionEnforcer {
    configuration: Arc<RegionConfiguration>,
    enabled: AtomicBool,
    policy: ArcSwapOption<EffectivePolicy>,
}

impl RegionEnforcer {
    /// Create a factory.
    ///
    /// Enforcement starts enabled if `apiregions.regions` is set in the
    /// environment.
    pub fn new(configuration: Arc<RegionConfiguration>, env: &dyn Environment) -> Self {
        let enabled = env.property(REGIONS_PROPERTY_NAME).is_some();
        info!(enabled, "Created region enforcer");

        Self {
            configuration,
            enabled: AtomicBool::new(enabled),
            policy: ArcSwapOption::empty(),
        }
    }

    /// The configuration store backing this factory.
    pub fn configuration(&self) -> &Arc<RegionConfiguration> {
        &self.configuration
    }

    /// Check if enforcement is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Switch enforcement on or off.
    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::AcqRel);
        if previous != enabled {
            info!(enabled, "Region enforcement switched");
        }
    }

    /// Apply a management configuration update.
    ///
    /// Only `disable = "true"`, exactly, switches enforcement off; anything
    /// else, including no configuration, switches it on.
    pub fn apply_management_update(&self, props: Option<&HashMap<String, PropertyValue>>) {
        let disable = props
            .and_then(|props| props.get(DISABLE_PROPERTY))
            .and_then(PropertyValue::as_str)
            .is_some_and(|value| value == "true");

        self.set_enabled(!disable);
    }

    /// The effective policy for the current snapshot.
    pub fn effective_policy(&self) -> Arc<EffectivePolicy> {
        let snapshot = self.configuration.snapshot();

        if let Some(policy) = self.policy.load_full() {
            if policy.generation() == snapshot.generation() {
                return policy;
            }
        }

        let policy = Arc::new(EffectivePolicy::derive(
            &snapshot,
            self.configuration.default_regions(),
            self.configuration.join_global_regions(),
        ));
        debug!(generation = policy.generation(), "Derived effective policy");

        self.policy.store(Some(Arc::clone(&policy)));
        policy
    }

    /// Create a region enforcing hook regardless of the enabled switch.
    pub fn region_hook(&self) -> RegionResolverHook {
        RegionResolverHook::new(
            self.effective_policy(),
            self.configuration.bundle_location_feature_map().clone(),
        )
    }
}

impl ResolverHookFactory for RegionEnforcer {
    fn begin(&self, triggers: Option<&[BundleRevision]>) -> Box<dyn ResolverHook> {
        if !self.is_enabled() {
            return Box::new(AcceptAllHook);
        }

        let hook = self.region_hook();
        debug!(
            generation = hook.policy().generation(),
            triggers = triggers.map_or(0, |triggers| triggers.len()),
            "Began resolution attempt"
        );
        Box::new(hook)
    }
}
