//! # API Regions Policy
//!
//! `apiregions_policy` enforces package visibility between bundles during
//! module resolution. Bundles belong to features, features are placed in
//! regions, and a bundle may only wire to a package exported by another
//! bundle if the two share a region exposing that package, or the package
//! is part of the `global` region.
//!
//! Key concepts:
//!
//! 1. **Property Source**: Resolves a logical configuration file name
//!    (`idbsnver.properties`, `bundles.properties`, `features.properties`,
//!    `regions.properties`) to `key=value1,value2` entries.
//!
//! 2. **Configuration Store**: Merges the base files with named overlays
//!    into four tables and publishes them as one immutable snapshot.
//!
//! 3. **Resolver Hook Factory**: Derives the effective policy (regions
//!    joined into `global`, default regions) and hands out one hook per
//!    resolution attempt.
//!
//! 4. **Resolver Hook**: Filters package-import candidates against the
//!    snapshot captured when the attempt began.
//!
//! ```no_run
//! use std::sync::Arc;
//! use apiregions_core::MapEnvironment;
//! use apiregions_policy::{
//!     BundleRevision, Capability, EmbeddedResources, RegionConfiguration, RegionEnforcer,
//!     Requirement, ResolverHookFactory,
//! };
//!
//! let env = MapEnvironment::new()
//!     .with("apiregions.regions", "*")
//!     .with("apiregions.location", "/etc/apiregions");
//! let configuration =
//!     Arc::new(RegionConfiguration::from_environment(&env, EmbeddedResources::new(), None).unwrap());
//! let enforcer = RegionEnforcer::new(configuration, &env);
//!
//! let hook = enforcer.begin(None);
//! let requirer = BundleRevision::parse("b1~1.0.0").unwrap();
//! let exporter = BundleRevision::parse("b2~1.2.3").unwrap();
//! let mut candidates = vec![Capability::package(exporter, "a.b.c")];
//! hook.filter_matches(&Requirement::package(requirer, "a.b.c"), &mut candidates);
//! hook.end();
//! ```

pub mod constants;
pub mod engine;
pub mod model;
pub mod source;
pub mod store;

// Re-export key types and traits for convenience
pub use engine::{
    join_regions_to_global, AcceptAllHook, EffectivePolicy, RegionEnforcer, RegionResolverHook,
    ResolverHook, ResolverHookFactory,
};
pub use model::{
    BundleRevision, Capability, Requirement, Verdict, WiringDecision, PACKAGE_NAMESPACE,
};
pub use source::{
    parse_properties, EmbeddedResources, LocationPropertySource, PropertyEntry, PropertySource,
};
pub use store::{
    BundleLocationFeatureMap, ConfigurationListener, DataArea, DirectoryDataArea,
    RegionConfiguration, RegionSnapshot, RegionTables,
};
