//! # API Regions Core
//!
//! `apiregions_core` provides the shared building blocks for the API regions
//! package-visibility engine: identifiers, versions, read-only collections,
//! error types and a few configuration helpers.
//!
//! ## Model
//!
//! Bundles (deployable modules) are grouped into features, features are
//! placed in regions, and regions expose packages:
//!
//! ```text
//! bundle --(bsnVerMap, bundleFeatureMap)--> feature --(featureRegionMap)--> region --(regionPackageMap)--> package
//! ```
//!
//! A bundle may wire to a package exported by another bundle only if both
//! share a region exposing that package, or the package is listed in the
//! distinguished `global` region.
//!
//! ## Crate Structure
//!
//! - **collections**: Frozen (read-only) maps, sets and lists used for published tables
//! - **error**: Error types for all API regions components
//! - **id**: Opaque string identifiers and the bundle identity type
//! - **utils**: Versions, environment lookups, property values and log levels
//! - **macros**: Identifier-definition macro

pub mod collections;
pub mod error;
pub mod id;
pub mod macros;
pub mod utils;

// Re-export key types for convenience
pub use collections::{FrozenList, FrozenMap, FrozenSet};
pub use error::{ConfigError, Error, PolicyError, Result};
pub use id::{BundleId, BundleIdentity, FeatureId, PackageName, Region, GLOBAL_REGION};
pub use utils::{
    Environment, LogLevel, MapEnvironment, PropertyValue, SystemEnvironment, Version,
    VersionParseError,
};
