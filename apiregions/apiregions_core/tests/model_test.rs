//! Integration tests for the API regions data model.
//!
//! These tests exercise the identifiers, versions and frozen collections
//! together, the way the policy engine uses them.

use std::collections::HashMap;

use apiregions_core::error::{ConfigError, Error};
use apiregions_core::id::{BundleId, BundleIdentity, FeatureId, PackageName, Region};
use apiregions_core::{
    Environment, FrozenList, FrozenMap, FrozenSet, LogLevel, MapEnvironment, PropertyValue,
    Version,
};

#[test]
fn test_bundle_identity_as_map_key() {
    let mut map: HashMap<BundleIdentity, Vec<BundleId>> = HashMap::new();
    map.insert("b2~1.2.3".parse().unwrap(), vec![BundleId::from("g:b2:1.2.3")]);

    // Equal by value, not by parse source
    let key = BundleIdentity::new("b2", Version::new(1, 2, 3));
    assert!(map.contains_key(&key));

    let other = BundleIdentity::new("b2", Version::new(1, 2, 3).with_qualifier("SNAPSHOT"));
    assert!(!map.contains_key(&other));
}

#[test]
fn test_version_ordering() {
    let mut versions: Vec<Version> = ["1.10", "1.2.3", "1.2.3.beta", "1.2", "0.9.9"]
        .iter()
        .map(|v| v.parse().unwrap())
        .collect();
    versions.sort();

    let sorted: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
    assert_eq!(sorted, vec!["0.9.9", "1.2.0", "1.2.3", "1.2.3.beta", "1.10.0"]);
}

#[test]
fn test_invalid_identity_converts_to_config_error() {
    let err = "b1~not.a.version".parse::<BundleIdentity>().unwrap_err();
    let error: Error = ConfigError::from(err).into();
    assert!(matches!(error, Error::Config(ConfigError::InvalidVersion(_))));
}

#[test]
fn test_frozen_tables_compose() {
    let table: FrozenMap<FeatureId, FrozenSet<Region>> = vec![(
        FeatureId::from("org.sling:something:1.2.3"),
        ["global", "internal"].iter().map(|r| Region::from(*r)).collect(),
    )]
    .into_iter()
    .collect();

    let regions = table.get("org.sling:something:1.2.3").unwrap();
    assert!(regions.contains("internal"));
    assert!(regions.insert(Region::from("other")).is_err());
    assert!(table.insert(FeatureId::from("x"), FrozenSet::empty()).is_err());

    let packages: FrozenList<PackageName> = vec![PackageName::from("a.b.c")].into();
    assert_eq!(packages.get(0).map(PackageName::as_str), Some("a.b.c"));
}

#[test]
fn test_environment_and_property_values() {
    let env: Box<dyn Environment> = Box::new(
        MapEnvironment::new()
            .with("apiregions.default", "internal,, global ")
            .with("apiregions.joinglobal", " "),
    );
    assert_eq!(env.list_property("apiregions.default"), vec!["internal", "global"]);
    assert!(env.list_property("apiregions.joinglobal").is_empty());
    assert!(env.property("apiregions.location").is_none());

    let value: PropertyValue = serde_json::from_str("\"g3:b3:2.7=b3~2.7\\n\\n\"").unwrap();
    assert_eq!(value.entries(), vec!["g3:b3:2.7=b3~2.7"]);
}

#[test]
fn test_log_level_to_tracing() {
    let level: LogLevel = "debug".parse().unwrap();
    assert_eq!(tracing::Level::from(level), tracing::Level::DEBUG);
    assert!("verbose".parse::<LogLevel>().is_err());
}
