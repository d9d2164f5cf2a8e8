use apiregions_core::id::Region;
use apiregions_core::{MapEnvironment, PropertyValue};
use apiregions_policy::constants::{PROP_FEATURE_REGIONS, PROP_REGION_PACKAGE};
use apiregions_policy::{
    BundleRevision, Capability, EmbeddedResources, RegionConfiguration, RegionEnforcer,
    Requirement, ResolverHook, ResolverHookFactory, Verdict,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const BSN_VER: &str = "\
req~1.0.0=g:req:1
";

const BUNDLES: &str = "\
g:req:1=f:requester:1
exp:1.0.0=f:exporter:1
other:1.0.0=f:other:1
nomap:1.0.0=f:unmapped:1
";

const FEATURES: &str = "\
f:requester:1=internal
f:exporter:1=global,internal
f:other:1=elsewhere
";

const REGIONS: &str = "\
internal=p.internal
global=p.global
elsewhere=p.elsewhere
";

fn enforcer(extra: &[(&str, &str)]) -> RegionEnforcer {
    let embedded = EmbeddedResources::new()
        .with("conf/idbsnver.properties", BSN_VER)
        .with("conf/bundles.properties", BUNDLES)
        .with("conf/features.properties", FEATURES)
        .with("conf/regions.properties", REGIONS);

    let mut env = MapEnvironment::new()
        .with("apiregions.regions", "*")
        .with("apiregions.location", "classloader://conf");
    for (key, value) in extra {
        env.set(*key, *value);
    }

    let configuration =
        Arc::new(RegionConfiguration::from_environment(&env, embedded, None).unwrap());
    RegionEnforcer::new(configuration, &env)
}

fn revision(s: &str) -> BundleRevision {
    BundleRevision::parse(s).unwrap()
}

/// Run one package requirement through a fresh hook and report whether the
/// single candidate survived.
fn accepted(enforcer: &RegionEnforcer, requester: &str, exporter: &str, package: &str) -> bool {
    let hook = enforcer.begin(None);
    let mut candidates = vec![Capability::package(revision(exporter), package)];
    hook.filter_matches(
        &Requirement::package(revision(requester), package),
        &mut candidates,
    );
    hook.end();
    !candidates.is_empty()
}

#[test]
fn test_shared_region_accepts() {
    let enforcer = enforcer(&[]);
    assert!(accepted(&enforcer, "req~1.0.0", "exp~1.0.0", "p.internal"));

    let decision = enforcer.region_hook().evaluate(
        &revision("req~1.0.0"),
        &revision("exp~1.0.0"),
        &"p.internal".into(),
    );
    assert_eq!(decision.verdict, Verdict::SharedRegion("internal".into()));
    assert_eq!(decision.requester_regions, vec![Region::from("internal")]);
}

#[test]
fn test_global_package_accepts() {
    let enforcer = enforcer(&[]);
    assert!(accepted(&enforcer, "req~1.0.0", "other~1.0.0", "p.global"));
}

#[test]
fn test_no_shared_region_rejects() {
    let enforcer = enforcer(&[]);
    assert!(!accepted(&enforcer, "req~1.0.0", "other~1.0.0", "p.elsewhere"));
    assert!(!accepted(&enforcer, "req~1.0.0", "other~1.0.0", "p.internal"));

    // Sharing a region is not enough if that region does not expose the package
    assert!(!accepted(&enforcer, "req~1.0.0", "exp~1.0.0", "p.elsewhere"));
}

#[test]
fn test_unmapped_requester_is_unrestricted() {
    let enforcer = enforcer(&[]);
    assert!(accepted(&enforcer, "stranger~1.0.0", "other~1.0.0", "p.elsewhere"));
    assert!(accepted(&enforcer, "stranger~1.0.0", "exp~1.0.0", "p.unknown"));
}

#[test]
fn test_unmapped_exporter_is_unrestricted() {
    let enforcer = enforcer(&[]);
    let decision = enforcer.region_hook().evaluate(
        &revision("req~1.0.0"),
        &revision("stranger~1.0.0"),
        &"p.anything".into(),
    );
    assert_eq!(decision.verdict, Verdict::ExporterUnrestricted);
}

#[test]
fn test_default_regions_fallback() {
    // Without defaults an unmapped feature has no regions
    let enforcer_without = enforcer(&[]);
    assert!(!accepted(&enforcer_without, "nomap~1.0.0", "exp~1.0.0", "p.internal"));
    assert!(accepted(&enforcer_without, "nomap~1.0.0", "exp~1.0.0", "p.global"));

    let enforcer_with = enforcer(&[("apiregions.default", "internal")]);
    assert!(accepted(&enforcer_with, "nomap~1.0.0", "exp~1.0.0", "p.internal"));
}

#[test]
fn test_join_global_applies_to_enforcement() {
    let enforcer = enforcer(&[("apiregions.joinglobal", "elsewhere")]);
    assert!(accepted(&enforcer, "req~1.0.0", "other~1.0.0", "p.elsewhere"));

    let policy = enforcer.effective_policy();
    assert!(!policy.region_packages().contains_key("elsewhere"));
    // The published table keeps the region
    assert!(policy.tables().region_package_map().contains_key("elsewhere"));
}

#[test]
fn test_location_features() {
    let enforcer = enforcer(&[]);
    let locations = enforcer.configuration().bundle_location_feature_map();
    locations.insert(
        "file:/bundles/loc.jar",
        HashSet::from(["f:other:1".to_string()]),
    );

    let hook = enforcer.begin(None);
    let requester = revision("loc~1.0.0").with_location("file:/bundles/loc.jar");
    let mut candidates = vec![
        Capability::package(revision("other~1.0.0"), "p.elsewhere"),
        Capability::package(revision("exp~1.0.0"), "p.internal"),
    ];
    hook.filter_matches(
        &Requirement::package(requester, "p.elsewhere"),
        &mut candidates,
    );

    // The first candidate shares `elsewhere`; the second capability exports a
    // package the requester's only region does not see
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].provider, revision("other~1.0.0"));
}

#[test]
fn test_other_namespaces_pass_through() {
    let enforcer = enforcer(&[]);
    let hook = enforcer.begin(None);

    let mut candidates = vec![Capability::new("osgi.wiring.bundle", revision("other~1.0.0"))];
    hook.filter_matches(
        &Requirement::new("osgi.wiring.bundle", revision("req~1.0.0")),
        &mut candidates,
    );
    assert_eq!(candidates.len(), 1);

    let mut resolvable = vec![revision("req~1.0.0"), revision("other~1.0.0")];
    hook.filter_resolvable(&mut resolvable);
    assert_eq!(resolvable.len(), 2);

    let mut collisions = vec![revision("req~2.0.0")];
    hook.filter_singleton_collisions(&revision("req~1.0.0"), &mut collisions);
    assert_eq!(collisions, vec![revision("req~2.0.0")]);
}

#[test]
fn test_begin_with_triggers() {
    let enforcer = enforcer(&[]);
    let triggers = vec![revision("req~1.0.0")];
    let hook = enforcer.begin(Some(triggers.as_slice()));

    let mut candidates = vec![Capability::package(revision("other~1.0.0"), "p.elsewhere")];
    hook.filter_matches(
        &Requirement::package(revision("req~1.0.0"), "p.elsewhere"),
        &mut candidates,
    );
    assert!(candidates.is_empty());

    let hook = enforcer.begin(Some(&[][..]));
    let mut candidates = vec![Capability::package(revision("exp~1.0.0"), "p.internal")];
    hook.filter_matches(
        &Requirement::package(revision("req~1.0.0"), "p.internal"),
        &mut candidates,
    );
    assert_eq!(candidates.len(), 1);
}

#[test]
fn test_hook_keeps_its_snapshot() {
    let enforcer = enforcer(&[]);
    let before: Box<dyn ResolverHook> = enforcer.begin(None);

    let mut props = HashMap::new();
    props.insert(
        PROP_FEATURE_REGIONS.to_string(),
        PropertyValue::from("f:other:1=internal"),
    );
    props.insert(
        PROP_REGION_PACKAGE.to_string(),
        PropertyValue::from("internal=p.elsewhere"),
    );
    enforcer.configuration().apply_overlay("widen", &props);
    let after = enforcer.begin(None);

    let run = |hook: &dyn ResolverHook| {
        let mut candidates = vec![Capability::package(revision("other~1.0.0"), "p.elsewhere")];
        hook.filter_matches(
            &Requirement::package(revision("req~1.0.0"), "p.elsewhere"),
            &mut candidates,
        );
        candidates.len()
    };

    assert_eq!(run(before.as_ref()), 0);
    assert_eq!(run(after.as_ref()), 1);

    enforcer.configuration().remove_overlay("widen");
    assert_eq!(run(enforcer.begin(None).as_ref()), 0);
}
