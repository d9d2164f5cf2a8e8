use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Write a configuration directory with the four region files.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("idbsnver.properties"),
        "req~1.0.0=g:req:1\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("bundles.properties"),
        "g:req:1=f:requester:1\nexp:1.0.0=f:exporter:1\nother:1.0.0=f:other:1\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("features.properties"),
        "f:requester:1=internal\nf:exporter:1=global,internal\nf:other:1=deprecated\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("regions.properties"),
        "internal=p.internal\nglobal=p.global\ndeprecated=p.deprecated\n",
    )
    .unwrap();
    dir
}

fn apiregions(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("apiregions").unwrap();
    cmd.arg("--location").arg(dir.path());
    cmd
}

#[test]
fn test_dump_prints_tables() {
    let dir = fixture();

    apiregions(&dir)
        .arg("dump")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"bsnVerMap\""))
        .stdout(predicate::str::contains("\"req~1.0.0\""))
        .stdout(predicate::str::contains("\"regionPackages\""))
        .stdout(predicate::str::contains("p.deprecated"));
}

#[test]
fn test_dump_output_is_json() {
    let dir = fixture();

    let output = apiregions(&dir)
        .args(["--join-global", "deprecated", "dump"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["generation"], 1);
    assert!(document["tables"]["regionPackageMap"]["deprecated"].is_array());
    assert!(document["regionPackages"]["deprecated"].is_null());

    let global: Vec<&str> = document["regionPackages"]["global"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(global.contains(&"p.deprecated"));
}

#[test]
fn test_check_accepted() {
    let dir = fixture();

    apiregions(&dir)
        .args([
            "check",
            "--requester",
            "req~1.0.0",
            "--exporter",
            "exp~1.0.0",
            "--package",
            "p.internal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted (shared region internal)"))
        .stdout(predicate::str::contains("requester regions: internal"));
}

#[test]
fn test_check_rejected() {
    let dir = fixture();

    apiregions(&dir)
        .args([
            "check",
            "--requester",
            "req~1.0.0",
            "--exporter",
            "other~1.0.0",
            "--package",
            "p.deprecated",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("rejected"))
        .stdout(predicate::str::contains("exporter regions: deprecated"));
}

#[test]
fn test_check_join_global_from_properties_file() {
    let dir = fixture();
    let properties = dir.path().join("apiregions.toml");
    fs::write(&properties, "[apiregions]\njoinglobal = [\"deprecated\"]\n").unwrap();

    apiregions(&dir)
        .args([
            "check",
            "--properties",
            properties.to_str().unwrap(),
            "--requester",
            "req~1.0.0",
            "--exporter",
            "other~1.0.0",
            "--package",
            "p.deprecated",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"global_package\""));
}

#[test]
fn test_check_invalid_bundle() {
    let dir = fixture();

    apiregions(&dir)
        .args([
            "check",
            "--requester",
            "req~not.a.version",
            "--exporter",
            "exp~1.0.0",
            "--package",
            "p.internal",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid bundle 'req~not.a.version'"));
}

#[test]
fn test_missing_configuration_fails() {
    let mut cmd = Command::cargo_bin("apiregions").unwrap();
    cmd.env_remove("APIREGIONS_LOCATION")
        .arg("dump")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load the region configuration"));
}
