//! Wiring between the command line and the policy engine.
//!
//! Engine properties come from three layers, highest precedence first:
//! command-line flags, an optional TOML properties file, and process
//! environment variables (see [`SystemEnvironment`]).

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use apiregions_core::{Environment, MapEnvironment, SystemEnvironment};
use apiregions_policy::constants::{
    APIREGIONS_JOINGLOBAL, DEFAULT_REGIONS, PROPERTIES_FILE_LOCATION, REGIONS_PROPERTY_NAME,
};
use apiregions_policy::{EmbeddedResources, RegionConfiguration, RegionEnforcer};

/// Options shared by every command that loads a configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Directory or URL holding the region properties files
    #[clap(long, global = true)]
    pub location: Option<String>,

    /// TOML file with engine properties, e.g. `"apiregions.default" = "internal"`
    #[clap(long, global = true)]
    pub properties: Option<PathBuf>,

    /// Comma-separated regions for features without a region mapping
    #[clap(long, global = true)]
    pub default_regions: Option<String>,

    /// Comma-separated regions whose packages are folded into `global`
    #[clap(long, global = true)]
    pub join_global: Option<String>,
}

/// An environment layering explicit properties over process variables.
#[derive(Debug, Clone, Default)]
pub struct CliEnvironment {
    overrides: MapEnvironment,
    system: SystemEnvironment,
}

impl Environment for CliEnvironment {
    fn property(&self, key: &str) -> Option<String> {
        self.overrides
            .property(key)
            .or_else(|| self.system.property(key))
    }
}

impl CliEnvironment {
    /// Build the environment for a set of command-line options.
    pub fn from_args(args: &EngineArgs) -> Result<Self> {
        let mut overrides = match &args.properties {
            Some(path) => load_properties_file(path)?,
            None => MapEnvironment::new(),
        };

        if let Some(location) = &args.location {
            overrides.set(PROPERTIES_FILE_LOCATION, location.as_str());
        }
        if let Some(regions) = &args.default_regions {
            overrides.set(DEFAULT_REGIONS, regions.as_str());
        }
        if let Some(regions) = &args.join_global {
            overrides.set(APIREGIONS_JOINGLOBAL, regions.as_str());
        }
        // The command line always evaluates with enforcement on
        if overrides.property(REGIONS_PROPERTY_NAME).is_none() {
            overrides.set(REGIONS_PROPERTY_NAME, "*");
        }

        Ok(Self {
            overrides,
            system: SystemEnvironment,
        })
    }
}

/// Read a TOML properties file into a flat property map.
///
/// Nested tables are flattened with `.`, so `[apiregions] default = "x"` and
/// `"apiregions.default" = "x"` are equivalent. Arrays become comma-separated
/// lists.
pub fn load_properties_file(path: &Path) -> Result<MapEnvironment> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read properties file {}", path.display()))?;
    let table: toml::Table = text
        .parse()
        .with_context(|| format!("Failed to parse properties file {}", path.display()))?;

    let mut env = MapEnvironment::new();
    flatten("", &table, &mut env);
    Ok(env)
}

fn flatten(prefix: &str, table: &toml::Table, env: &mut MapEnvironment) {
    for (key, value) in table {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(nested) => flatten(&name, nested, env),
            other => env.set(name, scalar(other)),
        }
    }
}

fn scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Load the configuration and create an enforcer over it.
pub fn load_enforcer(args: &EngineArgs) -> Result<RegionEnforcer> {
    let env = CliEnvironment::from_args(args)?;
    let configuration = RegionConfiguration::from_environment(&env, EmbeddedResources::new(), None)
        .context("Failed to load the region configuration")?;
    debug!(
        files = configuration.registration_properties().len(),
        "Loaded region configuration"
    );

    Ok(RegionEnforcer::new(Arc::new(configuration), &env))
}
