//! The `check` command.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use apiregions_core::id::{PackageName, Region};
use apiregions_policy::BundleRevision;

use crate::integration::{load_enforcer, EngineArgs};

/// Arguments of the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// The importing bundle, as `symbolicName~version`
    #[clap(long)]
    pub requester: String,

    /// The exporting bundle, as `symbolicName~version`
    #[clap(long)]
    pub exporter: String,

    /// The imported package
    #[clap(long)]
    pub package: String,

    /// Install location of the importing bundle
    #[clap(long)]
    pub requester_location: Option<String>,

    /// Install location of the exporting bundle
    #[clap(long)]
    pub exporter_location: Option<String>,

    /// Print the decision as JSON
    #[clap(long)]
    pub json: bool,
}

fn revision(value: &str, location: Option<&String>) -> Result<BundleRevision> {
    let revision = BundleRevision::parse(value)
        .with_context(|| format!("Invalid bundle '{}', expected symbolicName~version", value))?;
    Ok(match location {
        Some(location) => revision.with_location(location.as_str()),
        None => revision,
    })
}

fn join(regions: &[Region]) -> String {
    if regions.is_empty() {
        return "-".to_string();
    }
    regions
        .iter()
        .map(Region::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Evaluate one wiring. Returns whether it is accepted.
pub fn run(engine: &EngineArgs, args: &CheckArgs) -> Result<bool> {
    let requester = revision(&args.requester, args.requester_location.as_ref())?;
    let exporter = revision(&args.exporter, args.exporter_location.as_ref())?;
    let package = PackageName::from(args.package.as_str());

    let enforcer = load_enforcer(engine)?;
    let decision = enforcer
        .region_hook()
        .evaluate(&requester, &exporter, &package);

    if args.json {
        let text =
            serde_json::to_string_pretty(&decision).context("Failed to serialize decision")?;
        println!("{}", text);
    } else {
        println!("{}", decision.verdict);
        println!("package: {}", decision.package);
        println!("requester regions: {}", join(&decision.requester_regions));
        println!("exporter regions: {}", join(&decision.exporter_regions));
    }

    if let Err(e) = decision.ensure_accepted(&requester) {
        info!("{}", e);
    }
    Ok(decision.is_accepted())
}
