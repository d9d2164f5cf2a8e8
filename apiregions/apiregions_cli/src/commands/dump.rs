//! The `dump` command.

use anyhow::{Context, Result};
use serde_json::json;

use crate::integration::{load_enforcer, EngineArgs};

/// Print the loaded tables and the post-join package map as JSON.
pub fn run(args: &EngineArgs) -> Result<()> {
    let enforcer = load_enforcer(args)?;
    let configuration = enforcer.configuration();
    let policy = enforcer.effective_policy();

    let document = json!({
        "generation": policy.generation(),
        "tables": policy.tables(),
        "regionPackages": policy.region_packages(),
        "defaultRegions": policy.default_regions(),
        "joinGlobalRegions": configuration.join_global_regions(),
        "registrationProperties": configuration.registration_properties(),
    });

    let text = serde_json::to_string_pretty(&document).context("Failed to serialize tables")?;
    println!("{}", text);
    Ok(())
}
