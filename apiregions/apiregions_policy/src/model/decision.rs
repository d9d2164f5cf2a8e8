//! Wiring decisions.

use serde::{Deserialize, Serialize};
use std::fmt;

use apiregions_core::error::PolicyError;
use apiregions_core::id::{PackageName, Region};

use super::resolution::BundleRevision;

/// Why a wiring was accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The requester belongs to no feature, so nothing is enforced.
    RequesterUnrestricted,

    /// The exporter belongs to no feature, so its exports are unrestricted.
    ExporterUnrestricted,

    /// The package is in the `global` region.
    GlobalPackage,

    /// Both revisions share a region exposing the package.
    SharedRegion(Region),

    /// No shared region exposes the package.
    Rejected,
}

impl Verdict {
    /// Check if the wiring is allowed.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequesterUnrestricted => write!(f, "accepted (requester has no feature)"),
            Self::ExporterUnrestricted => write!(f, "accepted (exporter has no feature)"),
            Self::GlobalPackage => write!(f, "accepted (global package)"),
            Self::SharedRegion(region) => write!(f, "accepted (shared region {})", region),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// The outcome of evaluating one candidate wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringDecision {
    /// The imported package.
    pub package: PackageName,

    /// The requester's effective regions, in precedence order.
    pub requester_regions: Vec<Region>,

    /// The exporter's effective regions, in precedence order.
    pub exporter_regions: Vec<Region>,

    /// The verdict.
    pub verdict: Verdict,
}

impl WiringDecision {
    /// Check if the wiring is allowed.
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_accepted()
    }

    /// Turn a rejection into a [`PolicyError::Violation`].
    pub fn ensure_accepted(&self, requester: &BundleRevision) -> Result<(), PolicyError> {
        if self.is_accepted() {
            return Ok(());
        }

        let reason = if self.exporter_regions.is_empty() {
            "the exporter belongs to no region".to_string()
        } else {
            format!(
                "no region shared with the exporter ({}) exposes it",
                self.exporter_regions
                    .iter()
                    .map(Region::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        Err(PolicyError::Violation {
            package: self.package.to_string(),
            requester: requester.to_string(),
            reason,
        })
    }
}
