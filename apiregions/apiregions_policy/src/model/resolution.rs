//! Module revisions, requirements and capabilities.

use serde::{Deserialize, Serialize};
use std::fmt;

use apiregions_core::id::{BundleId, BundleIdentity, PackageName};
use apiregions_core::{Version, VersionParseError};

/// The namespace of package import requirements and export capabilities.
pub const PACKAGE_NAMESPACE: &str = "osgi.wiring.package";

/// A module revision taking part in resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleRevision {
    /// The symbolic name and version.
    pub identity: BundleIdentity,

    /// The install location, if known.
    pub location: Option<String>,
}

impl BundleRevision {
    /// Create a revision without a location.
    pub fn new(symbolic_name: impl Into<String>, version: Version) -> Self {
        Self {
            identity: BundleIdentity::new(symbolic_name, version),
            location: None,
        }
    }

    /// Parse a revision from its `symbolicName~version` form.
    pub fn parse(s: &str) -> Result<Self, VersionParseError> {
        Ok(Self {
            identity: s.parse()?,
            location: None,
        })
    }

    /// Set the install location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The `symbolicName:version` bundle id of this revision.
    pub fn bundle_id(&self) -> BundleId {
        self.identity.to_bundle_id()
    }
}

impl fmt::Display for BundleRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)
    }
}

/// A requirement declared by a module revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// The requirement namespace.
    pub namespace: String,

    /// The revision declaring the requirement.
    pub requirer: BundleRevision,

    /// The imported package, for package requirements.
    pub package: Option<PackageName>,
}

impl Requirement {
    /// Create a requirement in an arbitrary namespace.
    pub fn new(namespace: impl Into<String>, requirer: BundleRevision) -> Self {
        Self {
            namespace: namespace.into(),
            requirer,
            package: None,
        }
    }

    /// Create a package import requirement.
    pub fn package(requirer: BundleRevision, package: impl Into<PackageName>) -> Self {
        Self {
            namespace: PACKAGE_NAMESPACE.to_string(),
            requirer,
            package: Some(package.into()),
        }
    }

    /// Check if this is a package import requirement.
    pub fn is_package(&self) -> bool {
        self.namespace == PACKAGE_NAMESPACE
    }
}

/// A capability offered by a module revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// The capability namespace.
    pub namespace: String,

    /// The revision offering the capability.
    pub provider: BundleRevision,

    /// The exported package, for package capabilities.
    pub package: Option<PackageName>,
}

impl Capability {
    /// Create a capability in an arbitrary namespace.
    pub fn new(namespace: impl Into<String>, provider: BundleRevision) -> Self {
        Self {
            namespace: namespace.into(),
            provider,
            package: None,
        }
    }

    /// Create a package export capability.
    pub fn package(provider: BundleRevision, package: impl Into<PackageName>) -> Self {
        Self {
            namespace: PACKAGE_NAMESPACE.to_string(),
            provider,
            package: Some(package.into()),
        }
    }
}
