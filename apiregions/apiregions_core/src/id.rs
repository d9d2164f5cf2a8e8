//! Identifiers used by the API regions engine.
//!
//! All identifiers except [`BundleIdentity`] are opaque strings. They are
//! never parsed beyond splitting, so for example a feature id such as
//! `org.sling:something:1.2.3:slingosgifeature:myclassifier` is compared as
//! a whole.
//!
//! # Examples
//!
//! ```
//! use apiregions_core::id::{BundleIdentity, FeatureId};
//! use apiregions_core::Version;
//!
//! let identity: BundleIdentity = "b2~1.2.3".parse().unwrap();
//! assert_eq!(identity.symbolic_name(), "b2");
//! assert_eq!(identity.version(), &Version::new(1, 2, 3));
//!
//! let feature = FeatureId::from("g:f:1");
//! assert_eq!(feature, "g:f:1");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::string_id;
use crate::utils::version::{Version, VersionParseError};

/// The region whose packages are visible to every other region.
pub const GLOBAL_REGION: &str = "global";

/// Separator between symbolic name and version in a bundle identity string.
pub const BSN_VERSION_SEPARATOR: char = '~';

string_id! {
    /// A feature identifier, typically `group:artifact:version[:type[:classifier]]`.
    pub struct FeatureId;
}

string_id! {
    /// A bundle identifier token identifying a resolved module instance.
    pub struct BundleId;
}

string_id! {
    /// A named visibility domain.
    pub struct Region;
}

string_id! {
    /// A dotted Java-style package name.
    pub struct PackageName;
}

impl Region {
    /// The distinguished `global` region.
    pub fn global() -> Self {
        Self::from(GLOBAL_REGION)
    }

    /// Check if this is the `global` region.
    pub fn is_global(&self) -> bool {
        self.as_str() == GLOBAL_REGION
    }
}

/// The identity of a bundle: symbolic name plus version.
///
/// Two identities are equal when both the symbolic name and the version
/// are equal, which makes this type suitable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BundleIdentity {
    symbolic_name: String,
    version: Version,
}

impl BundleIdentity {
    /// Create a new bundle identity.
    pub fn new(symbolic_name: impl Into<String>, version: Version) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            version,
        }
    }

    /// The bundle symbolic name.
    pub fn symbolic_name(&self) -> &str {
        &self.symbolic_name
    }

    /// The bundle version.
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The `symbolicName:version` bundle id of this identity.
    pub fn to_bundle_id(&self) -> BundleId {
        BundleId::new(format!("{}:{}", self.symbolic_name, self.version))
    }
}

impl fmt::Display for BundleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.symbolic_name, BSN_VERSION_SEPARATOR, self.version
        )
    }
}

impl FromStr for BundleIdentity {
    type Err = VersionParseError;

    /// Parse the `symbolicName~version` form used by configuration files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bsn, version) = s
            .split_once(BSN_VERSION_SEPARATOR)
            .ok_or_else(|| VersionParseError {
                version: s.to_string(),
                reason: format!("Missing '{}' separator", BSN_VERSION_SEPARATOR),
            })?;

        let bsn = bsn.trim();
        if bsn.is_empty() {
            return Err(VersionParseError {
                version: s.to_string(),
                reason: "Empty symbolic name".to_string(),
            });
        }

        Ok(Self::new(bsn, version.trim().parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_bundle_identity_parsing() {
        let identity: BundleIdentity = "b1~1".parse().unwrap();
        assert_eq!(identity, BundleIdentity::new("b1", Version::new(1, 0, 0)));

        let identity: BundleIdentity = " b3 ~ 2.7 ".parse().unwrap();
        assert_eq!(identity.symbolic_name(), "b3");
        assert_eq!(identity.version(), &Version::new(2, 7, 0));

        assert!("b1".parse::<BundleIdentity>().is_err());
        assert!("~1.0".parse::<BundleIdentity>().is_err());
        assert!("b1~x.y".parse::<BundleIdentity>().is_err());
    }

    #[test]
    fn test_bundle_identity_display() {
        let identity = BundleIdentity::new("b2", Version::new(1, 2, 3));
        assert_eq!(identity.to_string(), "b2~1.2.3");
        assert_eq!(identity.to_bundle_id(), "b2:1.2.3");
    }

    #[test]
    fn test_string_ids_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(FeatureId::from("g:f:1"), 1);
        assert_eq!(map.get("g:f:1"), Some(&1));
        assert_eq!(map.get("g:f:2"), None);
    }

    #[test]
    fn test_global_region() {
        assert!(Region::global().is_global());
        assert!(!Region::from("internal").is_global());
    }

    #[test]
    fn test_id_serialization() {
        let region = Region::from("internal");
        let serialized = serde_json::to_string(&region).unwrap();
        assert_eq!(serialized, "\"internal\"");
        let deserialized: Region = serde_json::from_str(&serialized).unwrap();
        assert_eq!(region, deserialized);
    }
}
