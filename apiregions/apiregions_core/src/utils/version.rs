//! Version utilities.
//!
//! This module provides the bundle version type. Versions follow the
//! module-system convention `major[.minor[.micro[.qualifier]]]`: missing
//! numeric components default to zero and the optional qualifier is an
//! opaque token compared lexicographically.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error parsing a version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    /// The invalid version string.
    pub version: String,

    /// The reason for the error.
    pub reason: String,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid version '{}': {}", self.version, self.reason)
    }
}

impl std::error::Error for VersionParseError {}

/// A bundle version.
///
/// Versions are totally ordered: numerically by major, minor and micro,
/// then by qualifier, where a version without a qualifier sorts before
/// any qualified version with the same numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version number.
    pub major: u32,

    /// Minor version number.
    pub minor: u32,

    /// Micro version number.
    pub micro: u32,

    /// Qualifier.
    pub qualifier: Option<String>,
}

impl Version {
    /// Create a new version.
    ///
    /// # Arguments
    ///
    /// * `major` - Major version number.
    /// * `minor` - Minor version number.
    /// * `micro` - Micro version number.
    ///
    /// # Returns
    ///
    /// A new version with the given components and no qualifier.
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: None,
        }
    }

    /// Add a qualifier to this version.
    ///
    /// # Arguments
    ///
    /// * `qualifier` - The qualifier token.
    ///
    /// # Returns
    ///
    /// A new version with the given qualifier.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// The lowest possible version, `0.0.0`.
    pub fn empty() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            ordering => return ordering,
        }

        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            ordering => return ordering,
        }

        match self.micro.cmp(&other.micro) {
            Ordering::Equal => {}
            ordering => return ordering,
        }

        match (&self.qualifier, &other.qualifier) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;

        if let Some(qualifier) = &self.qualifier {
            write!(f, ".{}", qualifier)?;
        }

        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &str| VersionParseError {
            version: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(error("Empty version"));
        }

        let mut parts = trimmed.splitn(4, '.');
        let mut numbers = [0u32; 3];

        for (index, name) in ["major", "minor", "micro"].iter().enumerate() {
            match parts.next() {
                Some(part) => {
                    numbers[index] = part
                        .parse()
                        .map_err(|_| error(&format!("Invalid {} version", name)))?;
                }
                // Missing trailing components default to zero
                None => break,
            }
        }

        let qualifier = match parts.next() {
            Some(q) if q.is_empty() => return Err(error("Empty qualifier")),
            Some(q) => {
                if !q
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
                {
                    return Err(error("Invalid qualifier"));
                }
                Some(q.to_string())
            }
            None => None,
        };

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            micro: numbers[2],
            qualifier,
        })
    }
}
