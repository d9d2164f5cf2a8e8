//! Configuration utilities.
//!
//! This module provides the two configuration shapes the engine consumes:
//! scalar lookups against the host environment ([`Environment`]) and
//! multi-valued configuration properties delivered by a configuration
//! administration service ([`PropertyValue`]).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A configuration property value.
///
/// Configuration administration delivers either a single string or a list
/// of strings for a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Single string value.
    String(String),

    /// List of string values.
    Array(Vec<String>),
}

impl PropertyValue {
    /// Check if this value is a single string.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Get this value as a string.
    ///
    /// # Returns
    ///
    /// The string value, or `None` if this value is a list.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Array(_) => None,
        }
    }

    /// Split this value into individual entries.
    ///
    /// A single string holds one entry per non-blank line; each element of a
    /// list is one entry. Entries are trimmed and blank entries dropped.
    pub fn entries(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            Self::String(s) => s.lines().collect(),
            Self::Array(values) => values.iter().map(String::as_str).collect(),
        };

        raw.into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<String>> From<Vec<T>> for PropertyValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Array(values) => write!(f, "[{}]", values.join(", ")),
        }
    }
}

/// Scalar property lookups against the host environment.
pub trait Environment: Send + Sync {
    /// Look up a property.
    ///
    /// # Arguments
    ///
    /// * `key` - The property name, e.g. `apiregions.location`.
    ///
    /// # Returns
    ///
    /// The property value, or `None` if the property is not set.
    fn property(&self, key: &str) -> Option<String>;

    /// Look up a comma-separated list property.
    ///
    /// Absent, empty and blank values all yield an empty list.
    fn list_property(&self, key: &str) -> Vec<String> {
        self.property(key)
            .map(|value| split_list(&value))
            .unwrap_or_default()
    }
}

/// Split a comma-separated list, trimming tokens and dropping blank ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// An environment backed by an in-memory map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapEnvironment {
    properties: HashMap<String, String>,
}

impl MapEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, returning the environment for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Remove a property.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.properties.remove(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnvironment {
    fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }
}

/// An environment backed by process environment variables.
///
/// Property names are mapped to variable names by upper-casing them and
/// replacing every character that is not alphanumeric with `_`, so
/// `apiregions.default` is read from `APIREGIONS_DEFAULT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl SystemEnvironment {
    /// The environment variable name used for a property.
    pub fn variable_name(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl Environment for SystemEnvironment {
    fn property(&self, key: &str) -> Option<String> {
        std::env::var(Self::variable_name(key)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_entries() {
        let value = PropertyValue::from("a=b\n\n  c=d,e  \n");
        assert_eq!(value.entries(), vec!["a=b", "c=d,e"]);

        let value = PropertyValue::from(vec!["x=1", " ", "y=2"]);
        assert_eq!(value.entries(), vec!["x=1", "y=2"]);
        assert!(!value.is_string());
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn test_property_value_serialization() {
        let value: PropertyValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(value, PropertyValue::from(vec!["a", "b"]));

        let value: PropertyValue = serde_json::from_str("\"a=b\"").unwrap();
        assert_eq!(value.as_str(), Some("a=b"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("foo.bar,foo.zar"), vec!["foo.bar", "foo.zar"]);
        assert_eq!(split_list(" test "), vec!["test"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn test_map_environment() {
        let env = MapEnvironment::new()
            .with("apiregions.default", "a, b")
            .with("apiregions.resource.regions.properties", "/tmp/r");

        assert_eq!(env.list_property("apiregions.default"), vec!["a", "b"]);
        assert!(env.list_property("apiregions.joinglobal").is_empty());
        assert_eq!(
            env.property("apiregions.resource.regions.properties"),
            Some("/tmp/r".to_string())
        );
    }

    #[test]
    fn test_system_environment_variable_name() {
        assert_eq!(
            SystemEnvironment::variable_name("apiregions.default"),
            "APIREGIONS_DEFAULT"
        );
        assert_eq!(
            SystemEnvironment::variable_name("apiregions.resource.idbsnver.properties"),
            "APIREGIONS_RESOURCE_IDBSNVER_PROPERTIES"
        );
    }
}
