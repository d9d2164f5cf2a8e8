//! Error types for the API regions engine.
//!
//! This module defines the error hierarchy used throughout the workspace.
//! Errors are organized by subsystem, with each subsystem having its own
//! error type. The root error type, `Error`, can wrap any of the
//! subsystem-specific errors, allowing for uniform error handling at the
//! top level.

use crate::utils::version::VersionParseError;
use thiserror::Error;

/// Root error type for the API regions engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Policy enforcement errors
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Attempt to mutate a published, read-only table
    #[error("Unsupported mutation: {0}")]
    UnsupportedMutation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors related to loading and merging configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The host environment offers neither a location nor per-file resources
    #[error("No API regions configuration found: set '{location_key}' or '{resource_prefix}<file>'")]
    NoConfiguration {
        /// The environment key naming the configuration directory
        location_key: String,

        /// The environment key prefix naming individual files
        resource_prefix: String,
    },

    /// A line or overlay entry could not be interpreted
    #[error("Malformed entry in {source_name} at line {line}: {reason}")]
    MalformedEntry {
        /// The file or overlay the entry came from
        source_name: String,

        /// The 1-based line number within the source
        line: usize,

        /// Why the entry was rejected
        reason: String,
    },

    /// A bundle identity carried an unparseable version
    #[error("Invalid bundle identity: {0}")]
    InvalidVersion(#[from] VersionParseError),

    /// A location string uses a scheme that cannot be read
    #[error("Unsupported location: {0}")]
    UnsupportedLocation(String),

    /// The persisted state could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Errors related to policy enforcement.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A wiring was refused by region policy
    #[error("Package {package} is not visible to {requester}: {reason}")]
    Violation {
        /// The imported package
        package: String,

        /// The importing bundle
        requester: String,

        /// Why the wiring was refused
        reason: String,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type used throughout the API regions engine.
pub type Result<T> = std::result::Result<T, Error>;
