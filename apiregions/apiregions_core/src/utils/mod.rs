//! Utility functions and types.
//!
//! This module provides the version type, environment and property-value
//! configuration helpers, and log levels.

pub mod config;
pub mod logging;
pub mod version;

pub use config::{split_list, Environment, MapEnvironment, PropertyValue, SystemEnvironment};
pub use logging::LogLevel;
pub use version::{Version, VersionParseError};
