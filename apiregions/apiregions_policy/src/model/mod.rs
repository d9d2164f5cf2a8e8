//! Resolution model.
//!
//! This module defines the types exchanged with the host resolver.

mod decision;
mod resolution;

pub use decision::{Verdict, WiringDecision};
pub use resolution::{BundleRevision, Capability, Requirement, PACKAGE_NAMESPACE};
