//! Policy enforcement.
//!
//! This module derives the effective policy from a configuration snapshot
//! and provides the resolver hooks that enforce it.

mod enforcer;
mod hook;
mod policy;

pub use enforcer::{RegionEnforcer, ResolverHookFactory};
pub use hook::{AcceptAllHook, RegionResolverHook, ResolverHook};
pub use policy::{join_regions_to_global, EffectivePolicy};
