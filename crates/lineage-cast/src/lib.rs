//! Cast engine for Lineage.
//!
//! Casting re-views a registered object at another type on its embedding
//! chain. Upcasts and downcasts are the same operation: the engine looks at
//! the object's real type, not at the handle's static view, and succeeds iff
//! the real type embeds the target. Results alias the original storage.
//!
//! # Key Types
//!
//! - [`CastEngine`] -- checked (`try_cast`) and unchecked (`cast`) casts
//! - [`CastCache`] -- append-only `(real, target) -> verdict` memo, owned by the registry
//! - [`walk`] -- the first-member chain walk behind every verdict

pub mod engine;
pub mod walk;

#[cfg(test)]
pub(crate) mod fixtures;

pub use lineage_registry::{CacheStats, CastCache};
pub use engine::CastEngine;
