//! Dynamic dispatch engine for Lineage.
//!
//! Behaviors are declared as typed [`Behavior`](lineage_registry::Behavior)
//! constants and implemented per type through `Composable::define_methods`.
//! [`DispatchEngine::invoke`] picks the implementation from the object's
//! real type, so calling through an ancestor view still reaches the most
//! derived override.

pub mod engine;

#[cfg(test)]
pub(crate) mod fixtures;

pub use engine::DispatchEngine;
