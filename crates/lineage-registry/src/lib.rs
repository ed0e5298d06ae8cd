//! Type registry for Lineage.
//!
//! A composable type embeds exactly one parent as its first field, up to a
//! [`Root`] marker. Objects are stored once, at their real type, and viewed
//! through [`Handle`]s at any type on that chain. Registering an object binds
//! its root marker to the shared [`TypeMetadata`] of its real type, which is
//! what the cast and dispatch engines consult.
//!
//! # Key Types
//!
//! - [`Composable`], [`TypeShape`] -- the embedding chain, statically and on live values
//! - [`Root`] -- per-object marker bound at registration
//! - [`Handle`], [`View`], [`ViewMut`] -- aliasing views of one object
//! - [`Behavior`], [`Methods`], [`MethodTable`] -- per-type behavior implementations
//! - [`Receiver`], [`ReceiverMut`] -- a body's view of its object, for calls back into it
//! - [`TypeRegistry`], [`TypeMetadata`] -- real-type bookkeeping
//! - [`CastCache`] -- the registry's append-only `(real, target) -> verdict` memo
//! - [`RegistrySnapshot`] -- serializable diagnostics
//!
//! # Design Rules
//!
//! 1. Register every object once, right after construction.
//! 2. Metadata is created lazily and lives as long as the registry.
//! 3. A handle can only exist at a type the object actually embeds.

pub mod cast_cache;
pub mod composable;
pub mod metadata;
pub mod method;
pub mod object;
pub mod registry;
pub mod snapshot;

mod macros;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cast_cache::{CacheStats, CastCache};
pub use composable::{project, project_mut, Ancestors, Composable, FirstMember, Root, TypeShape};
pub use metadata::TypeMetadata;
pub use method::{
    Behavior, MethodEntry, MethodTable, Methods, Receiver, ReceiverKind, ReceiverMut, Resolver,
    Signature,
};
pub use object::{Handle, View, ViewMut};
pub use registry::{RegistrationPolicy, TypeRegistry};
pub use snapshot::{RegistrySnapshot, TypeSummary};

pub use lineage_types::{BehaviorId, LineageError, LineageResult, TypeKey};
