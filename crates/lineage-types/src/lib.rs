//! Foundation types for Lineage.
//!
//! Lineage emulates single inheritance over first-member structural
//! embedding. This crate holds the vocabulary every other Lineage crate
//! shares and has no knowledge of objects or registries.
//!
//! # Key Types
//!
//! - [`TypeKey`] -- identity of a concrete type, used as a map key everywhere
//! - [`TypeFingerprint`] -- stable, serializable hash of a type name
//! - [`BehaviorId`] -- interned identifier of a dynamically dispatched behavior
//! - [`Value`], [`ArgList`], [`ResultList`] -- type-checked call marshalling
//! - [`LineageError`] -- registration, cast, and dispatch failures

pub mod error;
pub mod identity;
pub mod value;

pub use error::{LineageError, LineageResult, SlotKind};
pub use identity::{BehaviorId, TypeFingerprint, TypeKey};
pub use value::{ArgList, ResultList, Value, ValueList};
