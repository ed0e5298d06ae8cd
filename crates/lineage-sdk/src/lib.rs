//! High-level SDK for Lineage.
//!
//! Lineage emulates single inheritance over structural embedding: a derived
//! type holds its parent as its first field, objects are registered with
//! their real type once, and from then on any handle to them can be cast
//! along the embedding chain and dispatched on by real type.
//!
//! ```
//! use lineage_sdk::prelude::*;
//!
//! const NAME: Behavior<(), (String,)> = Behavior::new("Base::name");
//!
//! #[derive(Default)]
//! struct Base {
//!     root: Root,
//!     val: i32,
//! }
//!
//! struct Derived {
//!     base: Base,
//!     extra: String,
//! }
//!
//! composable!(Base: root => Root, |methods| {
//!     methods.define(&NAME, |_: &Base, ()| ("base".to_string(),));
//! });
//! composable!(Derived: base => Base, |methods| {
//!     methods.define(&NAME, |d: &Derived, ()| (format!("derived {}", d.extra),));
//! });
//!
//! # fn main() -> lineage_sdk::SdkResult<()> {
//! let lineage = Lineage::new();
//! let derived = lineage.init(Derived {
//!     base: Base { val: 1, ..Default::default() },
//!     extra: "x".into(),
//! })?;
//!
//! let base = lineage.try_cast::<Base, _>(&derived)?.expect("derived embeds base");
//! assert_eq!(base.read().val, 1);
//!
//! let (name,) = lineage.invoke(&base, &NAME, ())?;
//! assert_eq!(name, "derived x");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod runtime;

pub use config::RuntimeConfig;
pub use error::{SdkError, SdkResult};
pub use runtime::Lineage;

// Re-export key types
pub use lineage_cast::CacheStats;
pub use lineage_registry::{
    composable, Behavior, Composable, Handle, Receiver, ReceiverMut, RegistrationPolicy,
    RegistrySnapshot, Root, TypeSummary, View, ViewMut,
};
pub use lineage_types::{BehaviorId, LineageError, TypeKey};

/// Everything needed to declare composable types and use a runtime.
pub mod prelude {
    pub use crate::{
        composable, Behavior, Composable, Handle, Lineage, LineageError, Receiver, ReceiverMut,
        Root, RuntimeConfig, SdkError, SdkResult, TypeKey,
    };
}
