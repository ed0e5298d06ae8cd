//! Composable objects and their static shapes.
//!
//! A composable type embeds exactly one parent as its first field, all the
//! way up to [`Root`]. [`TypeShape`] describes that chain statically, so the
//! cast engine can prove reachability without an instance, while
//! [`project`] and [`project_mut`] follow the same chain on a live value.
//!
//! # Invariants
//!
//! - The embedding chain is a straight line: one parent per type.
//! - The parent is always the first member; `embedded()` returns it.
//! - Every registrable chain ends in a [`Root`].

use std::any::Any;
use std::fmt;
use std::sync::{Arc, RwLock};

use lineage_types::{LineageError, LineageResult, TypeKey};
use tracing::warn;

use crate::metadata::TypeMetadata;
use crate::method::{MethodTable, Methods};
use crate::registry::RegistrationPolicy;

/// A record that takes part in a single-inheritance chain.
///
/// Implement it with [`composable!`](crate::composable) rather than by hand.
pub trait Composable: Any + Send + Sync {
    /// Static description of this type's embedding chain and methods.
    fn shape() -> TypeShape
    where
        Self: Sized;

    /// Behaviors this type implements or overrides.
    fn define_methods(_methods: &mut Methods<Self>)
    where
        Self: Sized,
    {
    }

    /// The embedded parent value, `None` at the root.
    fn embedded(&self) -> Option<&dyn Composable>;

    /// Mutable access to the embedded parent value.
    fn embedded_mut(&mut self) -> Option<&mut dyn Composable>;

    /// The root marker at the end of the chain.
    fn root(&self) -> Option<&Root> {
        self.embedded().and_then(|parent| parent.root())
    }

    /// Static type of this value.
    fn type_key(&self) -> TypeKey;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// What a type's first field is.
#[derive(Clone, Copy)]
pub enum FirstMember {
    /// A composable parent; the walk continues into its shape.
    Embedded(fn() -> TypeShape),
    /// A field that is not itself composable; the walk stops here.
    Plain(TypeKey),
    /// The type has no fields.
    Empty,
}

impl fmt::Debug for FirstMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded(shape) => write!(f, "Embedded({:?})", shape().key()),
            Self::Plain(key) => write!(f, "Plain({key:?})"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Static shape of a composable type.
#[derive(Clone, Copy)]
pub struct TypeShape {
    key: TypeKey,
    first: FirstMember,
    methods: fn() -> MethodTable,
}

impl TypeShape {
    /// Shape of `T` with the given first member.
    pub fn new<T: Composable>(first: FirstMember) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            first,
            methods: collect_methods::<T>,
        }
    }

    /// Shape of `T` embedding `P` as its first member.
    pub fn embedding<T: Composable, P: Composable>() -> Self {
        Self::new::<T>(FirstMember::Embedded(P::shape))
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn first(&self) -> FirstMember {
        self.first
    }

    /// Shape of the embedded parent, if the first member is composable.
    pub fn parent(&self) -> Option<TypeShape> {
        match self.first {
            FirstMember::Embedded(shape) => Some(shape()),
            FirstMember::Plain(_) | FirstMember::Empty => None,
        }
    }

    /// Composable ancestors, nearest first.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    /// This type followed by all of its composable ancestors.
    pub fn lineage(&self) -> Vec<TypeKey> {
        std::iter::once(self.key)
            .chain(self.ancestors().map(|shape| shape.key()))
            .collect()
    }

    /// Build the method table this type declares (ancestors excluded).
    pub fn method_table(&self) -> MethodTable {
        (self.methods)()
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeShape")
            .field("key", &self.key)
            .field("first", &self.first)
            .finish()
    }
}

/// Iterator over a shape's composable ancestors.
pub struct Ancestors {
    next: Option<TypeShape>,
}

impl Iterator for Ancestors {
    type Item = TypeShape;

    fn next(&mut self) -> Option<TypeShape> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

fn collect_methods<T: Composable>() -> MethodTable {
    let mut methods = Methods::<T>::new();
    T::define_methods(&mut methods);
    methods.into_table()
}

/// Find the `T` embedded in `value` (or `value` itself).
pub fn project<T: Composable>(value: &dyn Composable) -> Option<&T> {
    match value.as_any().downcast_ref::<T>() {
        Some(found) => Some(found),
        None => value.embedded().and_then(|parent| project::<T>(parent)),
    }
}

/// Mutable counterpart of [`project`].
pub fn project_mut<T: Composable>(value: &mut dyn Composable) -> Option<&mut T> {
    if value.as_any().is::<T>() {
        return value.as_any_mut().downcast_mut::<T>();
    }
    value.embedded_mut().and_then(|parent| project_mut::<T>(parent))
}

// ---------------------------------------------------------------------------
// Root
// ---------------------------------------------------------------------------

/// The root marker every composable chain ends in.
///
/// A fresh marker is unbound. Registration binds it to the [`TypeMetadata`]
/// of the object's real type; until then the object has no real type.
/// Cloning yields an unbound marker, since a clone is a new object.
#[derive(Default)]
pub struct Root {
    binding: RwLock<Option<Arc<TypeMetadata>>>,
}

impl Root {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once the object has been registered.
    pub fn is_bound(&self) -> bool {
        self.binding.read().expect("lock poisoned").is_some()
    }

    /// Metadata of the object's real type, if registered.
    pub fn metadata(&self) -> Option<Arc<TypeMetadata>> {
        self.binding.read().expect("lock poisoned").clone()
    }

    /// The object's real type, if registered.
    pub fn real_type(&self) -> Option<TypeKey> {
        self.binding
            .read()
            .expect("lock poisoned")
            .as_ref()
            .map(|metadata| metadata.key())
    }

    /// Bind to `metadata`. Returns `true` if the binding changed.
    ///
    /// A rebind releases the object from the previous type's count; the
    /// caller counts it against the new one.
    pub(crate) fn bind(
        &self,
        metadata: &Arc<TypeMetadata>,
        policy: RegistrationPolicy,
    ) -> LineageResult<bool> {
        let mut binding = self.binding.write().expect("lock poisoned");
        match binding.as_ref() {
            Some(existing) if existing.key() == metadata.key() => return Ok(false),
            Some(existing) => {
                if policy == RegistrationPolicy::Strict {
                    return Err(LineageError::ConflictingRegistration {
                        registered: existing.key().name(),
                        requested: metadata.key().name(),
                    });
                }
                warn!(
                    registered = %existing.key(),
                    requested = %metadata.key(),
                    "rebinding registered object"
                );
                existing.note_release();
            }
            None => {}
        }
        *binding = Some(Arc::clone(metadata));
        Ok(true)
    }
}

impl Clone for Root {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("real_type", &self.real_type())
            .finish()
    }
}

impl Composable for Root {
    fn shape() -> TypeShape {
        TypeShape::new::<Root>(FirstMember::Plain(TypeKey::of::<
            RwLock<Option<Arc<TypeMetadata>>>,
        >()))
    }

    fn embedded(&self) -> Option<&dyn Composable> {
        None
    }

    fn embedded_mut(&mut self) -> Option<&mut dyn Composable> {
        None
    }

    fn root(&self) -> Option<&Root> {
        Some(self)
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Root>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
