//! Behavior references and per-type method tables.
//!
//! A [`Behavior`] names a dynamically dispatched operation and fixes its
//! signature at the call site. Each composable type fills a [`Methods`]
//! builder with the behaviors it implements; the builder erases them into
//! [`MethodEntry`] values that the dispatch engine resolves and caches.
//!
//! Bodies defined with [`Methods::define_with`] or
//! [`Methods::define_mut_with`] receive a [`Receiver`] or [`ReceiverMut`]
//! instead of a bare reference. Through it a body can invoke other behaviors
//! on its own object, dispatched on the real type, without locking the
//! object a second time.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use lineage_types::{
    ArgList, BehaviorId, LineageError, LineageResult, ResultList, SlotKind, TypeKey, Value,
};
use serde::Serialize;

use crate::composable::{project, project_mut, Composable};
use crate::metadata::TypeMetadata;
use crate::object::Handle;

const RECEIVER_CHECKED: &str = "receiver is projected before the body runs";

/// Typed reference to a behavior with arguments `A` and results `R`.
///
/// Declare one constant per behavior next to the type that introduces it:
///
/// ```
/// use lineage_registry::Behavior;
///
/// const AREA: Behavior<(), (f64,)> = Behavior::new("Shape::area");
/// assert_eq!(AREA.name(), "Shape::area");
/// ```
pub struct Behavior<A, R> {
    id: BehaviorId,
    _signature: PhantomData<fn(A) -> R>,
}

impl<A, R> Behavior<A, R> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            id: BehaviorId::new(name),
            _signature: PhantomData,
        }
    }

    pub const fn id(&self) -> BehaviorId {
        self.id
    }

    pub const fn name(&self) -> &'static str {
        self.id.name()
    }
}

impl<A, R> Clone for Behavior<A, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A, R> Copy for Behavior<A, R> {}

impl<A, R> fmt::Debug for Behavior<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Behavior({})", self.id)
    }
}

/// Finds the implementation a behavior resolves to for a real type.
///
/// The dispatch engine implements this; receivers use it for calls made
/// from inside a body.
pub trait Resolver {
    fn resolve(
        &self,
        metadata: &TypeMetadata,
        behavior: BehaviorId,
    ) -> LineageResult<Arc<MethodEntry>>;
}

/// How an implementation borrows its receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverKind {
    /// `&T`: runs under the object's read lock.
    Shared,
    /// `&mut T`: runs under the object's write lock.
    Exclusive,
}

/// Argument and result type names of an implementation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub args: Vec<&'static str>,
    pub results: Vec<&'static str>,
}

impl Signature {
    pub fn of<A: ArgList, R: ResultList>() -> Self {
        Self {
            args: A::type_names(),
            results: R::type_names(),
        }
    }
}

type SharedBody = dyn Fn(&dyn Composable, Vec<Value>, &dyn Resolver) -> LineageResult<Vec<Value>>
    + Send
    + Sync;
type ExclusiveBody = dyn Fn(&mut dyn Composable, Vec<Value>, &dyn Resolver) -> LineageResult<Vec<Value>>
    + Send
    + Sync;

#[derive(Clone)]
enum Body {
    Shared(Arc<SharedBody>),
    Exclusive(Arc<ExclusiveBody>),
}

/// A type-erased implementation of one behavior on one type.
#[derive(Clone)]
pub struct MethodEntry {
    behavior: BehaviorId,
    declared_on: TypeKey,
    signature: Signature,
    body: Body,
}

impl MethodEntry {
    pub fn behavior(&self) -> BehaviorId {
        self.behavior
    }

    /// The type whose method table defined this implementation.
    pub fn declared_on(&self) -> TypeKey {
        self.declared_on
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn receiver(&self) -> ReceiverKind {
        match self.body {
            Body::Shared(_) => ReceiverKind::Shared,
            Body::Exclusive(_) => ReceiverKind::Exclusive,
        }
    }

    /// Run the implementation against the object behind `handle`.
    ///
    /// Takes the object's read lock for shared receivers and its write lock
    /// for exclusive ones, for the duration of the call. Behaviors the body
    /// invokes through its receiver are resolved by `resolver` and run under
    /// the same lock.
    pub fn call<T: Composable>(
        &self,
        handle: &Handle<T>,
        args: Vec<Value>,
        resolver: &dyn Resolver,
    ) -> LineageResult<Vec<Value>> {
        match &self.body {
            Body::Shared(body) => {
                let value = handle.erased();
                body(&**value, args, resolver)
            }
            Body::Exclusive(body) => {
                let mut value = handle.erased_mut();
                body(&mut **value, args, resolver)
            }
        }
    }

    fn call_shared(
        &self,
        object: &dyn Composable,
        args: Vec<Value>,
        resolver: &dyn Resolver,
    ) -> LineageResult<Vec<Value>> {
        match &self.body {
            Body::Shared(body) => body(object, args, resolver),
            Body::Exclusive(_) => Err(LineageError::ExclusiveReceiverUnavailable {
                behavior: self.behavior.name(),
            }),
        }
    }

    fn call_exclusive(
        &self,
        object: &mut dyn Composable,
        args: Vec<Value>,
        resolver: &dyn Resolver,
    ) -> LineageResult<Vec<Value>> {
        match &self.body {
            Body::Shared(body) => body(&*object, args, resolver),
            Body::Exclusive(body) => body(object, args, resolver),
        }
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("behavior", &self.behavior)
            .field("declared_on", &self.declared_on)
            .field("receiver", &self.receiver())
            .field("signature", &self.signature)
            .finish()
    }
}

fn resolve_on(
    object: &dyn Composable,
    resolver: &dyn Resolver,
    behavior: BehaviorId,
) -> LineageResult<Arc<MethodEntry>> {
    let metadata = object
        .root()
        .and_then(|root| root.metadata())
        .ok_or(LineageError::UninitializedObject {
            type_name: object.type_key().name(),
        })?;
    resolver.resolve(&metadata, behavior)
}

// ---------------------------------------------------------------------------
// Receivers
// ---------------------------------------------------------------------------

/// Shared receiver handed to bodies defined with [`Methods::define_with`].
///
/// Derefs to the `T` part of the object.
pub struct Receiver<'a, T> {
    this: &'a T,
    object: &'a dyn Composable,
    resolver: &'a dyn Resolver,
}

impl<'a, T: Composable> Receiver<'a, T> {
    /// The `T` part of the object, for the whole borrow.
    pub fn get(&self) -> &'a T {
        self.this
    }

    /// Invoke `behavior` on this object, dispatched on its real type.
    ///
    /// Fails with `ExclusiveReceiverUnavailable` if the behavior resolves to
    /// an exclusive implementation.
    pub fn invoke<A: ArgList, R: ResultList>(
        &self,
        behavior: &Behavior<A, R>,
        args: A,
    ) -> LineageResult<R> {
        let entry = resolve_on(self.object, self.resolver, behavior.id())?;
        let results = entry.call_shared(self.object, args.into_values(), self.resolver)?;
        R::from_values(behavior.name(), SlotKind::Result, results)
    }
}

impl<T> Deref for Receiver<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.this
    }
}

/// Exclusive receiver handed to bodies defined with
/// [`Methods::define_mut_with`].
pub struct ReceiverMut<'a, T> {
    object: &'a mut dyn Composable,
    resolver: &'a dyn Resolver,
    _view: PhantomData<fn() -> T>,
}

impl<T: Composable> ReceiverMut<'_, T> {
    /// Invoke `behavior` on this object, dispatched on its real type.
    pub fn invoke<A: ArgList, R: ResultList>(
        &mut self,
        behavior: &Behavior<A, R>,
        args: A,
    ) -> LineageResult<R> {
        let entry = resolve_on(&*self.object, self.resolver, behavior.id())?;
        let results = entry.call_exclusive(&mut *self.object, args.into_values(), self.resolver)?;
        R::from_values(behavior.name(), SlotKind::Result, results)
    }
}

impl<T: Composable> Deref for ReceiverMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        project::<T>(&*self.object).expect(RECEIVER_CHECKED)
    }
}

impl<T: Composable> DerefMut for ReceiverMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        project_mut::<T>(&mut *self.object).expect(RECEIVER_CHECKED)
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// The behaviors one type declares, keyed by behavior.
#[derive(Clone, Debug, Default)]
pub struct MethodTable {
    entries: HashMap<BehaviorId, Arc<MethodEntry>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, behavior: &BehaviorId) -> Option<Arc<MethodEntry>> {
        self.entries.get(behavior).cloned()
    }

    pub fn contains(&self, behavior: &BehaviorId) -> bool {
        self.entries.contains_key(behavior)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared behaviors, sorted by name.
    pub fn behaviors(&self) -> Vec<BehaviorId> {
        let mut ids: Vec<BehaviorId> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }

    fn insert(&mut self, entry: MethodEntry) {
        self.entries.insert(entry.behavior, Arc::new(entry));
    }
}

/// Builder handed to [`Composable::define_methods`].
pub struct Methods<T> {
    table: MethodTable,
    _owner: PhantomData<fn(&T)>,
}

impl<T: Composable> Methods<T> {
    pub(crate) fn new() -> Self {
        Self {
            table: MethodTable::new(),
            _owner: PhantomData,
        }
    }

    /// Implement `behavior` with a shared receiver.
    pub fn define<A, R, F>(&mut self, behavior: &Behavior<A, R>, body: F) -> &mut Self
    where
        A: ArgList,
        R: ResultList,
        F: Fn(&T, A) -> R + Send + Sync + 'static,
    {
        self.define_with(behavior, move |this: Receiver<'_, T>, args| Ok(body(this.get(), args)))
    }

    /// Implement `behavior` with a shared receiver that can invoke other
    /// behaviors on its object.
    pub fn define_with<A, R, F>(&mut self, behavior: &Behavior<A, R>, body: F) -> &mut Self
    where
        A: ArgList,
        R: ResultList,
        F: Fn(Receiver<'_, T>, A) -> LineageResult<R> + Send + Sync + 'static,
    {
        let id = behavior.id();
        let erased = move |object: &dyn Composable,
                           args: Vec<Value>,
                           resolver: &dyn Resolver|
              -> LineageResult<Vec<Value>> {
            let real_type = object.type_key().name();
            let this =
                project::<T>(object).ok_or_else(|| receiver_mismatch::<T>(id, real_type))?;
            let args = A::from_values(id.name(), SlotKind::Argument, args)?;
            let receiver = Receiver {
                this,
                object,
                resolver,
            };
            Ok(body(receiver, args)?.into_values())
        };
        self.table.insert(MethodEntry {
            behavior: id,
            declared_on: TypeKey::of::<T>(),
            signature: Signature::of::<A, R>(),
            body: Body::Shared(Arc::new(erased)),
        });
        self
    }

    /// Implement `behavior` with an exclusive receiver.
    pub fn define_mut<A, R, F>(&mut self, behavior: &Behavior<A, R>, body: F) -> &mut Self
    where
        A: ArgList,
        R: ResultList,
        F: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        self.define_mut_with(behavior, move |mut this: ReceiverMut<'_, T>, args| {
            Ok(body(&mut *this, args))
        })
    }

    /// Implement `behavior` with an exclusive receiver that can invoke other
    /// behaviors on its object.
    pub fn define_mut_with<A, R, F>(&mut self, behavior: &Behavior<A, R>, body: F) -> &mut Self
    where
        A: ArgList,
        R: ResultList,
        F: Fn(ReceiverMut<'_, T>, A) -> LineageResult<R> + Send + Sync + 'static,
    {
        let id = behavior.id();
        let erased = move |object: &mut dyn Composable,
                           args: Vec<Value>,
                           resolver: &dyn Resolver|
              -> LineageResult<Vec<Value>> {
            if project::<T>(&*object).is_none() {
                return Err(receiver_mismatch::<T>(id, object.type_key().name()));
            }
            let args = A::from_values(id.name(), SlotKind::Argument, args)?;
            let receiver = ReceiverMut {
                object,
                resolver,
                _view: PhantomData,
            };
            Ok(body(receiver, args)?.into_values())
        };
        self.table.insert(MethodEntry {
            behavior: id,
            declared_on: TypeKey::of::<T>(),
            signature: Signature::of::<A, R>(),
            body: Body::Exclusive(Arc::new(erased)),
        });
        self
    }

    pub(crate) fn into_table(self) -> MethodTable {
        self.table
    }
}

fn receiver_mismatch<T>(behavior: BehaviorId, real_type: &'static str) -> LineageError {
    LineageError::ReceiverMismatch {
        behavior: behavior.name(),
        declared_on: type_name::<T>(),
        real_type,
    }
}
