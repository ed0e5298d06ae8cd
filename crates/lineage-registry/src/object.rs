use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lineage_types::{LineageError, LineageResult, TypeKey};

use crate::composable::{project, project_mut, Composable};
use crate::metadata::TypeMetadata;

const VIEW_CHECKED: &str = "handle view is checked when the handle is created";

type Cell = Arc<RwLock<Box<dyn Composable>>>;

/// A view of one composable object at static type `T`.
///
/// The object is stored once, at its real type. Every handle produced from
/// it (by cloning, casting, or [`Handle::project`]) aliases that same
/// storage, so a mutation through any handle is visible through all of
/// them. A `Handle<T>` exists only if the object embeds a `T`.
pub struct Handle<T> {
    cell: Cell,
    _view: PhantomData<fn() -> T>,
}

impl<T: Composable> Handle<T> {
    /// Take ownership of a freshly constructed value.
    ///
    /// The object is not registered yet; pass the handle to
    /// `TypeRegistry::register` before casting or dispatching on it.
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(RwLock::new(Box::new(value))),
            _view: PhantomData,
        }
    }

    /// Shared access to the `T` part of the object.
    pub fn read(&self) -> View<'_, T> {
        View {
            value: self.erased(),
            _view: PhantomData,
        }
    }

    /// Exclusive access to the `T` part of the object.
    pub fn write(&self) -> ViewMut<'_, T> {
        ViewMut {
            value: self.erased_mut(),
            _view: PhantomData,
        }
    }

    /// View the same object at type `U`, if it embeds a `U`.
    ///
    /// This checks the live value only; it neither requires registration nor
    /// consults any cache. Casts go through the cast engine instead.
    pub fn project<U: Composable>(&self) -> Option<Handle<U>> {
        let value = self.erased();
        project::<U>(&**value)?;
        Some(Handle {
            cell: Arc::clone(&self.cell),
            _view: PhantomData,
        })
    }

    /// The static type this handle views the object at.
    pub fn view_type(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    /// Type of the stored value, whether or not it was registered.
    pub fn value_type(&self) -> TypeKey {
        self.erased().type_key()
    }

    /// Returns `true` once the object has been registered.
    pub fn is_registered(&self) -> bool {
        self.erased().root().is_some_and(|root| root.is_bound())
    }

    /// Metadata of the object's real type.
    pub fn metadata(&self) -> LineageResult<Arc<TypeMetadata>> {
        let value = self.erased();
        value
            .root()
            .and_then(|root| root.metadata())
            .ok_or(LineageError::UninitializedObject {
                type_name: value.type_key().name(),
            })
    }

    /// The object's real type, fixed at registration.
    pub fn real_type(&self) -> LineageResult<TypeKey> {
        self.metadata().map(|metadata| metadata.key())
    }

    /// Returns `true` if both handles alias the same object.
    pub fn ptr_eq<U>(&self, other: &Handle<U>) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Address of the object's storage; equal for every alias.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.cell) as usize
    }

    pub(crate) fn erased(&self) -> RwLockReadGuard<'_, Box<dyn Composable>> {
        self.cell.read().expect("lock poisoned")
    }

    pub(crate) fn erased_mut(&self) -> RwLockWriteGuard<'_, Box<dyn Composable>> {
        self.cell.write().expect("lock poisoned")
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            _view: PhantomData,
        }
    }
}

impl<T: Composable> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("view", &self.view_type())
            .field("addr", &format_args!("{:#x}", self.addr()))
            .finish()
    }
}

/// Read guard over the `T` part of an object.
pub struct View<'a, T> {
    value: RwLockReadGuard<'a, Box<dyn Composable>>,
    _view: PhantomData<&'a T>,
}

impl<T: Composable> Deref for View<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        project::<T>(&**self.value).expect(VIEW_CHECKED)
    }
}

/// Write guard over the `T` part of an object.
pub struct ViewMut<'a, T> {
    value: RwLockWriteGuard<'a, Box<dyn Composable>>,
    _view: PhantomData<&'a mut T>,
}

impl<T: Composable> Deref for ViewMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        project::<T>(&**self.value).expect(VIEW_CHECKED)
    }
}

impl<T: Composable> DerefMut for ViewMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        project_mut::<T>(&mut **self.value).expect(VIEW_CHECKED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composable::Root;
    use crate::fixtures::{Animal, Cat, Dog};
    use crate::TypeRegistry;

    fn dog() -> Handle<Dog> {
        Handle::new(Dog {
            animal: Animal::named("rex"),
            breed: "collie".into(),
        })
    }

    #[test]
    fn new_handle_is_unregistered() {
        let handle = dog();
        assert!(!handle.is_registered());
        assert_eq!(
            handle.real_type(),
            Err(LineageError::UninitializedObject {
                type_name: std::any::type_name::<Dog>(),
            })
        );
    }

    #[test]
    fn real_type_after_registration() {
        let registry = TypeRegistry::new();
        let handle = dog();
        registry.register(&handle).unwrap();
        assert!(handle.is_registered());
        assert_eq!(handle.real_type().unwrap(), TypeKey::of::<Dog>());
    }

    #[test]
    fn project_aliases_the_same_storage() {
        let handle = dog();
        let animal = handle.project::<Animal>().expect("dog embeds animal");
        assert!(animal.ptr_eq(&handle));
        assert_eq!(animal.addr(), handle.addr());
        assert_eq!(animal.view_type(), TypeKey::of::<Animal>());
        assert_eq!(animal.value_type(), TypeKey::of::<Dog>());
    }

    #[test]
    fn project_refuses_unrelated_types() {
        assert!(dog().project::<Cat>().is_none());
    }

    #[test]
    fn project_back_down_from_ancestor_view() {
        let animal = dog().project::<Animal>().unwrap();
        let back = animal.project::<Dog>().expect("value is a dog");
        assert_eq!(back.read().breed, "collie");
        assert!(animal.project::<Root>().is_some());
    }

    #[test]
    fn writes_are_visible_through_every_alias() {
        let handle = dog();
        let animal = handle.project::<Animal>().unwrap();
        handle.write().animal.name = "max".into();
        assert_eq!(animal.read().name, "max");

        animal.write().name = "bo".into();
        assert_eq!(handle.read().animal.name, "bo");
    }

    #[test]
    fn clones_alias() {
        let handle = dog();
        let copy = handle.clone();
        assert!(copy.ptr_eq(&handle));
    }

    #[test]
    fn distinct_objects_have_distinct_addresses() {
        assert_ne!(dog().addr(), dog().addr());
    }

    #[test]
    fn debug_names_the_view() {
        let debug = format!("{:?}", dog());
        assert!(debug.contains("Handle"));
        assert!(debug.contains("Dog"));
    }
}
