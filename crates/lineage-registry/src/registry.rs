//! The type registry.
//!
//! [`TypeRegistry`] maps each real type to its shared [`TypeMetadata`] and
//! binds freshly constructed objects to it. It is an ordinary value: build
//! one per application and share it by `Arc` with the cast and dispatch
//! engines.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use lineage_types::{LineageError, LineageResult, TypeKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cast_cache::CastCache;
use crate::composable::{Composable, TypeShape};
use crate::metadata::TypeMetadata;
use crate::object::Handle;
use crate::snapshot::RegistrySnapshot;

/// What registering an already registered object as another type does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// Fail with [`LineageError::ConflictingRegistration`].
    #[default]
    Strict,
    /// Rebind the object to the new type, logging a warning.
    Rebind,
}

/// Registry of per-type metadata and of the cast verdicts between types.
pub struct TypeRegistry {
    types: RwLock<HashMap<TypeKey, Arc<TypeMetadata>>>,
    casts: CastCache,
    policy: RegistrationPolicy,
}

impl TypeRegistry {
    /// Create an empty registry with the strict policy.
    pub fn new() -> Self {
        Self::with_policy(RegistrationPolicy::Strict)
    }

    pub fn with_policy(policy: RegistrationPolicy) -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
            casts: CastCache::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// Cast verdicts recorded by the engines sharing this registry.
    pub fn cast_cache(&self) -> &CastCache {
        &self.casts
    }

    /// Metadata for `T`, created on first use.
    pub fn metadata<T: Composable>(&self) -> Arc<TypeMetadata> {
        self.metadata_for(T::shape())
    }

    /// Metadata for the type `shape` describes, created on first use.
    pub fn metadata_for(&self, shape: TypeShape) -> Arc<TypeMetadata> {
        let key = shape.key();
        if let Some(existing) = self.types.read().expect("lock poisoned").get(&key) {
            return Arc::clone(existing);
        }

        let mut types = self.types.write().expect("lock poisoned");
        let metadata = types.entry(key).or_insert_with(|| {
            debug!(real = %key, "created type metadata");
            Arc::new(TypeMetadata::new(shape))
        });
        Arc::clone(metadata)
    }

    /// Metadata for `key`, if that type was ever registered.
    pub fn lookup(&self, key: TypeKey) -> Option<Arc<TypeMetadata>> {
        self.types.read().expect("lock poisoned").get(&key).cloned()
    }

    /// Bind the object behind `handle` to its real type `T`.
    ///
    /// Call once, right after construction, with the handle returned by
    /// [`Handle::new`]. Registering again as `T` is a no-op; registering as
    /// another type follows the registry's [`RegistrationPolicy`].
    pub fn register<T: Composable>(&self, handle: &Handle<T>) -> LineageResult<Arc<TypeMetadata>> {
        let value = handle.erased();
        let root = value.root().ok_or(LineageError::MissingRootMarker {
            type_name: value.type_key().name(),
        })?;
        let requested = TypeKey::of::<T>();
        if self.policy == RegistrationPolicy::Strict {
            if let Some(registered) = root.real_type().filter(|key| *key != requested) {
                return Err(LineageError::ConflictingRegistration {
                    registered: registered.name(),
                    requested: requested.name(),
                });
            }
        }
        let metadata = self.metadata::<T>();
        if root.bind(&metadata, self.policy)? {
            metadata.note_registration();
            trace!(real = %metadata.key(), "registered object");
        }
        Ok(metadata)
    }

    /// Construct-and-register in one step.
    pub fn init<T: Composable>(&self, value: T) -> LineageResult<Handle<T>> {
        let handle = Handle::new(value);
        self.register(&handle)?;
        Ok(handle)
    }

    /// The real type the object behind `handle` was registered with.
    pub fn real_type_of<T: Composable>(&self, handle: &Handle<T>) -> LineageResult<TypeKey> {
        handle.real_type()
    }

    /// Metadata of the object's real type.
    pub fn metadata_of<T: Composable>(&self, handle: &Handle<T>) -> LineageResult<Arc<TypeMetadata>> {
        handle.metadata()
    }

    /// Number of types with metadata.
    pub fn len(&self) -> usize {
        self.types.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().expect("lock poisoned").is_empty()
    }

    /// All known types, sorted by name.
    pub fn keys(&self) -> Vec<TypeKey> {
        let types = self.types.read().expect("lock poisoned");
        let mut keys: Vec<TypeKey> = types.keys().copied().collect();
        keys.sort_by_key(|key| key.name());
        keys
    }

    /// Serializable summary of every known type.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let types = self.types.read().expect("lock poisoned");
        RegistrySnapshot::from_metadata(types.values().map(Arc::as_ref))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("type_count", &self.len())
            .field("cast_verdicts", &self.casts.len())
            .field("policy", &self.policy)
            .finish()
    }
}
