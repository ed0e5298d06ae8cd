use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use lineage_types::{BehaviorId, TypeKey};

use crate::composable::TypeShape;
use crate::method::MethodEntry;

/// Shared, per-real-type metadata.
///
/// Owned by the registry and referenced by the root marker of every object
/// registered with this type. Holds the memoized behavior resolutions: the
/// implementation each behavior resolves to when the receiver's real type is
/// this type. Never invalidated.
pub struct TypeMetadata {
    shape: TypeShape,
    resolved: RwLock<HashMap<BehaviorId, Arc<MethodEntry>>>,
    registrations: AtomicU64,
}

impl TypeMetadata {
    pub(crate) fn new(shape: TypeShape) -> Self {
        Self {
            shape,
            resolved: RwLock::new(HashMap::new()),
            registrations: AtomicU64::new(0),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.shape.key()
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// The real type followed by its composable ancestors.
    pub fn lineage(&self) -> Vec<TypeKey> {
        self.shape.lineage()
    }

    /// Number of objects currently bound to this type.
    ///
    /// An object rebound to another type stops counting here.
    pub fn registrations(&self) -> u64 {
        self.registrations.load(Ordering::Relaxed)
    }

    pub(crate) fn note_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn note_release(&self) {
        let _ = self
            .registrations
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Find the implementation of `behavior` by walking the chain: the real
    /// type's own table first, then each ancestor's, nearest first.
    ///
    /// Does not memoize; see [`TypeMetadata::memoize`].
    pub fn find(&self, behavior: BehaviorId) -> Option<Arc<MethodEntry>> {
        std::iter::once(self.shape)
            .chain(self.shape.ancestors())
            .find_map(|candidate| candidate.method_table().get(&behavior))
    }

    /// Previously memoized resolution of `behavior`.
    pub fn resolved(&self, behavior: &BehaviorId) -> Option<Arc<MethodEntry>> {
        self.resolved
            .read()
            .expect("lock poisoned")
            .get(behavior)
            .cloned()
    }

    /// Memoize a resolution and return the cached entry.
    ///
    /// If another thread memoized the same behavior first, its entry wins;
    /// both resolved the same chain, so they are the same implementation.
    pub fn memoize(&self, entry: Arc<MethodEntry>) -> Arc<MethodEntry> {
        let mut resolved = self.resolved.write().expect("lock poisoned");
        Arc::clone(resolved.entry(entry.behavior()).or_insert(entry))
    }

    /// Behaviors memoized so far, sorted by name.
    pub fn resolved_behaviors(&self) -> Vec<BehaviorId> {
        let resolved = self.resolved.read().expect("lock poisoned");
        let mut ids: Vec<BehaviorId> = resolved.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("key", &self.key())
            .field("registrations", &self.registrations())
            .field("resolved", &self.resolved_behaviors())
            .finish()
    }
}
