use std::sync::Arc;

use lineage_registry::{CacheStats, Composable, Handle, TypeMetadata, TypeRegistry};
use lineage_types::{LineageResult, TypeKey};
use tracing::{debug, trace};

use crate::walk;

/// Casts handles along the embedding chain of the object's real type.
///
/// Verdicts are computed per `(real type, target type)` pair and cached in
/// the registry's [`CastCache`](lineage_registry::CastCache), so every cast
/// after the first for a pair is a single map lookup, whichever engine made
/// the first. A negative verdict is not an error; the only failure is an
/// unregistered object.
#[derive(Debug)]
pub struct CastEngine {
    registry: Arc<TypeRegistry>,
    memoize: bool,
}

impl CastEngine {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            memoize: true,
        }
    }

    /// An engine that walks the chain on every cast and never touches the
    /// registry's cache.
    pub fn without_cache(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            memoize: false,
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Can an object whose real type is described by `metadata` be viewed
    /// as `target`?
    pub fn verdict(&self, metadata: &TypeMetadata, target: TypeKey) -> bool {
        let real = metadata.key();
        if real == target {
            return true;
        }

        if !self.memoize {
            return walk::embeds(metadata.shape(), target);
        }
        let cache = self.registry.cast_cache();
        if let Some(verdict) = cache.lookup(real, target) {
            trace!(real = %real, target = %target, verdict, "cast cache hit");
            return verdict;
        }

        let verdict = walk::embeds(metadata.shape(), target);
        debug!(real = %real, target = %target, verdict, "recorded cast verdict");
        cache.record(real, target, verdict)
    }

    /// Verdict for two type keys, if `real` is known to the registry.
    pub fn relates(&self, real: TypeKey, target: TypeKey) -> Option<bool> {
        let metadata = self.registry.lookup(real)?;
        Some(self.verdict(&metadata, target))
    }

    /// Returns `true` if the object behind `handle` can be viewed as `T`.
    pub fn is_castable<T: Composable, S: Composable>(
        &self,
        handle: &Handle<S>,
    ) -> LineageResult<bool> {
        let metadata = handle.metadata()?;
        Ok(self.verdict(&metadata, TypeKey::of::<T>()))
    }

    /// Checked cast: view the object behind `handle` as `T`.
    ///
    /// Returns `Ok(None)` when the object's real type does not embed `T`,
    /// and `UninitializedObject` when the object was never registered. The
    /// returned handle aliases the same storage.
    pub fn try_cast<T: Composable, S: Composable>(
        &self,
        handle: &Handle<S>,
    ) -> LineageResult<Option<Handle<T>>> {
        if !self.is_castable::<T, S>(handle)? {
            return Ok(None);
        }
        Ok(handle.project::<T>())
    }

    /// Unchecked cast.
    ///
    /// # Panics
    ///
    /// Panics if the object behind `handle` was never registered.
    pub fn cast<T: Composable, S: Composable>(&self, handle: &Handle<S>) -> Option<Handle<T>> {
        match self.try_cast::<T, S>(handle) {
            Ok(cast) => cast,
            Err(err) => panic!("{err}"),
        }
    }

    /// Counters of the registry's verdict cache, `None` for an uncached
    /// engine.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.memoize.then(|| self.registry.cast_cache().stats())
    }
}
