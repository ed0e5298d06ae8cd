use std::sync::Arc;

use lineage_registry::{Behavior, Composable, Handle, MethodEntry, Resolver, TypeMetadata};
use lineage_types::{ArgList, BehaviorId, LineageError, LineageResult, ResultList, SlotKind};
use tracing::{debug, trace};

/// Invokes behaviors on the real type of an object.
///
/// Resolution looks at the real type's own method table first, then at each
/// ancestor's, nearest first. The result is memoized in the real type's
/// [`TypeMetadata`], so later calls skip the walk.
#[derive(Clone, Copy, Debug)]
pub struct DispatchEngine {
    memoize: bool,
}

impl DispatchEngine {
    pub fn new() -> Self {
        Self { memoize: true }
    }

    /// An engine that walks the chain on every call.
    pub fn without_cache() -> Self {
        Self { memoize: false }
    }

    pub fn memoizes(&self) -> bool {
        self.memoize
    }

    /// Find the implementation of `behavior` for the real type `metadata`
    /// describes.
    pub fn resolve(
        &self,
        metadata: &TypeMetadata,
        behavior: BehaviorId,
    ) -> LineageResult<Arc<MethodEntry>> {
        if self.memoize {
            if let Some(entry) = metadata.resolved(&behavior) {
                trace!(behavior = %behavior, real = %metadata.key(), "resolution cache hit");
                return Ok(entry);
            }
        }

        let entry = metadata
            .find(behavior)
            .ok_or(LineageError::BehaviorNotFound {
                behavior: behavior.name(),
                real_type: metadata.key().name(),
            })?;

        if !self.memoize {
            return Ok(entry);
        }
        debug!(
            behavior = %behavior,
            real = %metadata.key(),
            declared_on = %entry.declared_on(),
            "cached behavior resolution"
        );
        Ok(metadata.memoize(entry))
    }

    /// Returns `true` if the object's real type or one of its ancestors
    /// implements `behavior`.
    pub fn implements<S: Composable>(
        &self,
        handle: &Handle<S>,
        behavior: BehaviorId,
    ) -> LineageResult<bool> {
        let metadata = handle.metadata()?;
        match self.resolve(&metadata, behavior) {
            Ok(_) => Ok(true),
            Err(LineageError::BehaviorNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Invoke `behavior` on the object behind `handle`.
    ///
    /// The implementation is chosen by the object's real type, regardless of
    /// the type the handle views it at. Shared-receiver implementations run
    /// under the object's read lock and exclusive ones under its write lock.
    /// A body that needs another behavior of its object calls it through its
    /// receiver, which this engine resolves; going through another handle to
    /// the same object would wait on that lock.
    pub fn invoke<S, A, R>(
        &self,
        handle: &Handle<S>,
        behavior: &Behavior<A, R>,
        args: A,
    ) -> LineageResult<R>
    where
        S: Composable,
        A: ArgList,
        R: ResultList,
    {
        let metadata = handle.metadata()?;
        let entry = self.resolve(&metadata, behavior.id())?;
        let results = entry.call(handle, args.into_values(), self)?;
        R::from_values(behavior.name(), SlotKind::Result, results)
    }
}

impl Resolver for DispatchEngine {
    fn resolve(
        &self,
        metadata: &TypeMetadata,
        behavior: BehaviorId,
    ) -> LineageResult<Arc<MethodEntry>> {
        DispatchEngine::resolve(self, metadata, behavior)
    }
}

impl Default for DispatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
