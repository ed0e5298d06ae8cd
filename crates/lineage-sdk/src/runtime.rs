use std::sync::Arc;

use lineage_cast::{CacheStats, CastEngine};
use lineage_dispatch::DispatchEngine;
use lineage_registry::{
    Behavior, Composable, Handle, RegistrySnapshot, TypeMetadata, TypeRegistry,
};
use lineage_types::{ArgList, BehaviorId, ResultList, TypeKey};
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::error::SdkResult;

/// High-level Lineage runtime.
///
/// Owns one registry and the cast and dispatch engines built on it. Objects
/// registered through one runtime are only known to that runtime.
#[derive(Debug)]
pub struct Lineage {
    config: RuntimeConfig,
    registry: Arc<TypeRegistry>,
    casts: CastEngine,
    dispatch: DispatchEngine,
}

impl Lineage {
    /// A runtime with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let registry = Arc::new(TypeRegistry::with_policy(config.registration));
        let casts = if config.cast_cache {
            CastEngine::new(Arc::clone(&registry))
        } else {
            CastEngine::without_cache(Arc::clone(&registry))
        };
        let dispatch = if config.dispatch_cache {
            DispatchEngine::new()
        } else {
            DispatchEngine::without_cache()
        };
        debug!(
            cast_cache = config.cast_cache,
            dispatch_cache = config.dispatch_cache,
            registration = ?config.registration,
            "lineage runtime created"
        );
        Self {
            config,
            registry,
            casts,
            dispatch,
        }
    }

    /// A runtime configured from a TOML document.
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        Ok(Self::with_config(RuntimeConfig::from_toml_str(s)?))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    // ---- Registration ----

    /// Take ownership of `value` and register it as its real type `T`.
    pub fn init<T: Composable>(&self, value: T) -> SdkResult<Handle<T>> {
        Ok(self.registry.init(value)?)
    }

    /// Register an object created with [`Handle::new`].
    pub fn register<T: Composable>(&self, handle: &Handle<T>) -> SdkResult<Arc<TypeMetadata>> {
        Ok(self.registry.register(handle)?)
    }

    pub fn real_type_of<T: Composable>(&self, handle: &Handle<T>) -> SdkResult<TypeKey> {
        Ok(self.registry.real_type_of(handle)?)
    }

    // ---- Casts ----

    /// Checked cast; `Ok(None)` when the object does not embed a `T`.
    pub fn try_cast<T: Composable, S: Composable>(
        &self,
        handle: &Handle<S>,
    ) -> SdkResult<Option<Handle<T>>> {
        Ok(self.casts.try_cast::<T, S>(handle)?)
    }

    /// Unchecked cast.
    ///
    /// # Panics
    ///
    /// Panics if the object behind `handle` was never registered.
    pub fn cast<T: Composable, S: Composable>(&self, handle: &Handle<S>) -> Option<Handle<T>> {
        self.casts.cast::<T, S>(handle)
    }

    /// Cast cache counters, `None` when the cast cache is disabled.
    pub fn cast_stats(&self) -> Option<CacheStats> {
        self.casts.cache_stats()
    }

    // ---- Dispatch ----

    /// Invoke `behavior` on the real type of the object behind `handle`.
    pub fn invoke<S, A, R>(
        &self,
        handle: &Handle<S>,
        behavior: &Behavior<A, R>,
        args: A,
    ) -> SdkResult<R>
    where
        S: Composable,
        A: ArgList,
        R: ResultList,
    {
        Ok(self.dispatch.invoke(handle, behavior, args)?)
    }

    pub fn implements<S: Composable>(
        &self,
        handle: &Handle<S>,
        behavior: BehaviorId,
    ) -> SdkResult<bool> {
        Ok(self.dispatch.implements(handle, behavior)?)
    }

    // ---- Diagnostics ----

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }
}

impl Default for Lineage {
    fn default() -> Self {
        Self::new()
    }
}
