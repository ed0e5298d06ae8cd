use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use lineage_types::TypeKey;
use serde::{Deserialize, Serialize};

/// Memoized cast verdicts keyed by `(real type, target type)`.
///
/// Owned by the [`TypeRegistry`](crate::TypeRegistry), so every cast engine
/// over one registry shares it. Append-only: a verdict depends only on the
/// two types' static shapes, so it never goes stale.
#[derive(Debug, Default)]
pub struct CastCache {
    verdicts: RwLock<HashMap<(TypeKey, TypeKey), bool>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters of a [`CastCache`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CastCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded verdict for `real -> target`, counting the hit or miss.
    pub fn lookup(&self, real: TypeKey, target: TypeKey) -> Option<bool> {
        let verdict = self
            .verdicts
            .read()
            .expect("lock poisoned")
            .get(&(real, target))
            .copied();
        let counter = if verdict.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        verdict
    }

    /// Record a verdict and return the one that is now cached.
    pub fn record(&self, real: TypeKey, target: TypeKey, verdict: bool) -> bool {
        let mut verdicts = self.verdicts.write().expect("lock poisoned");
        *verdicts.entry((real, target)).or_insert(verdict)
    }

    pub fn len(&self) -> usize {
        self.verdicts.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
