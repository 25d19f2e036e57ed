use std::sync::{PoisonError, RwLock};

use ahash::AHashMap;

use crate::{baseline::Cycle, map::UnitId};

type CacheKey = (UnitId, Vec<Cycle>);

/// Memoized elasticities keyed by `(unit, sorted cycle list)`.
///
/// A change in the set of available cycles produces a new key, so stale
/// entries are never returned for it. Replacing a record within an existing
/// cycle set requires an explicit `invalidate_unit`.
#[derive(Debug, Default)]
pub struct ElasticityCache {
    entries: RwLock<AHashMap<CacheKey, f64>>,
}

impl ElasticityCache {
    pub fn new() -> Self { Self::default() }

    /// Return the cached value for `(unit, cycles)`, computing and storing it on a miss.
    pub fn get_or_insert_with(&self, unit: &UnitId, cycles: &[Cycle], compute: impl FnOnce() -> f64) -> f64 {
        let mut key_cycles = cycles.to_vec();
        key_cycles.sort_unstable();
        key_cycles.dedup();
        let key = (unit.clone(), key_cycles);

        let cached = self.entries.read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied();
        if let Some(value) = cached { return value }

        let value = compute();
        self.entries.write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
        value
    }

    /// Drop every entry for a unit. Returns the number of entries removed.
    pub fn invalidate_unit(&self, unit: &UnitId) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(id, _), _| id != unit);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}
