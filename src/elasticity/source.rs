use ahash::AHashMap;

use crate::{baseline::BaselineStore, map::UnitId};
use super::{ElasticityCache, ElasticityParams, estimate_elasticity};

/// Per-unit elasticity lookup consumed by the targeted solver.
pub trait ElasticitySource: Sync {
    fn elasticity(&self, unit: &UnitId) -> f64;
}

/// Elasticities estimated from a baseline store's full history, memoized in a cache.
pub struct StoreElasticity<'a> {
    store: &'a BaselineStore,
    cache: &'a ElasticityCache,
    params: ElasticityParams,
}

impl<'a> StoreElasticity<'a> {
    pub fn new(store: &'a BaselineStore, cache: &'a ElasticityCache, params: ElasticityParams) -> Self {
        Self { store, cache, params }
    }
}

impl ElasticitySource for StoreElasticity<'_> {
    fn elasticity(&self, unit: &UnitId) -> f64 {
        let cycles = self.store.unit_cycles(unit);
        self.cache.get_or_insert_with(unit, &cycles, || {
            estimate_elasticity(&self.store.history(unit), &self.params)
        })
    }
}

/// Fixed elasticities; units not listed are neutral.
impl ElasticitySource for AHashMap<UnitId, f64> {
    fn elasticity(&self, unit: &UnitId) -> f64 { self.get(unit).copied().unwrap_or(1.0) }
}

#[cfg(test)]
mod tests {
    use crate::baseline::BaselineRecord;
    use super::*;

    #[test]
    fn store_elasticity_uses_full_history_and_caches() {
        let store = BaselineStore::from_parts([], [
            BaselineRecord::two_party(UnitId::new("06037"), 2016, 1000, 550, 450),
            BaselineRecord::two_party(UnitId::new("06037"), 2020, 1000, 500, 500),
            BaselineRecord::two_party(UnitId::new("06001"), 2020, 1000, 500, 500),
        ]);
        let cache = ElasticityCache::new();
        let source = StoreElasticity::new(&store, &cache, ElasticityParams::default());

        assert!((source.elasticity(&UnitId::new("06037")) - 2.5).abs() < 1e-9);
        assert_eq!(source.elasticity(&UnitId::new("06001")), 1.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn map_source_defaults_to_neutral() {
        let mut map = AHashMap::new();
        map.insert(UnitId::new("06037"), 2.0);
        assert_eq!(map.elasticity(&UnitId::new("06037")), 2.0);
        assert_eq!(map.elasticity(&UnitId::new("06001")), 1.0);
    }
}
