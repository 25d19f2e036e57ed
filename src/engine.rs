use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use ahash::AHashSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    baseline::{BaselineRecord, BaselineStore, Cycle},
    config::EngineConfig,
    elasticity::{ElasticityCache, ElasticitySource, StoreElasticity},
    encoding::{MarginBucket, Rgb, bucket_color, turnout_p95},
    io::BaselineLoad,
    map::{RegionId, Unit, UnitId},
    projection::{AggregateResult, ProjectedUnitResult, aggregate, aggregate_by_region, project},
    scenario::SwingScenario,
    solver::{SolveMode, SolverError, SolverResult, TargetedSolver},
};

/// The set of units a solve applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Scope {
    /// Every unit in the store.
    National,
    /// The units of one region.
    Region(RegionId),
    /// An explicit unit list. Duplicates are ignored.
    Units(Vec<UnitId>),
}

impl Scope {
    /// The units this scope names in `store`, without duplicates.
    pub fn resolve(&self, store: &BaselineStore) -> Vec<UnitId> {
        match self {
            Scope::National => store.units().units().iter().map(|u| u.id.clone()).collect(),
            Scope::Region(region) => store.units().units_in_region(region).into_iter().map(|u| u.id.clone()).collect(),
            Scope::Units(units) => {
                let mut seen = AHashSet::with_capacity(units.len());
                units.iter().filter(|u| seen.insert(*u)).cloned().collect()
            }
        }
    }
}

/// A scenario projected over a whole store for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub cycle: Cycle,
    /// Aggregates were taken over projected rather than baseline margins.
    pub use_projected: bool,
    pub turnout_factor: f64,
    /// One result per unit, in unit order.
    pub results: Vec<ProjectedUnitResult>,
    pub national: AggregateResult,
    pub regions: BTreeMap<RegionId, AggregateResult>,
}

/// Render-ready encoding of one unit's projected result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEncoding {
    pub unit: UnitId,
    pub bucket: MarginBucket,
    pub color: Rgb,
    pub margin_height: f64,
    pub turnout_height: f64,
}

/// Shared projection engine.
///
/// Readers work against an immutable `Arc<BaselineStore>` snapshot; updates
/// build a new store copy-on-write and swap it in under the write lock.
#[derive(Debug)]
pub struct Engine {
    store: RwLock<Arc<BaselineStore>>,
    elasticity_cache: ElasticityCache,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self { Self::new(BaselineStore::new(), EngineConfig::default()) }
}

impl Engine {
    pub fn new(store: BaselineStore, config: EngineConfig) -> Self {
        Self {
            store: RwLock::new(Arc::new(store)),
            elasticity_cache: ElasticityCache::new(),
            config,
        }
    }

    #[inline] pub fn config(&self) -> &EngineConfig { &self.config }

    #[inline] pub fn elasticity_cache(&self) -> &ElasticityCache { &self.elasticity_cache }

    /// The current store. Later updates never change a snapshot already taken.
    pub fn snapshot(&self) -> Arc<BaselineStore> {
        Arc::clone(&self.store.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Apply a batch of records atomically, returning how many were applied.
    /// Cached elasticities for every touched unit are dropped.
    pub fn apply_updates(&self, records: impl IntoIterator<Item = BaselineRecord>) -> usize {
        self.update(Vec::new(), records.into_iter().collect())
    }

    /// Apply an ingestion batch: its units are registered, then its records applied.
    pub fn ingest(&self, load: BaselineLoad) -> usize {
        self.update(load.units, load.records)
    }

    fn update(&self, units: Vec<Unit>, records: Vec<BaselineRecord>) -> usize {
        if units.is_empty() && records.is_empty() { return 0 }

        let mut guard = self.store.write().unwrap_or_else(PoisonError::into_inner);
        let store = Arc::make_mut(&mut guard);

        for unit in units { store.insert_unit(unit); }

        let applied = records.len();
        let mut touched = AHashSet::new();
        for record in records {
            touched.insert(record.unit.clone());
            store.upsert(record);
        }
        let invalidated: usize = touched.iter().map(|unit| self.elasticity_cache.invalidate_unit(unit)).sum();

        tracing::info!(
            target: "swingmap::engine",
            records = applied,
            units = touched.len(),
            invalidated,
            "baseline.updated"
        );
        applied
    }

    /// Project `scenario` over every unit of the store for `cycle`.
    pub fn project(&self, cycle: Cycle, scenario: &SwingScenario) -> Projection {
        let store = self.snapshot();
        let turnout_factor = scenario.turnout_factor();
        // A turnout shift alone scales heights, not margins.
        let use_projected = scenario.has_swing();

        let results: Vec<ProjectedUnitResult> = store.units().units()
            .par_iter()
            .map(|unit| match store.record(&unit.id, cycle) {
                Some(record) => project(record, scenario),
                None => ProjectedUnitResult::not_reporting(unit.id.clone()),
            })
            .collect();

        let national = aggregate(&results, use_projected);
        let regions = aggregate_by_region(store.units(), &results, use_projected);

        tracing::debug!(
            target: "swingmap::engine",
            cycle,
            units = results.len(),
            reporting = national.units_counted,
            margin = national.weighted_margin,
            "projection.done"
        );

        Projection { cycle, use_projected, turnout_factor, results, national, regions }
    }

    /// Historical elasticity of a unit across all cycles held.
    pub fn elasticity(&self, unit: &UnitId) -> f64 {
        let store = self.snapshot();
        StoreElasticity::new(&store, &self.elasticity_cache, self.config.elasticity).elasticity(unit)
    }

    /// Elasticities for every unit, keyed by unit.
    pub fn elasticities(&self) -> BTreeMap<UnitId, f64> {
        let store = self.snapshot();
        let source = StoreElasticity::new(&store, &self.elasticity_cache, self.config.elasticity);
        store.units().units()
            .par_iter()
            .map(|unit| (unit.id.clone(), source.elasticity(&unit.id)))
            .collect()
    }

    /// Solve for the local swings that move `scope`'s margin in `cycle` to `target_margin`.
    pub fn solve(&self, scope: &Scope, cycle: Cycle, scenario: &SwingScenario, target_margin: f64, mode: SolveMode)
        -> Result<SolverResult, SolverError>
    {
        let store = self.snapshot();
        let units = scope.resolve(&store);
        let source = StoreElasticity::new(&store, &self.elasticity_cache, self.config.elasticity);

        TargetedSolver::new(&store, &source)
            .with_config(self.config.solver)
            .solve(&units, cycle, scenario, target_margin, mode)
    }

    /// Color buckets and extrusion heights for every result of a projection.
    /// Turnout heights are normalized per region against its baseline 95th percentile.
    pub fn encode(&self, projection: &Projection) -> Vec<UnitEncoding> {
        let store = self.snapshot();
        let region_of = |unit: &UnitId| store.units().get(unit)
            .map(|u| u.region.clone())
            .unwrap_or_else(|| unit.to_region());

        let mut turnouts: BTreeMap<RegionId, Vec<u64>> = BTreeMap::new();
        for result in &projection.results {
            turnouts.entry(region_of(&result.unit)).or_default().push(result.turnout);
        }
        let p95: BTreeMap<RegionId, f64> = turnouts.into_iter()
            .map(|(region, values)| (region, turnout_p95(values)))
            .collect();

        let scale = &self.config.extrusion;
        projection.results.iter()
            .map(|result| {
                let margin = result.margin(projection.use_projected);
                let bucket = MarginBucket::from_margin(margin);
                let p95 = p95.get(&region_of(&result.unit)).copied().unwrap_or(0.0);
                UnitEncoding {
                    unit: result.unit.clone(),
                    bucket,
                    color: bucket_color(bucket),
                    margin_height: scale.margin_to_extrusion(margin),
                    turnout_height: scale.turnout_to_extrusion(result.turnout, projection.turnout_factor, p95),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{encoding::Side, scenario::PartyDelta};
    use super::*;

    fn record(code: &str, cycle: Cycle, total: u64, gop: u64, dem: u64) -> BaselineRecord {
        BaselineRecord::two_party(UnitId::new(code), cycle, total, gop, dem)
    }

    fn engine() -> Engine {
        let store = BaselineStore::from_parts(
            [Unit::new(UnitId::new("06037"), RegionId::new("06"), Some("Los Angeles"))],
            [
                record("06037", 2024, 1000, 550, 450),
                record("06001", 2024, 3000, 1200, 1800),
                record("48201", 2024, 0, 0, 0),
            ],
        );
        Engine::new(store, EngineConfig::default())
    }

    #[test]
    fn scope_resolution() {
        let store = engine().snapshot();
        assert_eq!(Scope::National.resolve(&store).len(), 3);
        assert_eq!(Scope::Region(RegionId::new("06")).resolve(&store).len(), 2);
        assert!(Scope::Region(RegionId::new("99")).resolve(&store).is_empty());

        let units = Scope::Units(vec![UnitId::new("06001"), UnitId::new("06037"), UnitId::new("06001")]).resolve(&store);
        assert_eq!(units, vec![UnitId::new("06001"), UnitId::new("06037")]);
    }

    #[test]
    fn baseline_projection_reports_base_margins() {
        let projection = engine().project(2024, &SwingScenario::new());
        assert!(!projection.use_projected);
        assert_eq!(projection.results.len(), 3);
        // (1000 * 10 + 3000 * -20) / 4000
        assert!((projection.national.weighted_margin - -12.5).abs() < 1e-9);
        assert_eq!(projection.national.units_counted, 2);
        assert_eq!(projection.regions.len(), 2);
        assert!(projection.regions[&RegionId::new("48")].is_empty());
    }

    #[test]
    fn turnout_shift_alone_keeps_baseline_margins() {
        // Party counts over-sum the total, so shares are rescaled when projected.
        let store = BaselineStore::from_parts([], [record("06037", 2024, 1000, 900, 300)]);
        let engine = Engine::new(store, EngineConfig::default());

        let baseline = engine.project(2024, &SwingScenario::new());
        let shifted = engine.project(2024, &SwingScenario::new().with_turnout_shift(10.0));

        assert!(!shifted.use_projected);
        assert_eq!(shifted.national.weighted_margin, baseline.national.weighted_margin);
        assert!((shifted.turnout_factor - 1.1).abs() < 1e-12);
        assert!((shifted.results[0].projected_turnout - 1100.0).abs() < 1e-9);

        let encodings = engine.encode(&shifted);
        assert_eq!(encodings[0].bucket, MarginBucket::from_margin(baseline.results[0].base_margin));
    }

    #[test]
    fn global_swing_moves_every_unit() {
        let projection = engine().project(2024, &SwingScenario::global(-5.0, 5.0));
        assert!(projection.use_projected);
        assert_eq!(projection.results[0].new_margin, 0.0);
        // A tie is not a flip.
        assert_eq!(projection.national.flips(), 0);
    }

    #[test]
    fn missing_cycle_projects_as_not_reporting() {
        let projection = engine().project(2016, &SwingScenario::global(3.0, -3.0));
        assert!(projection.national.is_empty());
        assert!(projection.results.iter().all(|r| !r.is_reporting()));
    }

    #[test]
    fn updates_are_copy_on_write() {
        let engine = engine();
        let before = engine.snapshot();

        let applied = engine.apply_updates([record("06037", 2024, 2000, 500, 1500), record("06075", 2024, 100, 10, 90)]);
        assert_eq!(applied, 2);

        assert_eq!(before.turnout(&UnitId::new("06037"), 2024), 1000);
        assert!(before.record(&UnitId::new("06075"), 2024).is_none());

        let after = engine.snapshot();
        assert_eq!(after.turnout(&UnitId::new("06037"), 2024), 2000);
        assert_eq!(after.units().get(&UnitId::new("06037")).map(|u| u.label()), Some("Los Angeles"));
        assert_eq!(after.units().len(), 4);
    }

    #[test]
    fn updates_invalidate_cached_elasticity() {
        let engine = engine();
        engine.apply_updates([record("06037", 2020, 1000, 500, 500)]);

        // Margins 0 then 10: 0.5 + 10 / 5
        assert!((engine.elasticity(&UnitId::new("06037")) - 2.5).abs() < 1e-9);
        assert_eq!(engine.elasticity_cache().len(), 1);

        engine.apply_updates([record("06037", 2024, 1000, 500, 500)]);
        assert!(engine.elasticity_cache().is_empty());
        assert_eq!(engine.elasticity(&UnitId::new("06037")), 0.5);
    }

    #[test]
    fn solve_then_apply_hits_target() {
        let engine = engine();
        let scenario = SwingScenario::new();
        let result = engine.solve(&Scope::Region(RegionId::new("06")), 2024, &scenario, -5.0, SolveMode::Uniform).unwrap();
        assert!(!result.no_op);
        assert_eq!(result.unit_delta(&UnitId::new("06037")), result.requested_delta);

        let projection = engine.project(2024, &result.apply_to(&scenario));
        let region = projection.regions[&RegionId::new("06")];
        assert!((region.weighted_margin - -5.0).abs() < 1e-9);
    }

    #[test]
    fn solve_reports_empty_scope() {
        let engine = engine();
        let err = engine.solve(&Scope::Region(RegionId::new("48")), 2024, &SwingScenario::new(), 3.0, SolveMode::Elastic);
        assert_eq!(err, Err(SolverError::EmptyScope { units: 1 }));
    }

    #[test]
    fn encoding_follows_projected_margin() {
        let engine = engine();
        let scenario = SwingScenario {
            local_overrides: [(UnitId::new("06001"), PartyDelta::from_margin_shift(27.0))].into(),
            ..SwingScenario::new()
        };
        let projection = engine.project(2024, &scenario);
        let encodings = engine.encode(&projection);
        assert_eq!(encodings.len(), 3);

        let la = &encodings[0];
        assert_eq!(la.bucket.side, Side::Gop);
        assert_eq!(la.color, bucket_color(la.bucket));

        // -20 + 27 = +7
        let alameda = &encodings[1];
        assert_eq!(alameda.bucket.side, Side::Gop);
        assert_eq!(alameda.bucket.index, 2);

        let scale = engine.config().extrusion;
        let harris = &encodings[2];
        assert_eq!(harris.turnout_height, scale.base_height);
        assert_eq!(harris.margin_height, scale.base_height);
        assert!(alameda.turnout_height > la.turnout_height);
    }
}
