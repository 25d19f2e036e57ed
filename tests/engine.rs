use std::io::{Cursor, Write};

use swingmap::{
    Engine, EngineConfig, RegionId, Scope, SolveMode, SolverError, SwingScenario, UnitId,
    parse_baseline_csv, parse_feed, read_baseline_csv,
};

/// Three units in two regions with distinct historical swings.
/// 2024 margins: +2, +5, +20. Changes since 2020: 2, 5, 20.
const HISTORY: &str = "\
unit_code,region,name,cycle,total_votes,votes_GOP,votes_DEM
06001,06,Alameda,2020,1000,500,500
06003,06,Alpine,2020,2000,1000,1000
48201,48,Harris,2020,4000,2000,2000
06001,06,Alameda,2024,1000,510,490
06003,06,Alpine,2024,2000,1050,950
48201,48,Harris,2024,4000,2400,1600
";

fn engine() -> Engine {
    let engine = Engine::new(Default::default(), EngineConfig::default());
    let load = parse_baseline_csv(HISTORY).unwrap();
    assert_eq!(load.dropped, 0);
    engine.ingest(load);
    engine
}

fn id(code: &str) -> UnitId { UnitId::new(code) }

#[test]
fn csv_to_projection() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"unit_code,cycle,total_votes,votes_GOP,votes_DEM\n06037,2024,1000,550,450\n06075,2024,0,0,0\n").unwrap();

    let engine = Engine::new(read_baseline_csv(file.path()).unwrap().into_store(), EngineConfig::default());
    let projection = engine.project(2024, &SwingScenario::global(-5.0, 5.0));

    assert_eq!(projection.results[0].new_margin, 0.0);
    assert!(!projection.results[1].is_reporting());
    assert_eq!(projection.national.units_counted, 1);
    assert_eq!(projection.national.units_total, 2);
}

#[test]
fn zero_turnout_unit_carries_no_weight() {
    let load = parse_baseline_csv("unit_code,cycle,total_votes,votes_GOP,votes_DEM\n06001,2024,1000,540,460\n06003,2024,0,0,0\n").unwrap();
    let engine = Engine::new(load.into_store(), EngineConfig::default());

    let projection = engine.project(2024, &SwingScenario::new());
    assert!((projection.national.weighted_margin - 8.0).abs() < 1e-9);
    assert_eq!(projection.results[1].base_margin, 0.0);
}

#[test]
fn uniform_solve_then_apply_reaches_target() {
    let engine = engine();
    let scenario = SwingScenario::global(1.0, -1.0);

    let result = engine.solve(&Scope::National, 2024, &scenario, 0.0, SolveMode::Uniform).unwrap();
    assert!(!result.no_op);
    for unit in &result.scope {
        assert_eq!(result.unit_delta(unit), result.requested_delta);
    }

    let projection = engine.project(2024, &result.apply_to(&scenario));
    assert!(projection.national.weighted_margin.abs() < 1e-9);
}

#[test]
fn elastic_solve_is_exact_in_aggregate() {
    let engine = engine();
    let snapshot = engine.snapshot();

    let elasticities: Vec<f64> = ["06001", "06003", "48201"].iter().map(|c| engine.elasticity(&id(c))).collect();
    assert!((elasticities[0] - 0.9).abs() < 1e-9);
    assert!((elasticities[1] - 1.5).abs() < 1e-9);
    assert_eq!(elasticities[2], 3.0);

    let result = engine.solve(&Scope::National, 2024, &SwingScenario::new(), 0.0, SolveMode::Elastic).unwrap();

    let total: u64 = result.scope.iter().map(|u| snapshot.turnout(u, 2024)).sum();
    let weighted: f64 = result.scope.iter()
        .map(|u| snapshot.turnout(u, 2024) as f64 / total as f64 * result.unit_delta(u))
        .sum();
    assert!((weighted - result.requested_delta).abs() < 1e-9);
    assert!((result.achieved_delta - result.requested_delta).abs() < 1e-9);

    // The most elastic unit absorbs the largest share of the shift.
    assert_eq!(result.max_unit_delta, result.unit_delta(&id("48201")).abs());

    let projection = engine.project(2024, &result.apply_to(&SwingScenario::new()));
    assert!(projection.national.weighted_margin.abs() < 1e-9);
}

#[test]
fn regional_solve_leaves_other_regions_alone() {
    let engine = engine();
    let result = engine.solve(&Scope::Region(RegionId::new("06")), 2024, &SwingScenario::new(), -1.0, SolveMode::Uniform).unwrap();
    assert_eq!(result.scope.len(), 2);

    let projection = engine.project(2024, &result.apply_to(&SwingScenario::new()));
    assert!((projection.regions[&RegionId::new("06")].weighted_margin - -1.0).abs() < 1e-9);
    assert!((projection.regions[&RegionId::new("48")].weighted_margin - 20.0).abs() < 1e-9);
}

#[test]
fn target_within_tolerance_is_a_no_op() {
    let engine = engine();
    let current = engine.project(2024, &SwingScenario::new()).national.weighted_margin;

    let result = engine.solve(&Scope::National, 2024, &SwingScenario::new(), current + 0.01, SolveMode::Elastic).unwrap();
    assert!(result.no_op);
    assert!(result.scope.iter().all(|u| result.unit_delta(u) == 0.0));
}

#[test]
fn solver_errors() {
    let engine = engine();
    assert!(matches!(
        engine.solve(&Scope::National, 2024, &SwingScenario::new(), f64::NAN, SolveMode::Uniform),
        Err(SolverError::InvalidTarget(_)),
    ));
    assert_eq!(
        engine.solve(&Scope::Units(vec![id("99999")]), 2024, &SwingScenario::new(), 1.0, SolveMode::Uniform),
        Err(SolverError::EmptyScope { units: 1 }),
    );
    assert_eq!(
        engine.solve(&Scope::National, 2016, &SwingScenario::new(), 1.0, SolveMode::Elastic),
        Err(SolverError::EmptyScope { units: 3 }),
    );
}

#[test]
fn feed_updates_are_atomic_and_invalidate_elasticity() {
    let engine = engine();
    assert!((engine.elasticity(&id("06001")) - 0.9).abs() < 1e-9);
    let before = engine.snapshot();

    let feed = "\
{\"unit_code\": \"06001\", \"cycle\": 2024, \"total_votes\": 1000, \"votes\": {\"GOP\": 600, \"DEM\": 400}}
{\"unit_code\": 6005, \"cycle\": 2024, \"total_votes\": 500, \"votes\": {\"GOP\": 250, \"DEM\": 250}}
{\"unit_code\": \"06007\", \"cycle\": \"soon\", \"total_votes\": 10}
";
    let load = parse_feed(Cursor::new(feed)).unwrap();
    assert_eq!(load.dropped, 1);
    assert_eq!(engine.ingest(load), 2);

    assert_eq!(before.record(&id("06001"), 2024).unwrap().gop_votes(), 510);
    assert!(before.record(&id("06005"), 2024).is_none());

    let after = engine.snapshot();
    assert_eq!(after.record(&id("06001"), 2024).unwrap().gop_votes(), 600);
    assert_eq!(after.units().get(&id("06005")).map(|u| u.region.id()), Some("06"));

    // Margins 0 then 20 saturate at the upper bound.
    assert_eq!(engine.elasticity(&id("06001")), 3.0);
}
