#![doc = "SwingMap public API"]
mod baseline;
mod common;
mod config;
mod elasticity;
mod encoding;
mod engine;
mod io;
mod map;
mod projection;
mod scenario;
mod solver;

#[doc(inline)]
pub use map::{RegionId, Unit, UnitId, UnitLayer};

#[doc(inline)]
pub use baseline::{BaselineRecord, BaselineStore, Cycle, Party, Shares};

#[doc(inline)]
pub use scenario::{MAX_TURNOUT_FACTOR, MIN_TURNOUT_FACTOR, PartyDelta, SwingScenario};

#[doc(inline)]
pub use projection::{AggregateResult, ProjectedUnitResult, aggregate, aggregate_by_region, apply_delta, project};

#[doc(inline)]
pub use elasticity::{ElasticityCache, ElasticityParams, ElasticitySource, StoreElasticity, estimate_elasticity};

#[doc(inline)]
pub use solver::{SolveMode, SolverConfig, SolverError, SolverResult, TargetedSolver, allocate};

#[doc(inline)]
pub use encoding::{
    BUCKET_COUNT, ExtrusionScale, MARGIN_THRESHOLDS, MarginBucket, NEUTRAL, Rgb, Side,
    bucket_color, margin_color, margin_to_bucket, turnout_p95,
};

#[doc(inline)]
pub use io::{BaselineLoad, ParsedRow, RowError, parse_baseline_csv, parse_feed, parse_feed_line, read_baseline_csv};

#[doc(inline)]
pub use config::{CONFIG_ENV_VAR, EngineConfig};

#[doc(inline)]
pub use engine::{Engine, Projection, Scope, UnitEncoding};
