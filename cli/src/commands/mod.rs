pub mod elasticity;
pub mod project;
pub mod solve;

use std::path::Path;

use anyhow::{Context, Result};
use swingmap::{Cycle, Engine, EngineConfig, SwingScenario, read_baseline_csv};

/// Load the engine config and a baseline CSV into a fresh engine.
pub(crate) fn load_engine(cli: &crate::cli::Cli, baseline: &Path) -> Result<Engine> {
    let (config, _) = EngineConfig::load(cli.config.as_deref())?;

    let load = read_baseline_csv(baseline)?;
    if load.dropped > 0 {
        tracing::warn!(path = %baseline.display(), dropped = load.dropped, "baseline rows dropped");
    }

    let engine = Engine::new(Default::default(), config);
    engine.ingest(load);
    Ok(engine)
}

/// The requested cycle, or the latest one in the baseline.
pub(crate) fn resolve_cycle(engine: &Engine, cycle: Option<Cycle>) -> Result<Cycle> {
    match cycle {
        Some(cycle) => Ok(cycle),
        None => engine.snapshot().latest_cycle().context("[commands::resolve_cycle] Baseline contains no records"),
    }
}

pub(crate) fn load_scenario(path: Option<&Path>) -> Result<SwingScenario> {
    match path {
        Some(path) => SwingScenario::from_json_file(path),
        None => Ok(SwingScenario::new()),
    }
}
