use std::fs;

use anyhow::{Context, Result};
use swingmap::{RegionId, Scope, SolveMode, UnitId};

use crate::cli::ModeArg;
use super::{load_engine, load_scenario, resolve_cycle};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::SolveArgs) -> Result<()> {
    let engine = load_engine(cli, &args.baseline)?;
    let cycle = resolve_cycle(&engine, args.cycle)?;
    let scenario = load_scenario(args.scenario.as_deref())?;

    let scope = match (&args.region, args.units.is_empty()) {
        (Some(region), _) => Scope::Region(RegionId::new(region)),
        (None, false) => Scope::Units(args.units.iter().map(UnitId::new).collect()),
        (None, true) => Scope::National,
    };
    let mode = match args.mode {
        ModeArg::Uniform => SolveMode::Uniform,
        ModeArg::Elastic => SolveMode::Elastic,
    };

    let result = engine.solve(&scope, cycle, &scenario, args.target, mode)
        .with_context(|| format!("[commands::solve] Solve failed for {scope:?} in {cycle}"))?;

    if result.no_op {
        eprintln!("[solve] margin {:+.2} is already within tolerance of {:+.2}", result.current_margin, result.target_margin);
    } else {
        eprintln!(
            "[solve] {mode} shift of {:+.2} across {} units ({:+.2} -> {:+.2}, max unit {:.2})",
            result.requested_delta, result.scope.len(), result.current_margin, result.target_margin, result.max_unit_delta,
        );
    }

    let json = serde_json::to_string_pretty(&result.apply_to(&scenario)).context("[commands::solve] Failed to serialize scenario")?;
    match &args.output {
        Some(path) => fs::write(path, json).with_context(|| format!("[commands::solve] Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
