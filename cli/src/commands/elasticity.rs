use anyhow::{Result, ensure};
use swingmap::{Engine, UnitId};

use super::load_engine;

/// A unit code that must be present in the engine's baseline.
fn known_unit(engine: &Engine, code: &str) -> Result<UnitId> {
    let unit = UnitId::new(code);
    ensure!(engine.snapshot().units().contains(&unit), "[commands::elasticity] Unknown unit '{code}'");
    Ok(unit)
}

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ElasticityArgs) -> Result<()> {
    let engine = load_engine(cli, &args.baseline)?;

    if let Some(code) = &args.unit {
        let unit = known_unit(&engine, code)?;
        println!("{unit}\t{:.3}", engine.elasticity(&unit));
        return Ok(());
    }

    for (unit, elasticity) in engine.elasticities() {
        println!("{unit}\t{elasticity:.3}");
    }
    Ok(())
}
