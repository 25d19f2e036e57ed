use anyhow::{Context, Result};
use swingmap::{AggregateResult, RegionId};

use super::{load_engine, load_scenario, resolve_cycle};

fn summary(label: &str, agg: &AggregateResult) -> String {
    format!(
        "{label:<10} margin {:+7.2}  turnout {:>10}  reporting {}/{}  flips +{}R +{}D",
        agg.weighted_margin, agg.total_turnout, agg.units_counted, agg.units_total, agg.flips_to_gop, agg.flips_to_dem,
    )
}

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ProjectArgs) -> Result<()> {
    let engine = load_engine(cli, &args.baseline)?;
    let cycle = resolve_cycle(&engine, args.cycle)?;

    let mut scenario = load_scenario(args.scenario.as_deref())?;
    if let Some(gop) = args.gop { scenario.party_delta_pp.gop_pp = gop }
    if let Some(dem) = args.dem { scenario.party_delta_pp.dem_pp = dem }
    if let Some(pct) = args.turnout { scenario.turnout_shift_pct = pct }

    let mut projection = engine.project(cycle, &scenario);
    let region = args.region.as_deref().map(RegionId::new);

    if let Some(region) = &region {
        let snapshot = engine.snapshot();
        let units = snapshot.units();
        projection.results.retain(|r| units.get(&r.unit).is_some_and(|u| &u.region == region));
        projection.regions.retain(|id, _| id == region);
    }

    if args.json {
        let encodings = engine.encode(&projection);
        let out = serde_json::json!({ "projection": projection, "encodings": encodings });
        println!("{}", serde_json::to_string_pretty(&out).context("[commands::project] Failed to serialize projection")?);
        return Ok(());
    }

    println!("cycle {cycle} ({})", if projection.use_projected { "projected" } else { "baseline" });
    if region.is_none() { println!("{}", summary("national", &projection.national)) }
    for (id, agg) in &projection.regions {
        println!("{}", summary(id.id(), agg));
    }

    Ok(())
}
