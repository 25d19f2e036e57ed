use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::map::{RegionId, UnitLayer};
use super::ProjectedUnitResult;

/// Turnout-weighted summary over a set of units.
///
/// An empty aggregate (`total_turnout == 0`) means "no data", not a tied race.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total_turnout: u64,
    pub weighted_margin: f64,
    /// Units with positive turnout.
    pub units_counted: usize,
    /// All units in scope, reporting or not.
    pub units_total: usize,
    pub gop_votes: f64,
    pub dem_votes: f64,
    /// Units that moved from a DEM lead to a GOP lead.
    pub flips_to_gop: usize,
    /// Units that moved from a GOP lead to a DEM lead.
    pub flips_to_dem: usize,
}

impl AggregateResult {
    #[inline] pub fn is_empty(&self) -> bool { self.total_turnout == 0 }

    #[inline] pub fn flips(&self) -> usize { self.flips_to_gop + self.flips_to_dem }
}

/// Aggregate unit results into a turnout-weighted margin.
///
/// Units with zero turnout are excluded from both numerator and denominator.
/// Vote totals use projected turnout when `use_projected` is set.
pub fn aggregate<'a>(results: impl IntoIterator<Item = &'a ProjectedUnitResult>, use_projected: bool) -> AggregateResult {
    let mut agg = AggregateResult::default();
    let mut weighted_sum = 0.0;

    for result in results {
        agg.units_total += 1;
        if !result.is_reporting() { continue }

        let turnout = result.turnout as f64;
        weighted_sum += result.margin(use_projected) * turnout;
        agg.total_turnout += result.turnout;
        agg.units_counted += 1;

        let votes = if use_projected { result.projected_turnout } else { turnout };
        let shares = result.shares(use_projected);
        agg.gop_votes += shares.gop * votes;
        agg.dem_votes += shares.dem * votes;

        if use_projected {
            if result.base_margin < 0.0 && result.new_margin > 0.0 { agg.flips_to_gop += 1 }
            if result.base_margin > 0.0 && result.new_margin < 0.0 { agg.flips_to_dem += 1 }
        }
    }

    if agg.total_turnout > 0 {
        agg.weighted_margin = weighted_sum / agg.total_turnout as f64;
    }
    agg
}

/// Aggregate unit results per enclosing region, in region order.
/// Results for units missing from `units` are grouped by the region derived from their code.
pub fn aggregate_by_region(units: &UnitLayer, results: &[ProjectedUnitResult], use_projected: bool) -> BTreeMap<RegionId, AggregateResult> {
    let mut groups: BTreeMap<RegionId, Vec<&ProjectedUnitResult>> = BTreeMap::new();
    for result in results {
        let region = units.get(&result.unit)
            .map(|unit| unit.region.clone())
            .unwrap_or_else(|| result.unit.to_region());
        groups.entry(region).or_default().push(result);
    }

    groups.into_par_iter()
        .map(|(region, group)| (region, aggregate(group, use_projected)))
        .collect()
}
