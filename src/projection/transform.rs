use serde::{Deserialize, Serialize};

use crate::{baseline::{BaselineRecord, Shares}, map::UnitId, scenario::{PartyDelta, SwingScenario}};

/// A unit's baseline and projected result under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedUnitResult {
    pub unit: UnitId,
    pub base_margin: f64,
    pub new_margin: f64,
    pub base_shares: Shares,
    pub new_shares: Shares,
    /// Baseline turnout, the unit's aggregation weight.
    pub turnout: u64,
    /// Turnout after the scenario's turnout factor.
    pub projected_turnout: f64,
}

impl ProjectedUnitResult {
    /// Result for a unit with no turnout (not yet reporting).
    pub fn not_reporting(unit: UnitId) -> Self {
        Self {
            unit,
            base_margin: 0.0,
            new_margin: 0.0,
            base_shares: Shares::ZERO,
            new_shares: Shares::ZERO,
            turnout: 0,
            projected_turnout: 0.0,
        }
    }

    #[inline] pub fn is_reporting(&self) -> bool { self.turnout > 0 }

    /// The margin to report: projected if a swing is active, else baseline.
    #[inline]
    pub fn margin(&self, use_projected: bool) -> f64 {
        if use_projected { self.new_margin } else { self.base_margin }
    }

    #[inline]
    pub fn shares(&self, use_projected: bool) -> Shares {
        if use_projected { self.new_shares } else { self.base_shares }
    }
}

/// Apply a party delta to baseline shares.
///
/// Each share is clamped to [0, 1]. If the two together exceed 1 they are
/// rescaled to sum to 1, so the major parties crowd out the third-party share
/// first and their ratio is preserved.
pub fn apply_delta(base: Shares, delta: PartyDelta) -> Shares {
    let gop = (base.gop + delta.gop_pp / 100.0).clamp(0.0, 1.0);
    let dem = (base.dem + delta.dem_pp / 100.0).clamp(0.0, 1.0);

    let sum = gop + dem;
    if sum > 1.0 {
        Shares { gop: gop / sum, dem: dem / sum }
    } else {
        Shares { gop, dem }
    }
}

/// Project one unit's baseline under a scenario.
pub fn project(baseline: &BaselineRecord, scenario: &SwingScenario) -> ProjectedUnitResult {
    if !baseline.is_reporting() { return ProjectedUnitResult::not_reporting(baseline.unit.clone()) }

    let base_shares = baseline.shares();
    let new_shares = apply_delta(base_shares, scenario.effective_delta(&baseline.unit));

    ProjectedUnitResult {
        unit: baseline.unit.clone(),
        base_margin: base_shares.margin(),
        new_margin: new_shares.margin(),
        base_shares,
        new_shares,
        turnout: baseline.total_votes,
        projected_turnout: baseline.total_votes as f64 * scenario.turnout_factor(),
    }
}
