use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::common::percentile;

/// Linear height ramps for extruded units, in renderer units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrusionScale {
    /// Height of a unit with zero margin or zero turnout.
    pub base_height: f64,
    /// Height added at the top of the ramp.
    pub range_height: f64,
    /// Margin magnitude (pp) at which the margin ramp saturates.
    pub margin_cap: f64,
    /// Turnout, as a multiple of the regional 95th percentile, at which the turnout ramp saturates.
    pub turnout_cap: f64,
}

impl Default for ExtrusionScale {
    fn default() -> Self {
        Self { base_height: 1_000.0, range_height: 60_000.0, margin_cap: 40.0, turnout_cap: 1.2 }
    }
}

impl ExtrusionScale {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.base_height.is_finite() && self.range_height.is_finite() && self.range_height >= 0.0,
            "[ExtrusionScale::validate] heights must be finite with a non-negative range");
        ensure!(self.margin_cap.is_finite() && self.margin_cap > 0.0,
            "[ExtrusionScale::validate] margin_cap must be positive, got {}", self.margin_cap);
        ensure!(self.turnout_cap.is_finite() && self.turnout_cap > 0.0,
            "[ExtrusionScale::validate] turnout_cap must be positive, got {}", self.turnout_cap);
        Ok(())
    }

    /// Height for a margin: `base + min(cap, |margin|) / cap * range`.
    pub fn margin_to_extrusion(&self, margin: f64) -> f64 {
        if margin.is_nan() { return self.base_height }
        self.base_height + margin.abs().min(self.margin_cap) / self.margin_cap * self.range_height
    }

    /// Height for a unit's turnout, scaled by `turnout_factor` and normalized against
    /// the regional 95th-percentile turnout, saturating at `turnout_cap` times that value.
    pub fn turnout_to_extrusion(&self, total_votes: u64, turnout_factor: f64, p95_baseline: f64) -> f64 {
        if !(p95_baseline > 0.0 && p95_baseline.is_finite() && turnout_factor.is_finite()) {
            return self.base_height
        }

        let ratio = (total_votes as f64 * turnout_factor / p95_baseline).clamp(0.0, self.turnout_cap);
        self.base_height + ratio / self.turnout_cap * self.range_height
    }
}

/// The 95th-percentile turnout among reporting units, used to normalize turnout heights.
/// Returns 0 when no unit has reported.
pub fn turnout_p95(turnouts: impl IntoIterator<Item = u64>) -> f64 {
    percentile(turnouts.into_iter().filter(|&t| t > 0).map(|t| t as f64), 0.95).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> ExtrusionScale {
        ExtrusionScale { base_height: 100.0, range_height: 1_000.0, ..ExtrusionScale::default() }
    }

    #[test]
    fn margin_ramp_is_linear_and_capped() {
        let scale = scale();
        assert_eq!(scale.margin_to_extrusion(0.0), 100.0);
        assert_eq!(scale.margin_to_extrusion(20.0), 600.0);
        assert_eq!(scale.margin_to_extrusion(-20.0), 600.0);
        assert_eq!(scale.margin_to_extrusion(40.0), 1_100.0);
        assert_eq!(scale.margin_to_extrusion(75.0), 1_100.0);
        assert_eq!(scale.margin_to_extrusion(f64::NAN), 100.0);
    }

    #[test]
    fn turnout_ramp_normalizes_against_p95() {
        let scale = scale();
        assert_eq!(scale.turnout_to_extrusion(0, 1.0, 1_000.0), 100.0);
        assert_eq!(scale.turnout_to_extrusion(600, 1.0, 1_000.0), 600.0);
        assert_eq!(scale.turnout_to_extrusion(1_200, 1.0, 1_000.0), 1_100.0);
        assert_eq!(scale.turnout_to_extrusion(5_000, 1.0, 1_000.0), 1_100.0);
        assert_eq!(scale.turnout_to_extrusion(400, 1.5, 1_000.0), 600.0);
    }

    #[test]
    fn degenerate_p95_gives_base_height() {
        let scale = scale();
        assert_eq!(scale.turnout_to_extrusion(500, 1.0, 0.0), 100.0);
        assert_eq!(scale.turnout_to_extrusion(500, 1.0, f64::NAN), 100.0);
    }

    #[test]
    fn p95_skips_non_reporting_units() {
        assert_eq!(turnout_p95([]), 0.0);
        assert_eq!(turnout_p95([0, 0]), 0.0);
        assert_eq!(turnout_p95([0, 500, 0]), 500.0);
        assert_eq!(turnout_p95((1..=101).map(|t| t * 10)), 960.0);
    }

    #[test]
    fn validation() {
        assert!(ExtrusionScale::default().validate().is_ok());
        assert!(ExtrusionScale { margin_cap: 0.0, ..ExtrusionScale::default() }.validate().is_err());
        assert!(ExtrusionScale { range_height: -1.0, ..ExtrusionScale::default() }.validate().is_err());
    }
}
