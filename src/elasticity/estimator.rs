use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::baseline::BaselineRecord;

/// Tuning constants for the elasticity estimate.
///
/// These are empirical policy values, not a validated model: a unit's
/// elasticity is `clamp(min + avg_abs_delta / divisor, min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticityParams {
    /// Margin change (pp) per unit of elasticity above the floor.
    pub divisor: f64,
    pub min: f64,
    pub max: f64,
    /// Returned when a unit has fewer than two reporting cycles.
    pub neutral: f64,
}

impl Default for ElasticityParams {
    fn default() -> Self {
        Self { divisor: 5.0, min: 0.5, max: 3.0, neutral: 1.0 }
    }
}

impl ElasticityParams {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.divisor.is_finite() && self.divisor > 0.0,
            "[ElasticityParams::validate] divisor must be positive, got {}", self.divisor);
        ensure!(self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max,
            "[ElasticityParams::validate] bounds must satisfy 0 < min <= max, got [{}, {}]", self.min, self.max);
        ensure!(self.neutral.is_finite() && self.min <= self.neutral && self.neutral <= self.max,
            "[ElasticityParams::validate] neutral must lie within [{}, {}], got {}", self.min, self.max, self.neutral);
        Ok(())
    }
}

/// Estimate how responsive a unit is to swing from its margin history.
///
/// Only cycles with positive turnout count. Units with fewer than two such
/// cycles get the neutral value. Otherwise the mean absolute margin change
/// between consecutive reporting cycles is mapped into `[min, max]`.
pub fn estimate_elasticity(history: &[&BaselineRecord], params: &ElasticityParams) -> f64 {
    let mut margins: Vec<(u16, f64)> = history.iter()
        .filter(|r| r.is_reporting())
        .map(|r| (r.cycle, r.margin()))
        .collect();
    if margins.len() < 2 { return params.neutral }
    margins.sort_by_key(|&(cycle, _)| cycle);

    let avg_abs_delta = margins.windows(2)
        .map(|pair| (pair[1].1 - pair[0].1).abs())
        .sum::<f64>() / (margins.len() - 1) as f64;

    (params.min + avg_abs_delta / params.divisor).clamp(params.min, params.max)
}
