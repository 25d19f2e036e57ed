use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    baseline::{BaselineStore, Cycle},
    elasticity::ElasticitySource,
    map::UnitId,
    projection::{ProjectedUnitResult, aggregate, project},
    scenario::{PartyDelta, SwingScenario},
};
use super::SolverError;

/// How an aggregate margin shift is distributed across units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMode {
    /// Every unit moves by the same amount.
    #[default]
    Uniform,
    /// Units move in proportion to their historical elasticity.
    Elastic,
}

impl FromStr for SolveMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(SolveMode::Uniform),
            "elastic" => Ok(SolveMode::Elastic),
            other => bail!("[SolveMode::from_str] Unknown solve mode '{other}', expected 'uniform' or 'elastic'"),
        }
    }
}

impl fmt::Display for SolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { SolveMode::Uniform => "uniform", SolveMode::Elastic => "elastic" })
    }
}

/// Solver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// A target within this many points of the current margin is already met.
    pub tolerance_pp: f64,
}

impl Default for SolverConfig {
    fn default() -> Self { Self { tolerance_pp: 0.05 } }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.tolerance_pp.is_finite() && self.tolerance_pp >= 0.0,
            "[SolverConfig::validate] tolerance_pp must be a non-negative number, got {}", self.tolerance_pp);
        Ok(())
    }
}

/// Per-unit local swings that move a scope's aggregate margin to a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    pub per_unit_local_swing: BTreeMap<UnitId, PartyDelta>,
    /// Turnout-weighted mean of the per-unit margin shifts.
    pub achieved_delta: f64,
    /// Largest absolute per-unit margin shift.
    pub max_unit_delta: f64,
    pub requested_delta: f64,
    pub current_margin: f64,
    pub target_margin: f64,
    pub mode: SolveMode,
    /// The target was already met; no allocation was made.
    pub no_op: bool,
    pub scope: Vec<UnitId>,
}

impl SolverResult {
    /// Margin shift allocated to a unit (zero if it received none).
    pub fn unit_delta(&self, unit: &UnitId) -> f64 {
        self.per_unit_local_swing.get(unit).map_or(0.0, PartyDelta::margin_shift)
    }

    /// A new scenario with this allocation installed as the scope's local overrides.
    /// Overrides for units outside the scope are kept; the input is not modified.
    pub fn apply_to(&self, scenario: &SwingScenario) -> SwingScenario {
        let mut next = scenario.clone();
        for unit in &self.scope { next.local_overrides.remove(unit); }
        next.local_overrides.extend(self.per_unit_local_swing.iter().map(|(u, d)| (u.clone(), *d)));
        next
    }
}

/// Distribute an aggregate margin shift across units.
///
/// With `elasticities = None` every unit receives `delta` exactly. Otherwise
/// unit `i` receives `delta * e_i / Σ(w_i * e_i)`, so that `Σ(w_i * d_i) == delta`.
/// `weights` are turnout shares summing to one.
pub fn allocate(delta: f64, weights: &[f64], elasticities: Option<&[f64]>) -> Vec<f64> {
    let Some(elasticities) = elasticities else { return vec![delta; weights.len()] };
    debug_assert_eq!(weights.len(), elasticities.len(), "weights and elasticities must align");

    let denom: f64 = weights.iter().zip(elasticities).map(|(w, e)| w * e).sum();
    let denom = if denom > 0.0 && denom.is_finite() { denom } else { 1.0 };

    elasticities.iter().map(|e| delta * e / denom).collect()
}

/// Inverse solver: per-unit swings that reproduce a target aggregate margin.
pub struct TargetedSolver<'a> {
    store: &'a BaselineStore,
    elasticity: &'a dyn ElasticitySource,
    config: SolverConfig,
}

impl<'a> TargetedSolver<'a> {
    pub fn new(store: &'a BaselineStore, elasticity: &'a dyn ElasticitySource) -> Self {
        Self { store, elasticity, config: SolverConfig::default() }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Compute the local swings that move `scope`'s turnout-weighted margin in
    /// `cycle` from its current value under `scenario` to `target_margin`.
    ///
    /// The current margin is taken under the scenario's global swing only; any
    /// existing local overrides for the scope are replaced by the result.
    pub fn solve(&self, scope: &[UnitId], cycle: Cycle, scenario: &SwingScenario, target_margin: f64, mode: SolveMode)
        -> Result<SolverResult, SolverError>
    {
        if !target_margin.is_finite() { return Err(SolverError::InvalidTarget(target_margin)) }

        let global_only = scenario.without_local_overrides();
        let results: Vec<ProjectedUnitResult> = scope.iter()
            .map(|unit| match self.store.record(unit, cycle) {
                Some(record) => project(record, &global_only),
                None => ProjectedUnitResult::not_reporting(unit.clone()),
            })
            .collect();

        let current = aggregate(&results, scenario.has_global_swing());
        if current.is_empty() { return Err(SolverError::EmptyScope { units: scope.len() }) }

        let delta = target_margin - current.weighted_margin;
        let mut result = SolverResult {
            per_unit_local_swing: BTreeMap::new(),
            achieved_delta: 0.0,
            max_unit_delta: 0.0,
            requested_delta: delta,
            current_margin: current.weighted_margin,
            target_margin,
            mode,
            no_op: false,
            scope: scope.to_vec(),
        };

        if delta.abs() < self.config.tolerance_pp {
            tracing::debug!(
                target: "swingmap::solver",
                current = current.weighted_margin,
                target = target_margin,
                "solve.no_op"
            );
            result.no_op = true;
            return Ok(result);
        }

        let total = current.total_turnout as f64;
        let weights: Vec<f64> = results.iter().map(|r| r.turnout as f64 / total).collect();
        let elasticities: Option<Vec<f64>> = match mode {
            SolveMode::Uniform => None,
            SolveMode::Elastic => Some(scope.iter().map(|unit| self.elasticity.elasticity(unit)).collect()),
        };
        let unit_deltas = allocate(delta, &weights, elasticities.as_deref());

        result.achieved_delta = weights.iter().zip(&unit_deltas).map(|(w, d)| w * d).sum();
        result.max_unit_delta = unit_deltas.iter().fold(0.0, |max, d| d.abs().max(max));
        result.per_unit_local_swing = scope.iter().cloned()
            .zip(unit_deltas.iter().map(|&d| PartyDelta::from_margin_shift(d)))
            .collect();

        tracing::debug!(
            target: "swingmap::solver",
            %mode,
            units = scope.len(),
            current = current.weighted_margin,
            target = target_margin,
            delta,
            max_unit_delta = result.max_unit_delta,
            "solve.allocated"
        );

        Ok(result)
    }
}
