use std::{collections::BTreeMap, ops::Add, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::map::UnitId;

/// Lower bound on the turnout multiplier.
pub const MIN_TURNOUT_FACTOR: f64 = 0.5;

/// Upper bound on the turnout multiplier.
pub const MAX_TURNOUT_FACTOR: f64 = 1.5;

/// Additive percentage-point swing for the two major parties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyDelta {
    #[serde(rename = "GOP", default)]
    pub gop_pp: f64,
    #[serde(rename = "DEM", default)]
    pub dem_pp: f64,
}

impl PartyDelta {
    pub const ZERO: PartyDelta = PartyDelta { gop_pp: 0.0, dem_pp: 0.0 };

    pub fn new(gop_pp: f64, dem_pp: f64) -> Self { Self { gop_pp, dem_pp } }

    /// Split a margin change symmetrically across the two parties.
    /// Moving GOP by `+d/2` and DEM by `-d/2` changes the margin by exactly `d`.
    pub fn from_margin_shift(margin_pp: f64) -> Self {
        Self { gop_pp: margin_pp / 2.0, dem_pp: -margin_pp / 2.0 }
    }

    /// The margin change this delta produces before any clamping.
    #[inline] pub fn margin_shift(&self) -> f64 { self.gop_pp - self.dem_pp }

    #[inline] pub fn is_zero(&self) -> bool { self.gop_pp == 0.0 && self.dem_pp == 0.0 }
}

impl Add for PartyDelta {
    type Output = PartyDelta;

    fn add(self, rhs: PartyDelta) -> PartyDelta {
        PartyDelta { gop_pp: self.gop_pp + rhs.gop_pp, dem_pp: self.dem_pp + rhs.dem_pp }
    }
}

/// A user-authored "what-if" hypothesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwingScenario {
    /// Swing applied to every unit.
    #[serde(rename = "partyDeltaPP")]
    pub party_delta_pp: PartyDelta,
    /// Per-unit swing, applied in addition to the global swing.
    pub local_overrides: BTreeMap<UnitId, PartyDelta>,
    /// Turnout change in percent (+10 means a factor of 1.10).
    pub turnout_shift_pct: f64,
}

impl SwingScenario {
    /// An unperturbed scenario.
    pub fn new() -> Self { Self::default() }

    /// A scenario with only a global swing.
    pub fn global(gop_pp: f64, dem_pp: f64) -> Self {
        Self { party_delta_pp: PartyDelta::new(gop_pp, dem_pp), ..Self::default() }
    }

    /// Read a scenario from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[SwingScenario::from_json_file] Failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("[SwingScenario::from_json_file] Failed to parse {}", path.display()))
    }

    pub fn with_turnout_shift(mut self, pct: f64) -> Self {
        self.turnout_shift_pct = pct;
        self
    }

    /// Multiplicative turnout factor, clamped to `[0.5, 1.5]`.
    pub fn turnout_factor(&self) -> f64 {
        let factor = 1.0 + self.turnout_shift_pct / 100.0;
        if !factor.is_finite() { return 1.0 }
        factor.clamp(MIN_TURNOUT_FACTOR, MAX_TURNOUT_FACTOR)
    }

    /// Total swing applied to a unit: global delta plus any local override.
    pub fn effective_delta(&self, unit: &UnitId) -> PartyDelta {
        match self.local_overrides.get(unit) {
            Some(local) => self.party_delta_pp + *local,
            None => self.party_delta_pp,
        }
    }

    /// True when the global swing is non-zero.
    #[inline] pub fn has_global_swing(&self) -> bool { !self.party_delta_pp.is_zero() }

    /// True when any swing is non-zero. An unperturbed scenario reports the
    /// untouched baseline rather than a numerically identical projection.
    pub fn has_swing(&self) -> bool {
        self.has_global_swing() || self.local_overrides.values().any(|d| !d.is_zero())
    }

    /// A copy of this scenario without per-unit overrides.
    pub fn without_local_overrides(&self) -> Self {
        Self { local_overrides: BTreeMap::new(), ..self.clone() }
    }
}
