use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::map::UnitId;

/// An election cycle, identified by its year.
pub type Cycle = u16;

/// Party tag attached to a vote count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Party {
    Gop,
    Dem,
    Other(Arc<str>),
}

impl Party {
    pub fn as_str(&self) -> &str {
        match self {
            Party::Gop => "GOP",
            Party::Dem => "DEM",
            Party::Other(tag) => tag,
        }
    }
}

impl FromStr for Party {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_uppercase();
        Ok(match tag.as_str() {
            "GOP" | "REP" => Party::Gop,
            "DEM" => Party::Dem,
            _ => Party::Other(Arc::from(tag)),
        })
    }
}

impl From<String> for Party {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(party) => party,
            Err(never) => match never {},
        }
    }
}

impl From<Party> for String {
    fn from(party: Party) -> Self { party.as_str().to_string() }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Two-party vote shares, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Shares {
    pub gop: f64,
    pub dem: f64,
}

impl Shares {
    pub const ZERO: Shares = Shares { gop: 0.0, dem: 0.0 };

    /// Signed margin in percentage points, positive favors GOP.
    #[inline] pub fn margin(&self) -> f64 { (self.gop - self.dem) * 100.0 }
}

/// One unit's result for one election cycle.
///
/// `total_votes` is the authoritative turnout. Party counts may under-sum it;
/// the residual is attributed to other or third-party candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub unit: UnitId,
    pub cycle: Cycle,
    pub total_votes: u64,
    pub votes: BTreeMap<Party, u64>,
}

impl BaselineRecord {
    pub fn new(unit: UnitId, cycle: Cycle, total_votes: u64, votes: impl IntoIterator<Item = (Party, u64)>) -> Self {
        Self { unit, cycle, total_votes, votes: votes.into_iter().collect() }
    }

    /// Convenience constructor for a two-party result.
    pub fn two_party(unit: UnitId, cycle: Cycle, total_votes: u64, gop: u64, dem: u64) -> Self {
        Self::new(unit, cycle, total_votes, [(Party::Gop, gop), (Party::Dem, dem)])
    }

    #[inline] pub fn votes_for(&self, party: &Party) -> u64 { self.votes.get(party).copied().unwrap_or(0) }

    #[inline] pub fn gop_votes(&self) -> u64 { self.votes_for(&Party::Gop) }

    #[inline] pub fn dem_votes(&self) -> u64 { self.votes_for(&Party::Dem) }

    /// A unit with no turnout has not reported yet.
    #[inline] pub fn is_reporting(&self) -> bool { self.total_votes > 0 }

    /// Votes not attributed to any listed party.
    pub fn residual_votes(&self) -> u64 {
        self.total_votes.saturating_sub(self.votes.values().sum())
    }

    /// Baseline two-party shares of total turnout (zero when not reporting).
    pub fn shares(&self) -> Shares {
        if !self.is_reporting() { return Shares::ZERO }

        let total = self.total_votes.max(1) as f64;
        Shares {
            gop: self.gop_votes() as f64 / total,
            dem: self.dem_votes() as f64 / total,
        }
    }

    /// Baseline margin in percentage points.
    #[inline] pub fn margin(&self) -> f64 { self.shares().margin() }
}
