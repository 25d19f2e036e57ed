//! Row-level validation shared by the CSV and feed readers.

use thiserror::Error;

use crate::{
    baseline::{BaselineRecord, BaselineStore, Cycle},
    map::Unit,
};

/// Why an ingested row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("missing unit code")]
    MissingUnitCode,

    #[error("missing cycle")]
    MissingCycle,

    #[error("invalid cycle '{0}'")]
    InvalidCycle(String),

    #[error("missing total_votes")]
    MissingTotal,

    #[error("invalid vote count '{value}' for '{field}'")]
    InvalidVotes { field: String, value: String },

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A validated row: the unit it describes and its baseline record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub unit: Unit,
    pub record: BaselineRecord,
}

/// Output of a batch ingestion: valid rows plus a count of dropped ones.
#[derive(Debug, Clone, Default)]
pub struct BaselineLoad {
    pub units: Vec<Unit>,
    pub records: Vec<BaselineRecord>,
    pub dropped: usize,
}

impl BaselineLoad {
    /// Record the outcome of parsing one row; failures are counted and logged, not fatal.
    pub(crate) fn accept(&mut self, row: Result<ParsedRow, RowError>, line: usize, source: &str) {
        match row {
            Ok(ParsedRow { unit, record }) => {
                self.units.push(unit);
                self.records.push(record);
            }
            Err(err) => {
                self.dropped += 1;
                tracing::warn!(target: "swingmap::io", source, line, error = %err, "baseline.row_dropped");
            }
        }
    }

    /// Build a baseline store from the loaded rows. Later rows replace earlier ones
    /// for the same (unit, cycle).
    pub fn into_store(self) -> BaselineStore {
        BaselineStore::from_parts(self.units, self.records)
    }
}

/// Parse a non-negative integer vote count. Integral floats ("1200.0") are accepted.
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    let text = text.trim();
    if let Ok(count) = text.parse::<u64>() { return Some(count) }

    let value = text.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then(|| value as u64)
}

/// Parse an election year.
pub(crate) fn parse_cycle(text: &str) -> Result<Cycle, RowError> {
    let text = text.trim();
    if text.is_empty() { return Err(RowError::MissingCycle) }

    text.parse::<Cycle>()
        .ok()
        .or_else(|| {
            let value = text.parse::<f64>().ok()?;
            (value.fract() == 0.0 && (0.0..=Cycle::MAX as f64).contains(&value)).then(|| value as Cycle)
        })
        .ok_or_else(|| RowError::InvalidCycle(text.to_string()))
}
