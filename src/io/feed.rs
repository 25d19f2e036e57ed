//! Newline-delimited JSON update feeds.
//!
//! Each line is one record. Payloads from live sources are loosely typed, so
//! every field is validated here; a line that fails is dropped and counted
//! rather than mixed into the store as implicit zeros.

use std::io::BufRead;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    baseline::{BaselineRecord, Party},
    io::row::{BaselineLoad, ParsedRow, RowError, parse_count, parse_cycle},
    map::{RegionId, Unit, UnitId},
};

#[derive(Debug, Deserialize)]
struct RawFeedRecord {
    #[serde(default, alias = "unitCode")]
    unit_code: Option<Value>,
    #[serde(default)]
    cycle: Option<Value>,
    #[serde(default, alias = "totalVotes")]
    total_votes: Option<Value>,
    #[serde(default, alias = "votesByParty")]
    votes: serde_json::Map<String, Value>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// A unit code given as a string or as a number (which may have lost leading zeros).
fn unit_id(value: Option<&Value>) -> Result<UnitId, RowError> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(UnitId::new(s)),
        Some(Value::Number(n)) => n.as_u64().map(UnitId::from_number).ok_or(RowError::MissingUnitCode),
        _ => Err(RowError::MissingUnitCode),
    }
}

fn count(field: &str, value: &Value) -> Result<u64, RowError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| parse_count(&n.to_string())),
        Value::String(s) => parse_count(s),
        _ => None,
    };
    parsed.ok_or_else(|| RowError::InvalidVotes { field: field.to_string(), value: value.to_string() })
}

/// Parse and validate a single feed line.
pub fn parse_feed_line(line: &str) -> Result<ParsedRow, RowError> {
    let raw: RawFeedRecord = serde_json::from_str(line)
        .map_err(|e| RowError::Malformed(e.to_string()))?;

    let id = unit_id(raw.unit_code.as_ref())?;
    let cycle = match &raw.cycle {
        Some(Value::Number(n)) => parse_cycle(&n.to_string())?,
        Some(Value::String(s)) => parse_cycle(s)?,
        Some(other) => return Err(RowError::InvalidCycle(other.to_string())),
        None => return Err(RowError::MissingCycle),
    };
    let total_votes = count("total_votes", raw.total_votes.as_ref().ok_or(RowError::MissingTotal)?)?;

    let votes = raw.votes.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(tag, value)| Ok((Party::from(tag.clone()), count(tag, value)?)))
        .collect::<Result<Vec<(Party, u64)>, RowError>>()?;

    let region = raw.region.as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(RegionId::new)
        .unwrap_or_else(|| id.to_region());

    Ok(ParsedRow {
        unit: Unit::new(id.clone(), region, raw.name.as_deref()),
        record: BaselineRecord::new(id, cycle, total_votes, votes),
    })
}

/// Parse a whole feed. Blank lines are skipped; I/O failures are fatal.
pub fn parse_feed(reader: impl BufRead) -> Result<BaselineLoad> {
    let mut load = BaselineLoad::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("[io::feed] Failed to read line {}", i + 1))?;
        if line.trim().is_empty() { continue }
        load.accept(parse_feed_line(&line), i + 1, "feed");
    }

    tracing::debug!(
        target: "swingmap::io",
        records = load.records.len(),
        dropped = load.dropped,
        "baseline.feed_parsed"
    );
    Ok(load)
}
