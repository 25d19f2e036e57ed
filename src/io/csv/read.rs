//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result, bail};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader, StringChunked}};

use crate::{
    baseline::{BaselineRecord, Party},
    io::row::{BaselineLoad, ParsedRow, RowError, parse_count, parse_cycle},
    map::{RegionId, Unit, UnitId},
};

const UNIT_COLUMN: &str = "unit_code";
const CYCLE_COLUMN: &str = "cycle";
const TOTAL_COLUMN: &str = "total_votes";
const REGION_COLUMN: &str = "region";
const NAME_COLUMN: &str = "name";
const VOTES_PREFIX: &str = "votes_";

/// Read every column as text so codes keep their leading zeros and each cell is validated here.
fn baseline_csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Reads a baseline CSV file from `path`.
pub fn read_baseline_csv(path: &Path) -> Result<BaselineLoad> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    let df = CsvReader::new(file)
        .with_options(baseline_csv_options())
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))?;

    baseline_from_frame(&df, &path.display().to_string())
}

/// Reads a baseline CSV from a string.
pub fn parse_baseline_csv(csv: &str) -> Result<BaselineLoad> {
    let df = CsvReader::new(Cursor::new(csv.as_bytes()))
        .with_options(baseline_csv_options())
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")?;

    baseline_from_frame(&df, "<string>")
}

/// Get a text column by name, if present.
fn text_column<'a>(df: &'a DataFrame, name: &str) -> Result<Option<&'a StringChunked>> {
    if !df.get_column_names().iter().any(|c| c.as_str() == name) { return Ok(None) }
    Ok(Some(df.column(name)?.str()?))
}

/// Get a required text column by name.
fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    match text_column(df, name)? {
        Some(column) => Ok(column),
        None => bail!("[io::csv::read] CSV is missing required column '{name}'"),
    }
}

/// A trimmed, non-empty cell, if any.
fn cell(column: Option<&StringChunked>, row: usize) -> Option<&str> {
    column.and_then(|c| c.get(row)).map(str::trim).filter(|s| !s.is_empty())
}

/// The text columns of a baseline frame.
struct BaselineColumns<'a> {
    units: &'a StringChunked,
    cycles: &'a StringChunked,
    totals: &'a StringChunked,
    regions: Option<&'a StringChunked>,
    names: Option<&'a StringChunked>,
    parties: Vec<(String, Party, &'a StringChunked)>,
}

impl<'a> BaselineColumns<'a> {
    fn new(df: &'a DataFrame) -> Result<Self> {
        let mut parties = Vec::new();
        for name in df.get_column_names() {
            let Some(tag) = name.as_str().strip_prefix(VOTES_PREFIX) else { continue };
            parties.push((name.to_string(), Party::from(tag.to_string()), required_column(df, name.as_str())?));
        }

        Ok(Self {
            units: required_column(df, UNIT_COLUMN)?,
            cycles: required_column(df, CYCLE_COLUMN)?,
            totals: required_column(df, TOTAL_COLUMN)?,
            regions: text_column(df, REGION_COLUMN)?,
            names: text_column(df, NAME_COLUMN)?,
            parties,
        })
    }

    fn parse_row(&self, row: usize) -> Result<ParsedRow, RowError> {
        let code = cell(Some(self.units), row).ok_or(RowError::MissingUnitCode)?;
        let cycle = parse_cycle(cell(Some(self.cycles), row).unwrap_or(""))?;
        let total = cell(Some(self.totals), row).ok_or(RowError::MissingTotal)?;
        let total_votes = parse_count(total).ok_or_else(|| RowError::InvalidVotes {
            field: TOTAL_COLUMN.to_string(),
            value: total.to_string(),
        })?;

        let mut votes = Vec::with_capacity(self.parties.len());
        for (name, party, column) in &self.parties {
            // An empty cell means the party had no candidate.
            let Some(value) = cell(Some(*column), row) else { continue };
            let count = parse_count(value).ok_or_else(|| RowError::InvalidVotes {
                field: name.clone(),
                value: value.to_string(),
            })?;
            votes.push((party.clone(), count));
        }

        let id = UnitId::new(code);
        let region = cell(self.regions, row).map(RegionId::new).unwrap_or_else(|| id.to_region());
        Ok(ParsedRow {
            unit: Unit::new(id.clone(), region, cell(self.names, row)),
            record: BaselineRecord::new(id, cycle, total_votes, votes),
        })
    }
}

/// Convert a text-typed baseline frame into validated records.
/// Missing required columns are fatal; malformed rows are dropped and counted.
fn baseline_from_frame(df: &DataFrame, source: &str) -> Result<BaselineLoad> {
    let columns = BaselineColumns::new(df)?;

    let mut load = BaselineLoad::default();
    for row in 0..df.height() {
        load.accept(columns.parse_row(row), row + 2, source);
    }

    tracing::info!(
        target: "swingmap::io",
        source,
        records = load.records.len(),
        dropped = load.dropped,
        "baseline.csv_loaded"
    );
    Ok(load)
}
