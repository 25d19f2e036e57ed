//! Baseline ingestion, organized by source format.
//!
//! - `csv` - batch loads of historical returns
//! - `feed` - newline-delimited JSON updates from a live source
//!
//! Both produce validated `BaselineRecord`s; malformed rows are dropped and counted.

pub(crate) mod csv;
pub(crate) mod feed;
pub(crate) mod row;

pub use csv::{parse_baseline_csv, read_baseline_csv};
pub use feed::{parse_feed, parse_feed_line};
pub use row::{BaselineLoad, ParsedRow, RowError};
