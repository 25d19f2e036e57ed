use serde::{Deserialize, Serialize};

/// Lower edges (pp) of buckets 1 through 5; bucket 0 is anything under 1pp.
pub const MARGIN_THRESHOLDS: [f64; 5] = [1.0, 5.0, 10.0, 20.0, 30.0];

/// Number of margin buckets.
pub const BUCKET_COUNT: usize = MARGIN_THRESHOLDS.len() + 1;

/// Which party leads a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Gop,
    Dem,
    Tied,
}

impl Side {
    pub fn of(margin: f64) -> Self {
        if margin > 0.0 { Side::Gop } else if margin < 0.0 { Side::Dem } else { Side::Tied }
    }
}

/// Map a margin magnitude to a bucket index in `[0, 5]`.
/// Buckets: <1, 1–5, 5–10, 10–20, 20–30, ≥30. NaN falls in bucket 0.
pub fn margin_to_bucket(abs_margin: f64) -> usize {
    let m = abs_margin.abs();
    MARGIN_THRESHOLDS.iter().take_while(|&&t| m >= t).count()
}

/// Signed margin encoded as a leading side plus a bucket index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginBucket {
    pub side: Side,
    pub index: usize,
}

impl MarginBucket {
    pub fn from_margin(margin: f64) -> Self {
        Self { side: Side::of(margin), index: margin_to_bucket(margin) }
    }
}
