//! Palette lookup for margin buckets.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{MarginBucket, Side};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Neutral gray for tied or non-finite margins.
pub const NEUTRAL: Rgb = Rgb { r: 150, g: 150, b: 150 };

// Light to dark, indexed by bucket.
const GOP_RAMP: [Rgb; 6] = [
    Rgb { r: 238, g: 192, b: 190 },
    Rgb { r: 243, g: 160, b: 157 },
    Rgb { r: 229, g:  99, b: 109 },
    Rgb { r: 220, g:  66, b:  83 },
    Rgb { r: 211, g:  33, b:  58 },
    Rgb { r: 202, g:   0, b:  32 },
];

const DEM_RAMP: [Rgb; 6] = [
    Rgb { r: 187, g: 213, b: 227 },
    Rgb { r: 150, g: 199, b: 222 },
    Rgb { r:  94, g: 166, b: 205 },
    Rgb { r:  64, g: 148, b: 195 },
    Rgb { r:  35, g: 131, b: 186 },
    Rgb { r:   5, g: 113, b: 176 },
];

/// Palette entry for a bucketed margin.
pub fn bucket_color(bucket: MarginBucket) -> Rgb {
    let index = bucket.index.min(GOP_RAMP.len() - 1);
    match bucket.side {
        Side::Gop => GOP_RAMP[index],
        Side::Dem => DEM_RAMP[index],
        Side::Tied => NEUTRAL,
    }
}

/// Palette entry for a signed margin (positive favors GOP).
pub fn margin_color(margin: f64) -> Rgb {
    if !margin.is_finite() { return NEUTRAL }
    bucket_color(MarginBucket::from_margin(margin))
}
