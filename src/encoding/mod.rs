//! Pure numeric mappings from results to visual encodings.
//!
//! Nothing here knows how a bucket or height is drawn; the renderer owns that.

mod bucket;
mod color;
mod extrusion;

pub use bucket::{BUCKET_COUNT, MARGIN_THRESHOLDS, MarginBucket, Side, margin_to_bucket};
pub use color::{NEUTRAL, Rgb, bucket_color, margin_color};
pub use extrusion::{ExtrusionScale, turnout_p95};
