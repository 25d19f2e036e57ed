//! Forward projection: swing transform and turnout-weighted aggregation.

mod aggregate;
mod transform;

pub use aggregate::{AggregateResult, aggregate, aggregate_by_region};
pub use transform::{ProjectedUnitResult, apply_delta, project};
