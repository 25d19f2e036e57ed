mod layer;
mod unit;
mod unit_id;

pub use layer::UnitLayer;
pub use unit::Unit;
pub use unit_id::{RegionId, UnitId};
