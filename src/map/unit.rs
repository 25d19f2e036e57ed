use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{RegionId, UnitId};

/// A geographic reporting entity (county, riding, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub region: RegionId,
    pub name: Option<Arc<str>>, // Common name
}

impl Unit {
    pub fn new(id: UnitId, region: RegionId, name: Option<&str>) -> Self {
        Self { id, region, name: name.map(Arc::from) }
    }

    /// A unit whose region is derived from its code.
    pub fn from_id(id: UnitId) -> Self {
        let region = id.to_region();
        Self { id, region, name: None }
    }

    /// Display label: the common name if known, else the code.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.id())
    }
}
