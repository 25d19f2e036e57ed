use std::collections::BTreeMap;

use ahash::AHashMap;

use super::{RegionId, Unit, UnitId};

/// The set of known units, with contiguous indices and a region lookup.
#[derive(Debug, Clone, Default)]
pub struct UnitLayer {
    index: AHashMap<UnitId, u32>, // Map between unit ids and contiguous indices.
    units: Vec<Unit>,
    regions: BTreeMap<RegionId, Vec<u32>>,
}

impl UnitLayer {
    pub fn new() -> Self { Self::default() }

    /// Number of units in the layer.
    #[inline] pub fn len(&self) -> usize { self.units.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.units.is_empty() }

    /// All units, in insertion order.
    #[inline] pub fn units(&self) -> &[Unit] { &self.units }

    #[inline] pub fn contains(&self, id: &UnitId) -> bool { self.index.contains_key(id) }

    /// Get a unit by its id.
    pub fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.index.get(id).map(|&i| &self.units[i as usize])
    }

    /// Register a unit. Units are immutable once loaded, so an existing entry is kept.
    /// Returns true if the unit was newly inserted.
    pub fn insert(&mut self, unit: Unit) -> bool {
        if self.index.contains_key(&unit.id) { return false }

        let i = self.units.len() as u32;
        self.index.insert(unit.id.clone(), i);
        self.regions.entry(unit.region.clone()).or_default().push(i);
        self.units.push(unit);
        true
    }

    /// Region codes, in sorted order.
    pub fn regions(&self) -> impl Iterator<Item = &RegionId> { self.regions.keys() }

    /// Units belonging to a region (empty if the region is unknown).
    pub fn units_in_region(&self, region: &RegionId) -> Vec<&Unit> {
        self.regions.get(region)
            .map(|indices| indices.iter().map(|&i| &self.units[i as usize]).collect())
            .unwrap_or_default()
    }
}
