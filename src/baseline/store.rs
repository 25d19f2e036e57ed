use std::{collections::BTreeMap, sync::Arc};

use ahash::AHashMap;

use crate::map::{Unit, UnitId, UnitLayer};
use super::{BaselineRecord, Cycle};

/// Historical vote counts keyed by unit and election cycle.
///
/// Records are held behind `Arc` and replaced whole, so cloning the store is
/// cheap and an update never leaves a unit half-written.
#[derive(Debug, Clone, Default)]
pub struct BaselineStore {
    units: UnitLayer,
    cycles: BTreeMap<Cycle, AHashMap<UnitId, Arc<BaselineRecord>>>,
}

impl BaselineStore {
    pub fn new() -> Self { Self::default() }

    /// Build a store from a unit list and a batch of records.
    pub fn from_parts(units: impl IntoIterator<Item = Unit>, records: impl IntoIterator<Item = BaselineRecord>) -> Self {
        let mut store = Self::new();
        for unit in units { store.insert_unit(unit); }
        for record in records { store.upsert(record); }
        store
    }

    /// Get the unit layer.
    #[inline] pub fn units(&self) -> &UnitLayer { &self.units }

    /// Register a unit; units are immutable once loaded, so an existing entry is kept.
    #[inline] pub fn insert_unit(&mut self, unit: Unit) -> bool { self.units.insert(unit) }

    /// Insert or replace the record for `(record.unit, record.cycle)`, returning the previous one.
    /// Units seen for the first time are registered with a region derived from their code.
    pub fn upsert(&mut self, record: BaselineRecord) -> Option<Arc<BaselineRecord>> {
        if !self.units.contains(&record.unit) {
            self.units.insert(Unit::from_id(record.unit.clone()));
        }

        self.cycles.entry(record.cycle)
            .or_default()
            .insert(record.unit.clone(), Arc::new(record))
    }

    /// Number of (unit, cycle) records held.
    pub fn len(&self) -> usize { self.cycles.values().map(|c| c.len()).sum() }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Cycles with at least one record, in ascending order.
    pub fn cycles(&self) -> Vec<Cycle> { self.cycles.keys().copied().collect() }

    /// The most recent cycle with data.
    pub fn latest_cycle(&self) -> Option<Cycle> { self.cycles.keys().next_back().copied() }

    /// Get the record for a unit in a cycle.
    pub fn record(&self, unit: &UnitId, cycle: Cycle) -> Option<&Arc<BaselineRecord>> {
        self.cycles.get(&cycle)?.get(unit)
    }

    /// Baseline turnout for a unit in a cycle (zero when no record exists).
    pub fn turnout(&self, unit: &UnitId, cycle: Cycle) -> u64 {
        self.record(unit, cycle).map_or(0, |r| r.total_votes)
    }

    /// All of a unit's records, in ascending cycle order.
    pub fn history(&self, unit: &UnitId) -> Vec<&BaselineRecord> {
        self.cycles.values()
            .filter_map(|records| records.get(unit).map(|r| r.as_ref()))
            .collect()
    }

    /// The cycles for which a unit has a record, in ascending order.
    pub fn unit_cycles(&self, unit: &UnitId) -> Vec<Cycle> {
        self.cycles.iter()
            .filter(|(_, records)| records.contains_key(unit))
            .map(|(&cycle, _)| cycle)
            .collect()
    }
}
