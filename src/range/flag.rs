// Author: Lukas Bower
// Purpose: Range-map flavor tracking boolean membership per zone.

//! Boolean range map: presence flags over address zones.

use crate::range::RangeMap;
use crate::zone::Zone;

/// Interval map tracking boolean membership of address zones.
///
/// Absence reads as `false`, never as an error.
#[derive(Debug, Clone, Default)]
pub struct BoolRangeMap {
    map: RangeMap<()>,
}

impl BoolRangeMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `zone` as set.
    pub fn set(&mut self, zone: impl Into<Zone>) {
        self.map.replace(zone, ());
    }

    /// Mark `zone` as clear, splitting boundary intervals.
    pub fn clear(&mut self, zone: impl Into<Zone>) {
        self.map.clear(zone);
    }

    /// Clear the whole map.
    pub fn clear_all(&mut self) {
        self.map.clear_all();
    }

    /// Whether `addr` is set.
    #[must_use]
    pub fn get(&self, addr: u64) -> bool {
        self.map.lookup(addr).is_some()
    }

    /// Iterate over set zones in address order.
    pub fn zones(&self) -> impl Iterator<Item = Zone> + '_ {
        self.map.zones()
    }

    /// Number of stored intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no zone is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Merge adjacent set zones.
    pub fn compact(&mut self) {
        self.map.compact(|_, _| true, |_| false);
    }
}
