// Author: Lukas Bower
// Purpose: Range-map flavor holding a key set per covered zone.

//! Set range map: per-zone key sets with segment-wise add and discard.

use std::collections::BTreeSet;

use crate::range::RangeMap;
use crate::zone::Zone;

/// Interval map holding a set of keys per covered zone.
///
/// `add` and `discard` apply per segment: a single logical call over a
/// zone spanning several differently-valued segments touches every
/// segment independently, without merging unrelated segments.
#[derive(Debug, Clone)]
pub struct SetRangeMap<K> {
    map: RangeMap<BTreeSet<K>>,
}

impl<K> Default for SetRangeMap<K> {
    fn default() -> Self {
        Self {
            map: RangeMap::new(),
        }
    }
}

impl<K: Ord + Clone> SetRangeMap<K> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` to every segment of `zone`, creating empty segments for
    /// previously-uncovered gaps.
    pub fn add(&mut self, zone: impl Into<Zone>, key: K) {
        for (_zone, keys) in self.map.populate(zone, BTreeSet::new()) {
            keys.insert(key.clone());
        }
    }

    /// Remove `key` from every covered segment intersecting `zone`,
    /// splitting boundary segments. Missing keys are tolerated.
    pub fn discard(&mut self, zone: impl Into<Zone>, key: &K) {
        for (_zone, keys) in self.map.split_overlaps(zone) {
            keys.remove(key);
        }
    }

    /// Overwrite `zone` with exactly `keys`.
    pub fn assign(&mut self, zone: impl Into<Zone>, keys: BTreeSet<K>) {
        self.map.replace(zone, keys);
    }

    /// Remove coverage of `zone`, splitting boundary intervals.
    pub fn remove_zone(&mut self, zone: impl Into<Zone>) {
        self.map.clear(zone);
    }

    /// Drop every stored interval.
    pub fn clear_all(&mut self) {
        self.map.clear_all();
    }

    /// Key set covering `addr`, if any.
    #[must_use]
    pub fn get(&self, addr: u64) -> Option<&BTreeSet<K>> {
        self.map.lookup(addr)
    }

    /// Whether `key` is present at `addr`.
    #[must_use]
    pub fn contains(&self, addr: u64, key: &K) -> bool {
        self.get(addr).is_some_and(|keys| keys.contains(key))
    }

    /// Iterate over stored intervals in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, &BTreeSet<K>)> + '_ {
        self.map.iter()
    }

    /// Number of stored intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map stores no intervals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Merge adjacent intervals holding equal sets and drop empty ones.
    pub fn compact(&mut self) {
        self.map.compact(|a, b| a == b, BTreeSet::is_empty);
    }
}
