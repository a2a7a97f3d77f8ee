// Author: Lukas Bower
// Purpose: Range-map flavor holding a key-value dictionary per covered zone.

//! Dictionary range map: per-zone key-value mappings.

use std::collections::BTreeMap;

use crate::range::RangeMap;
use crate::zone::Zone;

/// Interval map holding a key-value mapping per covered zone.
///
/// Key writes apply per segment like [`SetRangeMap`](crate::SetRangeMap)
/// mutations; reading a key from an address with no mapping yields
/// `None`, never an error.
#[derive(Debug, Clone)]
pub struct DictRangeMap<K, V> {
    map: RangeMap<BTreeMap<K, V>>,
}

impl<K, V> Default for DictRangeMap<K, V> {
    fn default() -> Self {
        Self {
            map: RangeMap::new(),
        }
    }
}

impl<K: Ord + Clone, V: Clone> DictRangeMap<K, V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` in every segment of `zone`, creating empty
    /// mappings for previously-uncovered gaps.
    pub fn insert_key(&mut self, zone: impl Into<Zone>, key: K, value: V) {
        for (_zone, dict) in self.map.populate(zone, BTreeMap::new()) {
            dict.insert(key.clone(), value.clone());
        }
    }

    /// Remove `key` from every covered segment intersecting `zone`,
    /// splitting boundary segments. Missing keys are tolerated.
    pub fn remove_key(&mut self, zone: impl Into<Zone>, key: &K) {
        for (_zone, dict) in self.map.split_overlaps(zone) {
            dict.remove(key);
        }
    }

    /// Overwrite `zone` with exactly `entries`.
    pub fn assign(&mut self, zone: impl Into<Zone>, entries: BTreeMap<K, V>) {
        self.map.replace(zone, entries);
    }

    /// Remove coverage of `zone`, splitting boundary intervals.
    pub fn remove_zone(&mut self, zone: impl Into<Zone>) {
        self.map.clear(zone);
    }

    /// Drop every stored interval.
    pub fn clear_all(&mut self) {
        self.map.clear_all();
    }

    /// Mapping covering `addr`, if any.
    #[must_use]
    pub fn get(&self, addr: u64) -> Option<&BTreeMap<K, V>> {
        self.map.lookup(addr)
    }

    /// Value of `key` at `addr`; `None` when the address or key is
    /// unmapped.
    #[must_use]
    pub fn get_key(&self, addr: u64, key: &K) -> Option<&V> {
        self.get(addr).and_then(|dict| dict.get(key))
    }

    /// Iterate over stored intervals in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, &BTreeMap<K, V>)> + '_ {
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

    /// Merge adjacent intervals holding equal mappings and drop empty
    /// ones.
    pub fn compact(&mut self)
    where
        V: PartialEq,
    {
        self.map.compact(|a, b| a == b, BTreeMap::is_empty);
    }
}
