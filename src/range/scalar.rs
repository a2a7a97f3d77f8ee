// Author: Lukas Bower
// Purpose: Range-map flavor storing one scalar value per covered zone.

//! Scalar range map: overwrite-on-write values per zone.

use crate::error::Error;
use crate::range::RangeMap;
use crate::zone::Zone;

/// Interval map holding a single value per covered zone.
///
/// Writes overwrite whatever the zone held. Reads on uncovered addresses
/// yield `None`; the strict [`ScalarRangeMap::at`] raises
/// [`Error::LookupMiss`] instead.
#[derive(Debug, Clone)]
pub struct ScalarRangeMap<V> {
    map: RangeMap<V>,
}

impl<V> Default for ScalarRangeMap<V> {
    fn default() -> Self {
        Self {
            map: RangeMap::new(),
        }
    }
}

impl<V: Clone> ScalarRangeMap<V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `zone` with `value`.
    pub fn insert(&mut self, zone: impl Into<Zone>, value: V) {
        self.map.replace(zone, value);
    }

    /// Remove coverage of `zone`, splitting boundary intervals.
    pub fn remove(&mut self, zone: impl Into<Zone>) {
        self.map.clear(zone);
    }

    /// Drop every stored interval.
    pub fn clear_all(&mut self) {
        self.map.clear_all();
    }

    /// Value covering `addr`, if any.
    #[must_use]
    pub fn get(&self, addr: u64) -> Option<&V> {
        self.map.lookup(addr)
    }

    /// Strict lookup: a miss is an [`Error::LookupMiss`].
    pub fn at(&self, addr: u64) -> Result<&V, Error> {
        self.map.lookup(addr).ok_or(Error::LookupMiss { addr })
    }

    /// Iterate over stored intervals in address order.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, &V)> + '_ {
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

    /// Merge adjacent intervals holding equal values.
    pub fn compact(&mut self)
    where
        V: PartialEq,
    {
        self.map.compact(|a, b| a == b, |_| false);
    }
}
