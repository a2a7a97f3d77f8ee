// Author: Lukas Bower
// Purpose: Range-map flavor answering which devices own an address.

//! Owner lookup: ordered device registrations over address zones.

use core::fmt;

use crate::range::RangeMap;
use crate::zone::Zone;

/// Interval map answering "which device(s) own this address".
///
/// Each covered segment holds the list of `(owner, registration zone)`
/// pairs in insertion order; overlapping registrations preserve
/// multiplicity, so the same owner can appear once per registration.
#[derive(Debug, Clone)]
pub struct AddrLookup<O> {
    map: RangeMap<Vec<(O, Zone)>>,
}

impl<O> Default for AddrLookup<O> {
    fn default() -> Self {
        Self {
            map: RangeMap::new(),
        }
    }
}

impl<O> AddrLookup<O> {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First registered owner covering `addr`, with its original
    /// registration zone.
    ///
    /// `None` means no owner is registered there; callers conventionally
    /// render that as an unknown owner spanning [`Zone::all`].
    #[must_use]
    pub fn owner(&self, addr: u64) -> Option<(&O, Zone)> {
        self.map
            .lookup(addr)
            .and_then(|owners| owners.first())
            .map(|(owner, zone)| (owner, *zone))
    }

    /// All registrations covering `addr`, in insertion order.
    #[must_use]
    pub fn owners(&self, addr: u64) -> &[(O, Zone)] {
        match self.map.lookup(addr) {
            Some(owners) => owners,
            None => &[],
        }
    }

    /// Iterate over covered segments and their registrations.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, &[(O, Zone)])> + '_ {
        self.map.iter().map(|(zone, owners)| (zone, owners.as_slice()))
    }

    /// Number of stored segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no registration exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<O: Clone + PartialEq> AddrLookup<O> {
    /// Register `owner` over `zone`.
    ///
    /// Every segment the zone touches records the `(owner, zone)` pair;
    /// gaps become fresh segments.
    pub fn add(&mut self, zone: impl Into<Zone>, owner: O) {
        let zone = zone.into();
        for (_zone, owners) in self.map.populate(zone, Vec::new()) {
            owners.push((owner.clone(), zone));
        }
    }

    /// Drop the registration of `owner` made over exactly `zone`.
    ///
    /// Segments where the pair is absent are silently tolerated.
    pub fn remove(&mut self, zone: impl Into<Zone>, owner: &O) {
        let zone = zone.into();
        for (_zone, owners) in self.map.overlaps_mut(zone) {
            if let Some(at) = owners
                .iter()
                .position(|(o, z)| o == owner && *z == zone)
            {
                owners.remove(at);
            }
        }
    }

    /// Remove coverage of `zone`, splitting boundary segments.
    pub fn clear(&mut self, zone: impl Into<Zone>) {
        self.map.clear(zone);
    }

    /// Drop every stored segment.
    pub fn clear_all(&mut self) {
        self.map.clear_all();
    }

    /// Merge adjacent segments with identical registrations and drop
    /// segments whose registration list emptied.
    pub fn compact(&mut self) {
        self.map.compact(|a, b| a == b, Vec::is_empty);
    }
}

impl<O: fmt::Display> fmt::Display for AddrLookup<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (zone, owners) in self.iter() {
            write!(f, "{:#11x} - {:#11x}", zone.start, zone.stop - 1)?;
            match owners.len() {
                0 => writeln!(f, " (empty range)")?,
                1 => writeln!(f, " : {}", owners[0].0)?,
                n => {
                    writeln!(f, " ({n} devices)")?;
                    let mut sorted: Vec<&(O, Zone)> = owners.iter().collect();
                    sorted.sort_by_key(|(_, zone)| zone.start);
                    for (owner, registered) in sorted {
                        writeln!(
                            f,
                            "      {:#10x} - {:#8x} : {}",
                            registered.start,
                            registered.stop - 1,
                            owner
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}
