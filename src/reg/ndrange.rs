// Author: Lukas Bower
// Purpose: Describe multi-axis register-array footprints with reverse lookup.

//! Multi-dimensional address ranges for register arrays.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::zone::Zone;

/// One axis of a register array: `[start, stop)` byte offsets with a
/// stride between consecutive indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axis {
    /// Offset of index 0.
    pub start: u64,
    /// First offset past the axis.
    pub stop: u64,
    /// Stride between consecutive indices.
    pub step: u64,
}

impl Axis {
    /// Unit-stride axis over `[start, stop)`.
    ///
    /// The stride is normalized to the element size when the axis joins
    /// an [`NdRange`].
    #[must_use]
    pub const fn new(start: u64, stop: u64) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    /// Axis with an explicit stride.
    #[must_use]
    pub const fn stepped(start: u64, stop: u64, step: u64) -> Self {
        Self { start, stop, step }
    }

    /// Axis with `count` indices spaced `step` apart.
    #[must_use]
    pub const fn counted(start: u64, count: u64, step: u64) -> Self {
        Self {
            start,
            stop: start + count * step,
            step,
        }
    }

    /// Number of indices on the axis.
    #[must_use]
    pub const fn count(&self) -> u64 {
        if self.stop > self.start {
            (self.stop - self.start + self.step - 1) / self.step
        } else {
            0
        }
    }

    /// Offset of index `i`, if on the axis.
    fn at(&self, i: u64) -> Option<u64> {
        (i < self.count()).then(|| self.start + i * self.step)
    }

    /// Offset of the last index. Callers ensure the axis is non-empty.
    fn last_offset(&self) -> u64 {
        self.start + (self.count() - 1) * self.step
    }
}

/// A multi-axis address range: the direct sum of per-axis offsets.
///
/// Describes a register array addressed by one or more indices (per-core,
/// per-channel, ...) as a single flat footprint, with forward
/// index-to-address and reverse address-to-index lookup.
#[derive(Debug, Clone)]
pub struct NdRange {
    axes: Vec<Axis>,
    start: u64,
    stop: u64,
    rev: BTreeMap<u64, Vec<u32>>,
}

impl NdRange {
    /// Build a range from axes, with `min_step` the element size in
    /// bytes.
    ///
    /// Unit-stride axes are normalized to `min_step`; an explicit stride
    /// below `min_step` (or a zero stride, or an empty axis) is a
    /// declaration error.
    pub fn new(axes: impl IntoIterator<Item = Axis>, min_step: u64) -> Result<Self, Error> {
        let mut axes: Vec<Axis> = axes.into_iter().collect();
        let invalid = |detail: String| Error::InvalidFieldSpec {
            name: "NdRange".into(),
            detail,
        };
        if min_step == 0 {
            return Err(invalid("element size must be non-zero".into()));
        }
        if axes.is_empty() {
            return Err(invalid("at least one axis required".into()));
        }
        let mut least = u64::MAX;
        for axis in &mut axes {
            if axis.step == 0 {
                return Err(invalid("axis stride must be non-zero".into()));
            }
            if axis.count() == 0 {
                return Err(invalid(format!(
                    "axis {:#x}..{:#x} covers no indices",
                    axis.start, axis.stop
                )));
            }
            if axis.step == 1 {
                axis.step = min_step;
            } else if axis.step < min_step {
                return Err(invalid(format!(
                    "axis stride {} below element size {min_step}",
                    axis.step
                )));
            }
            least = least.min(axis.step);
        }
        let start = axes.iter().map(|a| a.start).sum();
        let stop = axes.iter().map(Axis::last_offset).sum::<u64>() + least;

        // Reverse table over the cartesian product of all axes. Colliding
        // sums keep the last index tuple in product order.
        let counts: Vec<u64> = axes.iter().map(Axis::count).collect();
        let mut rev = BTreeMap::new();
        let mut index = vec![0u64; axes.len()];
        'product: loop {
            let addr = index
                .iter()
                .zip(&axes)
                .map(|(&i, axis)| axis.start + i * axis.step)
                .sum();
            rev.insert(addr, index.iter().map(|&i| i as u32).collect());
            let mut at = axes.len();
            loop {
                if at == 0 {
                    break 'product;
                }
                at -= 1;
                index[at] += 1;
                if index[at] < counts[at] {
                    break;
                }
                index[at] = 0;
            }
        }

        Ok(Self {
            axes,
            start,
            stop,
            rev,
        })
    }

    /// First covered address.
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    /// First address past the footprint.
    #[must_use]
    pub const fn stop(&self) -> u64 {
        self.stop
    }

    /// The footprint as a zone.
    #[must_use]
    pub fn zone(&self) -> Zone {
        Zone::new(self.start, self.stop)
    }

    /// Declared axes, strides normalized.
    #[must_use]
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Number of axes.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.axes.len()
    }

    /// Number of distinct element addresses.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.rev.len()
    }

    /// Whether `addr` is exactly one of the element addresses.
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        self.rev.contains_key(&addr)
    }

    /// Reverse-map an element address to its index tuple.
    #[must_use]
    pub fn index(&self, addr: u64) -> Option<&[u32]> {
        self.rev.get(&addr).map(Vec::as_slice)
    }

    /// Forward-map an index tuple to its address.
    ///
    /// `None` on rank mismatch or an out-of-bounds index; indices are
    /// never clamped.
    #[must_use]
    pub fn offset(&self, index: &[usize]) -> Option<u64> {
        if index.len() != self.axes.len() {
            return None;
        }
        let mut addr = 0u64;
        for (axis, &i) in self.axes.iter().zip(index) {
            addr += axis.at(i as u64)?;
        }
        Some(addr)
    }

    /// Element addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.rev.keys().copied()
    }

    /// Element addresses inside `zone`, with their index tuples.
    pub(crate) fn addresses_in(&self, zone: Zone) -> impl Iterator<Item = (u64, &[u32])> + '_ {
        self.rev
            .range(zone.start..zone.stop)
            .map(|(addr, index)| (*addr, index.as_slice()))
    }
}
