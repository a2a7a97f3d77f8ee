// Author: Lukas Bower
// Purpose: Provide address-range containers and typed register access for SoC debug tooling.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Address-range bookkeeping and typed register access for SoC debug
//! tooling.
//!
//! The crate has two layers with a strict dependency order. The interval
//! engine ([`RangeMap`] and its flavors) attaches arbitrary metadata to
//! possibly-overlapping address ranges with automatic split and merge
//! semantics. The register layer ([`RegisterLayout`], [`RegMapLayout`])
//! turns named bit-fields and repeated register arrays into typed
//! accessors over a caller-supplied [`MemBackend`].

mod backend;
mod error;
mod hexdump;
mod range;
mod reg;
mod zone;

pub use backend::{MemBackend, RamBackend, TracedBackend};
pub use error::Error;
pub use hexdump::{hexdump, hexdump_into};
pub use range::{AddrLookup, BoolRangeMap, DictRangeMap, RangeMap, ScalarRangeMap, SetRangeMap};
pub use reg::{
    Axis, FieldSpec, NdRange, RegAccessor, RegArrayAccessor, RegEntry, RegMap, RegMapBuilder,
    RegMapLayout, RegValue, RegisterLayout, RegisterLayoutBuilder, Width,
};
pub use zone::{align_down, align_up, Zone};
