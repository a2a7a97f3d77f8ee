// Author: Lukas Bower
// Purpose: Define the error taxonomy shared by the range-map and register layers.

//! Errors surfaced by range maps, register declarations, and backends.

use thiserror::Error;

/// Failures produced by the mapping and register-access layers.
///
/// Every variant propagates to the immediate caller; nothing here is
/// retried or logged internally.
#[derive(Debug, Error)]
pub enum Error {
    /// Address is not covered by any stored interval.
    ///
    /// Read paths report misses as `None`; only strict accessors such as
    /// [`ScalarRangeMap::at`](crate::ScalarRangeMap::at) raise this.
    #[error("address {addr:#x} has no mapped value")]
    LookupMiss {
        /// Address that missed.
        addr: u64,
    },
    /// A register, field, or array declaration is malformed.
    ///
    /// Raised at declaration time by the layout builders, never deferred
    /// to first use.
    #[error("invalid declaration for {name}: {detail}")]
    InvalidFieldSpec {
        /// Name of the register or field being declared.
        name: String,
        /// What was wrong with the declaration.
        detail: String,
    },
    /// An array-register index fell outside its declared range.
    #[error("index {index:?} out of range for register array {name}")]
    IndexOutOfRange {
        /// Register array name.
        name: String,
        /// Offending index tuple.
        index: Vec<usize>,
    },
    /// A register name is not declared in the map, or is declared with a
    /// different shape (scalar vs array) than the accessor asked for.
    #[error("no register named {name}")]
    UnknownRegister {
        /// Requested register name.
        name: String,
    },
    /// The memory backend failed a read or write.
    ///
    /// The underlying failure is preserved as the error source and
    /// propagates unchanged through the register layer.
    #[error("backend fault at {addr:#x}")]
    Backend {
        /// Address of the failed access.
        addr: u64,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wrap an opaque backend failure observed at `addr`.
    pub fn backend(
        addr: u64,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Backend {
            addr,
            source: source.into(),
        }
    }
}
