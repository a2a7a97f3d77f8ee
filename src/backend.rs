// Author: Lukas Bower
// Purpose: Define the raw memory backend boundary and reference implementations.

//! Memory backends: width-qualified read/write over a byte-addressed
//! space.

use core::cell::RefCell;

use log::trace;

use crate::error::Error;
use crate::reg::Width;

/// Byte-addressed memory exposing width-qualified reads and writes.
///
/// An implementation blocks the calling thread for the duration of one
/// access and serializes concurrent use itself; the register layer adds
/// no locking and never retries a failed access. Failures surface as
/// [`Error::Backend`] and propagate unchanged.
pub trait MemBackend {
    /// Read an integer of the given width from `addr`.
    fn read(&self, addr: u64, width: Width) -> Result<u64, Error>;

    /// Write an integer of the given width to `addr`.
    fn write(&self, addr: u64, width: Width, value: u64) -> Result<(), Error>;
}

/// Access outside the backing buffer.
#[derive(Debug, thiserror::Error)]
#[error("access at {addr:#x} outside backing ram of {len:#x} bytes")]
struct OutOfRam {
    addr: u64,
    len: usize,
}

/// Little-endian RAM-backed reference backend for tests and dry runs.
///
/// Accesses are bounds-checked but alignment-agnostic, matching the
/// behavior of a debug proxy that forwards arbitrary byte offsets.
#[derive(Debug)]
pub struct RamBackend {
    bytes: RefCell<Vec<u8>>,
}

impl RamBackend {
    /// Backend over `size` zeroed bytes.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self::with_contents(vec![0; size])
    }

    /// Backend seeded with the given contents.
    #[must_use]
    pub fn with_contents(bytes: Vec<u8>) -> Self {
        Self {
            bytes: RefCell::new(bytes),
        }
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }

    fn span(&self, addr: u64, width: Width) -> Result<(usize, usize), Error> {
        let len = self.bytes.borrow().len();
        let oob = || Error::backend(addr, OutOfRam { addr, len });
        let start = usize::try_from(addr).map_err(|_| oob())?;
        let end = start
            .checked_add(width.bytes() as usize)
            .filter(|&end| end <= len)
            .ok_or_else(oob)?;
        Ok((start, end))
    }
}

impl MemBackend for RamBackend {
    fn read(&self, addr: u64, width: Width) -> Result<u64, Error> {
        let (start, end) = self.span(addr, width)?;
        let bytes = self.bytes.borrow();
        let mut value = 0u64;
        for (at, byte) in bytes[start..end].iter().enumerate() {
            value |= u64::from(*byte) << (8 * at);
        }
        Ok(value)
    }

    fn write(&self, addr: u64, width: Width, value: u64) -> Result<(), Error> {
        let (start, end) = self.span(addr, width)?;
        let mut bytes = self.bytes.borrow_mut();
        for (at, slot) in bytes[start..end].iter_mut().enumerate() {
            *slot = (value >> (8 * at)) as u8;
        }
        Ok(())
    }
}

/// Backend wrapper that logs every access through the `log` facade.
///
/// Useful when replaying register traffic against a live target: each
/// read and write becomes one `trace!` line tagged with the wrapped
/// device name.
#[derive(Debug)]
pub struct TracedBackend<B> {
    tag: String,
    inner: B,
}

impl<B> TracedBackend<B> {
    /// Wrap `inner`, tagging each log line with `tag`.
    pub fn new(tag: impl Into<String>, inner: B) -> Self {
        Self {
            tag: tag.into(),
            inner,
        }
    }

    /// Shared view of the wrapped backend.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Unwrap the backend.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B: MemBackend> MemBackend for TracedBackend<B> {
    fn read(&self, addr: u64, width: Width) -> Result<u64, Error> {
        let value = self.inner.read(addr, width)?;
        trace!("{}: R{} {addr:#x} = {value:#x}", self.tag, width.bits());
        Ok(value)
    }

    fn write(&self, addr: u64, width: Width, value: u64) -> Result<(), Error> {
        trace!("{}: W{} {addr:#x} <- {value:#x}", self.tag, width.bits());
        self.inner.write(addr, width, value)
    }
}
