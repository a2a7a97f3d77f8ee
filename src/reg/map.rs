// Author: Lukas Bower
// Purpose: Bind named register declarations to backend-backed accessors.

//! Register map declarations, reverse lookup, and bound accessors.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use log::debug;

use crate::backend::MemBackend;
use crate::error::Error;
use crate::range::SetRangeMap;
use crate::reg::field::{RegValue, RegisterLayout};
use crate::reg::ndrange::{Axis, NdRange};

/// Offset declaration for one named entry.
#[derive(Debug, Clone)]
enum RegOffset {
    Scalar(u64),
    Array(NdRange),
}

/// One named register declaration.
#[derive(Debug, Clone)]
struct RegDecl {
    name: String,
    offset: RegOffset,
    layout: Arc<RegisterLayout>,
}

enum Pending {
    Scalar(u64),
    Array(Vec<Axis>),
}

/// Builder assembling an immutable [`RegMapLayout`].
///
/// Declarations are validated by [`RegMapBuilder::build`]; malformed
/// array axes and duplicate names surface there, never at first use.
#[derive(Default)]
pub struct RegMapBuilder {
    decls: Vec<(String, Pending, Arc<RegisterLayout>)>,
}

impl RegMapBuilder {
    /// Start an empty declaration list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a scalar register at a byte offset from the map base.
    #[must_use]
    pub fn reg(
        mut self,
        name: impl Into<String>,
        offset: u64,
        layout: &Arc<RegisterLayout>,
    ) -> Self {
        self.decls
            .push((name.into(), Pending::Scalar(offset), Arc::clone(layout)));
        self
    }

    /// Declare a register array addressed by one or more axes.
    ///
    /// Unit-stride axes are normalized to the register's byte width when
    /// the map is built.
    #[must_use]
    pub fn array(
        mut self,
        name: impl Into<String>,
        axes: impl IntoIterator<Item = Axis>,
        layout: &Arc<RegisterLayout>,
    ) -> Self {
        self.decls.push((
            name.into(),
            Pending::Array(axes.into_iter().collect()),
            Arc::clone(layout),
        ));
        self
    }

    /// Validate every declaration and freeze the map layout.
    pub fn build(self) -> Result<RegMapLayout, Error> {
        let mut decls: Vec<RegDecl> = Vec::with_capacity(self.decls.len());
        let mut scalars = HashMap::new();
        let mut arrays = SetRangeMap::new();
        let mut names: HashMap<String, usize> = HashMap::new();
        for (name, pending, layout) in self.decls {
            if names.contains_key(&name) {
                return Err(Error::InvalidFieldSpec {
                    name,
                    detail: "duplicate register name".into(),
                });
            }
            let at = decls.len();
            let offset = match pending {
                Pending::Scalar(offset) => {
                    scalars.insert(offset, at);
                    RegOffset::Scalar(offset)
                }
                Pending::Array(axes) => {
                    let nd = NdRange::new(axes, layout.width().bytes()).map_err(|err| {
                        match err {
                            Error::InvalidFieldSpec { detail, .. } => Error::InvalidFieldSpec {
                                name: name.clone(),
                                detail,
                            },
                            other => other,
                        }
                    })?;
                    arrays.add(nd.zone(), at);
                    RegOffset::Array(nd)
                }
            };
            names.insert(name.clone(), at);
            decls.push(RegDecl {
                name,
                offset,
                layout,
            });
        }
        Ok(RegMapLayout {
            decls,
            scalars,
            arrays,
            names,
        })
    }
}

/// Immutable register-map declaration table.
///
/// Scalar registers live in a direct offset table; arrays are registered
/// into an address-keyed set map so any address inside an array footprint
/// reverse-maps to its logical name and index in one query.
#[derive(Debug)]
pub struct RegMapLayout {
    decls: Vec<RegDecl>,
    scalars: HashMap<u64, usize>,
    arrays: SetRangeMap<usize>,
    names: HashMap<String, usize>,
}

/// One declared register address, produced by [`RegMapLayout::entries`].
pub struct RegEntry<'a> {
    /// Byte offset from the map base.
    pub offset: u64,
    /// Declared register name.
    pub name: &'a str,
    /// Index tuple for array entries, `None` for scalars.
    pub index: Option<&'a [u32]>,
    /// Layout of the register at this address.
    pub layout: &'a Arc<RegisterLayout>,
    decl: usize,
}

impl RegMapLayout {
    /// Begin declaring a register map.
    #[must_use]
    pub fn builder() -> RegMapBuilder {
        RegMapBuilder::new()
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether the map declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    fn decl(&self, name: &str) -> Option<&RegDecl> {
        self.names.get(name).map(|&at| &self.decls[at])
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Reverse-map a byte offset to `(name, index, layout)`.
    ///
    /// The scalar table is consulted first; otherwise covering arrays are
    /// tried in declaration order. `None` when no declaration covers the
    /// offset.
    #[must_use]
    pub fn lookup_offset(
        &self,
        offset: u64,
    ) -> Option<(&str, Option<&[u32]>, &Arc<RegisterLayout>)> {
        if let Some(&at) = self.scalars.get(&offset) {
            let decl = &self.decls[at];
            return Some((decl.name.as_str(), None, &decl.layout));
        }
        if let Some(covering) = self.arrays.get(offset) {
            for &at in covering {
                let decl = &self.decls[at];
                if let RegOffset::Array(nd) = &decl.offset {
                    if let Some(index) = nd.index(offset) {
                        return Some((decl.name.as_str(), Some(index), &decl.layout));
                    }
                }
            }
        }
        None
    }

    /// Every declared register address in ascending offset order, scalar
    /// and array namespaces merged; ties go to the earlier declaration.
    pub fn entries(&self) -> impl Iterator<Item = RegEntry<'_>> + '_ {
        let mut rows: Vec<RegEntry<'_>> = Vec::new();
        for (&offset, &at) in &self.scalars {
            let decl = &self.decls[at];
            rows.push(RegEntry {
                offset,
                name: &decl.name,
                index: None,
                layout: &decl.layout,
                decl: at,
            });
        }
        for (zone, covering) in self.arrays.iter() {
            for &at in covering {
                let decl = &self.decls[at];
                if let RegOffset::Array(nd) = &decl.offset {
                    for (offset, index) in nd.addresses_in(zone) {
                        rows.push(RegEntry {
                            offset,
                            name: &decl.name,
                            index: Some(index),
                            layout: &decl.layout,
                            decl: at,
                        });
                    }
                }
            }
        }
        rows.sort_by_key(|row| (row.offset, row.decl));
        rows.into_iter()
    }
}

/// A register map bound to a backend at a base address.
pub struct RegMap<'a, B: ?Sized> {
    layout: &'a RegMapLayout,
    backend: &'a B,
    base: u64,
}

impl<'a, B: MemBackend + ?Sized> RegMap<'a, B> {
    /// Bind `layout` over `backend` at `base`.
    pub fn bind(layout: &'a RegMapLayout, backend: &'a B, base: u64) -> Self {
        debug!(
            "binding register map at {base:#x} ({} declarations)",
            layout.len()
        );
        Self {
            layout,
            backend,
            base,
        }
    }

    /// Base address the map is bound at.
    #[must_use]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Declaration table behind this map.
    #[must_use]
    pub fn layout(&self) -> &'a RegMapLayout {
        self.layout
    }

    /// Accessor for a declared scalar register.
    pub fn reg(&self, name: &str) -> Result<RegAccessor<'a, B>, Error> {
        let decl = self.layout.decl(name).ok_or_else(|| Error::UnknownRegister {
            name: name.into(),
        })?;
        match &decl.offset {
            RegOffset::Scalar(offset) => Ok(RegAccessor {
                backend: self.backend,
                addr: self.base + offset,
                layout: &decl.layout,
            }),
            RegOffset::Array(_) => Err(Error::UnknownRegister { name: name.into() }),
        }
    }

    /// Accessor for a declared register array.
    pub fn array(&self, name: &str) -> Result<RegArrayAccessor<'a, B>, Error> {
        let decl = self.layout.decl(name).ok_or_else(|| Error::UnknownRegister {
            name: name.into(),
        })?;
        match &decl.offset {
            RegOffset::Array(nd) => Ok(RegArrayAccessor {
                backend: self.backend,
                base: self.base,
                name: &decl.name,
                nd,
                layout: &decl.layout,
            }),
            RegOffset::Scalar(_) => Err(Error::UnknownRegister { name: name.into() }),
        }
    }

    /// Reverse-map an absolute address to `(name, index, layout)`.
    #[must_use]
    pub fn lookup_addr(
        &self,
        addr: u64,
    ) -> Option<(&'a str, Option<&'a [u32]>, &'a Arc<RegisterLayout>)> {
        addr.checked_sub(self.base)
            .and_then(|offset| self.layout.lookup_offset(offset))
    }

    /// Logical name covering `addr`, e.g. `PSTATE[2, 1]`.
    #[must_use]
    pub fn name_at(&self, addr: u64) -> Option<String> {
        self.lookup_addr(addr).map(|(name, index, _)| match index {
            Some(index) => format!("{name}{}", format_index(index)),
            None => name.to_string(),
        })
    }

    /// Read every declared register and render an address-ordered
    /// listing, one `base+offset name = value` line per entry.
    pub fn dump(&self) -> Result<String, Error> {
        let mut out = String::new();
        for entry in self.layout.entries() {
            let raw = self
                .backend
                .read(self.base + entry.offset, entry.layout.width())?;
            let value = entry.layout.decode(raw);
            let _ = write!(out, "{:#x}+{:06x} ", self.base, entry.offset);
            match entry.index {
                Some(index) => {
                    let _ = writeln!(out, "{}{} = {value}", entry.name, format_index(index));
                }
                None => {
                    let _ = writeln!(out, "{} = {value}", entry.name);
                }
            }
        }
        Ok(out)
    }
}

fn format_index(index: &[u32]) -> String {
    let parts: Vec<String> = index.iter().map(u32::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Typed accessor bound to one register address.
pub struct RegAccessor<'a, B: ?Sized> {
    backend: &'a B,
    addr: u64,
    layout: &'a Arc<RegisterLayout>,
}

impl<'a, B: MemBackend + ?Sized> RegAccessor<'a, B> {
    /// Absolute address this accessor reads and writes.
    #[must_use]
    pub fn addr(&self) -> u64 {
        self.addr
    }

    /// Layout behind this accessor.
    #[must_use]
    pub fn layout(&self) -> &'a RegisterLayout {
        self.layout
    }

    /// Read the raw register value.
    pub fn read_raw(&self) -> Result<u64, Error> {
        self.backend.read(self.addr, self.layout.width())
    }

    /// Read the register and bind it to its layout.
    pub fn read(&self) -> Result<RegValue<'a>, Error> {
        let layout: &'a RegisterLayout = self.layout;
        Ok(layout.decode(self.read_raw()?))
    }

    /// Write a raw value, masked to the register width.
    pub fn write_raw(&self, value: u64) -> Result<(), Error> {
        self.backend.write(
            self.addr,
            self.layout.width(),
            value & self.layout.width().mask(),
        )
    }

    /// Write a layout-bound value.
    pub fn write(&self, value: &RegValue<'_>) -> Result<(), Error> {
        self.write_raw(value.raw())
    }

    /// Read-modify-write through `apply`.
    pub fn update(&self, apply: impl FnOnce(&mut RegValue<'a>)) -> Result<(), Error> {
        let mut value = self.read()?;
        apply(&mut value);
        self.write(&value)
    }
}

/// Accessor for a register array; indices resolve through its
/// [`NdRange`] before delegating to a scalar accessor.
pub struct RegArrayAccessor<'a, B: ?Sized> {
    backend: &'a B,
    base: u64,
    name: &'a str,
    nd: &'a NdRange,
    layout: &'a Arc<RegisterLayout>,
}

impl<'a, B: MemBackend + ?Sized> RegArrayAccessor<'a, B> {
    /// Accessor for the element at `index`.
    ///
    /// Indices outside the declared range fail with
    /// [`Error::IndexOutOfRange`]; they are never clamped.
    pub fn at(&self, index: &[usize]) -> Result<RegAccessor<'a, B>, Error> {
        let offset = self
            .nd
            .offset(index)
            .ok_or_else(|| Error::IndexOutOfRange {
                name: self.name.to_string(),
                index: index.to_vec(),
            })?;
        Ok(RegAccessor {
            backend: self.backend,
            addr: self.base + offset,
            layout: self.layout,
        })
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nd.element_count()
    }

    /// Whether the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nd.element_count() == 0
    }

    /// The array's address footprint.
    #[must_use]
    pub fn ndrange(&self) -> &'a NdRange {
        self.nd
    }

    /// Element accessors in address order.
    pub fn iter(&self) -> impl Iterator<Item = RegAccessor<'a, B>> + '_ {
        self.nd.addresses().map(move |offset| RegAccessor {
            backend: self.backend,
            addr: self.base + offset,
            layout: self.layout,
        })
    }
}
