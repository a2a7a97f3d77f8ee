// Author: Lukas Bower
// Purpose: Declare named bit-fields over fixed-width register values.

//! Register field declarations and layout-bound values.

use core::fmt;

use crate::error::Error;
use crate::reg::Width;

/// Bit placement of a named field inside a fixed-width register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldSpec {
    /// A single bit at the given position.
    Bit(u8),
    /// An inclusive `msb:lsb` bit range.
    Bits {
        /// Most significant bit, inclusive.
        msb: u8,
        /// Least significant bit, inclusive.
        lsb: u8,
    },
}

impl FieldSpec {
    /// Number of bits the field occupies.
    #[must_use]
    pub const fn width(self) -> u32 {
        match self {
            FieldSpec::Bit(_) => 1,
            FieldSpec::Bits { msb, lsb } => (msb - lsb + 1) as u32,
        }
    }

    const fn lsb(self) -> u32 {
        match self {
            FieldSpec::Bit(bit) => bit as u32,
            FieldSpec::Bits { lsb, .. } => lsb as u32,
        }
    }

    const fn value_mask(self) -> u64 {
        if self.width() >= 64 {
            u64::MAX
        } else {
            (1 << self.width()) - 1
        }
    }

    /// Extract the field from a raw register value.
    #[must_use]
    pub const fn extract(self, raw: u64) -> u64 {
        (raw >> self.lsb()) & self.value_mask()
    }

    /// Merge `value` into the field, leaving other bits untouched.
    #[must_use]
    pub const fn insert(self, raw: u64, value: u64) -> u64 {
        let mask = self.value_mask();
        (raw & !(mask << self.lsb())) | ((value & mask) << self.lsb())
    }
}

/// One declared field: name, placement, and an optional display adapter
/// applied when rendering the field (never on the raw access path).
#[derive(Debug, Clone)]
struct FieldDef {
    name: String,
    spec: FieldSpec,
    decode: Option<fn(u64) -> String>,
}

/// Builder assembling an immutable [`RegisterLayout`] field table.
///
/// Every declaration is validated by [`RegisterLayoutBuilder::build`];
/// malformed bit specs surface as [`Error::InvalidFieldSpec`] at
/// declaration time, never at first use.
#[derive(Debug)]
pub struct RegisterLayoutBuilder {
    name: String,
    width: Width,
    fields: Vec<FieldDef>,
}

impl RegisterLayoutBuilder {
    /// Declare a single-bit field.
    #[must_use]
    pub fn bit(self, name: impl Into<String>, bit: u8) -> Self {
        self.field(name, FieldSpec::Bit(bit))
    }

    /// Declare an inclusive `msb:lsb` field.
    #[must_use]
    pub fn bits(self, name: impl Into<String>, msb: u8, lsb: u8) -> Self {
        self.field(name, FieldSpec::Bits { msb, lsb })
    }

    /// Declare a field with an explicit spec.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            spec,
            decode: None,
        });
        self
    }

    /// Attach a display adapter to the most recently declared field.
    #[must_use]
    pub fn decode(mut self, decode: fn(u64) -> String) -> Self {
        if let Some(last) = self.fields.last_mut() {
            last.decode = Some(decode);
        }
        self
    }

    /// Validate every declaration and freeze the field table.
    pub fn build(self) -> Result<RegisterLayout, Error> {
        let bits = self.width.bits();
        for (at, field) in self.fields.iter().enumerate() {
            let invalid = |detail: String| Error::InvalidFieldSpec {
                name: format!("{}.{}", self.name, field.name),
                detail,
            };
            match field.spec {
                FieldSpec::Bit(bit) if u32::from(bit) >= bits => {
                    return Err(invalid(format!("bit {bit} outside a {bits}-bit register")));
                }
                FieldSpec::Bits { msb, lsb } if lsb > msb => {
                    return Err(invalid(format!("lsb {lsb} above msb {msb}")));
                }
                FieldSpec::Bits { msb, .. } if u32::from(msb) >= bits => {
                    return Err(invalid(format!("msb {msb} outside a {bits}-bit register")));
                }
                _ => {}
            }
            if self.fields[..at].iter().any(|f| f.name == field.name) {
                return Err(invalid("duplicate field name".into()));
            }
        }
        Ok(RegisterLayout {
            name: self.name,
            width: self.width,
            fields: self.fields,
        })
    }
}

/// Immutable named-field table for one fixed-width register type.
#[derive(Debug, Clone)]
pub struct RegisterLayout {
    name: String,
    width: Width,
    fields: Vec<FieldDef>,
}

impl RegisterLayout {
    /// Begin declaring a register layout.
    #[must_use]
    pub fn builder(name: impl Into<String>, width: Width) -> RegisterLayoutBuilder {
        RegisterLayoutBuilder {
            name: name.into(),
            width,
            fields: Vec::new(),
        }
    }

    /// Register type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access width of the register.
    #[must_use]
    pub fn width(&self) -> Width {
        self.width
    }

    /// Declared field names, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Spec of a declared field.
    #[must_use]
    pub fn field_spec(&self, name: &str) -> Option<FieldSpec> {
        self.field(name).map(|f| f.spec)
    }

    fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Bind a raw value to this layout, masked to the register width.
    #[must_use]
    pub fn decode(&self, raw: u64) -> RegValue<'_> {
        RegValue {
            layout: self,
            raw: raw & self.width.mask(),
        }
    }
}

/// A register value bound to its layout for typed field access.
#[derive(Debug, Clone, Copy)]
pub struct RegValue<'l> {
    layout: &'l RegisterLayout,
    raw: u64,
}

impl<'l> RegValue<'l> {
    /// Raw integer value.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.raw
    }

    /// Layout this value is bound to.
    #[must_use]
    pub fn layout(&self) -> &'l RegisterLayout {
        self.layout
    }

    /// Extract a declared field.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not declared on this layout; accessing an
    /// undeclared field is a programming error, not a runtime condition.
    #[must_use]
    pub fn field(&self, name: &str) -> u64 {
        self.expect_field(name).spec.extract(self.raw)
    }

    /// Merge `value` into a declared field, leaving other bits untouched.
    /// Single-bit fields keep only the lowest bit of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not declared on this layout.
    pub fn set_field(&mut self, name: &str, value: u64) -> &mut Self {
        let spec = self.expect_field(name).spec;
        self.raw = spec.insert(self.raw, value);
        self
    }

    fn expect_field(&self, name: &str) -> &'l FieldDef {
        match self.layout.field(name) {
            Some(field) => field,
            None => panic!("register {} has no field {name}", self.layout.name),
        }
    }
}

impl fmt::Display for RegValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x} (", self.raw)?;
        for (at, field) in self.layout.fields.iter().enumerate() {
            if at > 0 {
                write!(f, ", ")?;
            }
            let value = field.spec.extract(self.raw);
            write!(f, "{}=", field.name)?;
            match field.decode {
                Some(decode) => f.write_str(&decode(value))?,
                None if field.spec.width() > 3 => write!(f, "{value:#x}")?,
                None => write!(f, "{value}")?,
            }
        }
        write!(f, ")")
    }
}
