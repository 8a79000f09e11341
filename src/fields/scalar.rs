//! # Scalar Fields
//!
//! Unit, booleans, options, fixed-width numbers and compact integers.
//!
//! ## Wire Format
//! ```text
//! unit      (nothing)
//! bool      1 byte: 0 = false, 1 = true (decode treats any nonzero as true)
//! option    0x00                  absent
//!           0x01 <inner>          present
//! number    little-endian, fixed width
//! compact   <253                  one byte
//!           0xFD <u16>            253 ..= 0xFFFF
//!           0xFE <u32>            0x1_0000 ..= 0xFFFF_FFFF
//!           0xFF <u64>            0x1_0000_0000 ..
//! ```
//!
//! Compact integers are decoded strictly: a value that could have used a
//! shorter form is rejected as non-canonical, and values above
//! [`MAX_COMPACT`] are rejected as too large.

use crate::core::numeric::{Numeric, NumericType};
use crate::core::wide::{I256, U256};
use crate::core::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::fields::dynamic::DynField;
use crate::fields::Field;
use std::marker::PhantomData;
use tracing::trace;

/// Largest value a compact integer may carry.
pub const MAX_COMPACT: u64 = 0x0200_0000;

const COMPACT_U16: u8 = 253;
const COMPACT_U32: u8 = 254;
const COMPACT_U64: u8 = 255;

/// Zero-byte field for `()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitField;

impl Field for UnitField {
    type Value = ();

    fn encode(&self, _writer: &mut Writer, _value: &()) -> Result<()> {
        Ok(())
    }

    fn decode(&self, _reader: &mut Reader<'_>) -> Result<()> {
        Ok(())
    }
}

pub fn unit() -> UnitField {
    UnitField
}

/// One-byte boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolField;

impl Field for BoolField {
    type Value = bool;

    fn encode(&self, writer: &mut Writer, value: &bool) -> Result<()> {
        writer.write_u8(u8::from(*value));
        Ok(())
    }

    /// Any nonzero byte decodes as `true`.
    fn decode(&self, reader: &mut Reader<'_>) -> Result<bool> {
        Ok(reader.read_u8()? != 0)
    }
}

pub fn bool() -> BoolField {
    BoolField
}

/// Optional value behind a 0/1 presence tag.
#[derive(Debug, Clone)]
pub struct OptionField<F> {
    inner: F,
}

impl<F: Field> Field for OptionField<F> {
    type Value = Option<F::Value>;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        match value {
            None => {
                writer.write_u8(0);
                Ok(())
            }
            Some(inner) => {
                writer.write_u8(1);
                self.inner.encode(writer, inner)
            }
        }
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => self.inner.decode(reader).map(Some),
            tag => Err(CodecError::InvalidOption(tag)),
        }
    }
}

pub fn option<F: Field>(inner: F) -> OptionField<F> {
    OptionField { inner }
}

/// Fixed-width little-endian number.
pub struct NumberField<N> {
    _marker: PhantomData<fn() -> N>,
}

impl<N: Numeric> NumberField<N> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    pub const fn numeric_type(&self) -> NumericType {
        N::TYPE
    }
}

impl<N: Numeric> Default for NumberField<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for NumberField<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NumberField<N> {}

impl<N: Numeric> std::fmt::Debug for NumberField<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NumberField<{}>", N::TYPE)
    }
}

impl<N: Numeric> Field for NumberField<N> {
    type Value = N;

    fn encode(&self, writer: &mut Writer, value: &N) -> Result<()> {
        writer.write_number(*value);
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<N> {
        reader.read_number::<N>()
    }
}

macro_rules! number_constructors {
    ($($name:ident => $ty:ty;)*) => {
        $(
            #[doc = concat!("Little-endian `", stringify!($name), "`.")]
            pub const fn $name() -> NumberField<$ty> {
                NumberField::new()
            }
        )*
    };
}

number_constructors! {
    u8 => u8;
    u16 => u16;
    u32 => u32;
    u64 => u64;
    u128 => u128;
    u256 => U256;
    i8 => i8;
    i16 => i16;
    i32 => i32;
    i64 => i64;
    i128 => i128;
    i256 => I256;
    f32 => f32;
    f64 => f64;
}

/// Dynamic number field for a wire type tag.
pub fn numeric(ty: NumericType) -> DynField {
    match ty {
        NumericType::U8 => DynField::new(u8()),
        NumericType::U16 => DynField::new(u16()),
        NumericType::U32 => DynField::new(u32()),
        NumericType::U64 => DynField::new(u64()),
        NumericType::U128 => DynField::new(u128()),
        NumericType::U256 => DynField::new(u256()),
        NumericType::I8 => DynField::new(i8()),
        NumericType::I16 => DynField::new(i16()),
        NumericType::I32 => DynField::new(i32()),
        NumericType::I64 => DynField::new(i64()),
        NumericType::I128 => DynField::new(i128()),
        NumericType::I256 => DynField::new(i256()),
        NumericType::F32 => DynField::new(f32()),
        NumericType::F64 => DynField::new(f64()),
    }
}

/// Unsigned integer field selected by byte width.
///
/// # Errors
/// Returns `CodecError::NotImplemented` for widths other than 1, 2, 4, 8, 16 or 32.
pub fn unsigned(bytes: usize) -> Result<DynField> {
    NumericType::unsigned(bytes).map(numeric)
}

/// Signed integer field selected by byte width.
///
/// # Errors
/// Returns `CodecError::NotImplemented` for widths other than 1, 2, 4, 8, 16 or 32.
pub fn signed(bytes: usize) -> Result<DynField> {
    NumericType::signed(bytes).map(numeric)
}

/// Float field selected by byte width.
///
/// # Errors
/// Returns `CodecError::NotImplemented` for widths other than 4 or 8.
pub fn float(bytes: usize) -> Result<DynField> {
    NumericType::float(bytes).map(numeric)
}

/// CompactSize variable-length integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactField;

impl Field for CompactField {
    type Value = u64;

    /// Always writes the shortest form.
    fn encode(&self, writer: &mut Writer, value: &u64) -> Result<()> {
        let value = *value;
        if value > MAX_COMPACT {
            return Err(CodecError::TooLarge(value));
        }
        if value < u64::from(COMPACT_U16) {
            writer.write_u8(value as u8);
        } else if value <= u64::from(u16::MAX) {
            writer.write_u8(COMPACT_U16);
            writer.write_number(value as u16);
        } else if value <= u64::from(u32::MAX) {
            writer.write_u8(COMPACT_U32);
            writer.write_number(value as u32);
        } else {
            writer.write_u8(COMPACT_U64);
            writer.write_number(value);
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<u64> {
        let flag = reader.read_u8()?;
        let (value, minimum) = match flag {
            COMPACT_U16 => (u64::from(reader.read_number::<u16>()?), 253),
            COMPACT_U32 => (u64::from(reader.read_number::<u32>()?), 0x1_0000),
            COMPACT_U64 => (reader.read_number::<u64>()?, 0x1_0000_0000),
            small => (u64::from(small), 0),
        };
        if value < minimum {
            trace!(flag, value, "rejecting non-canonical compact integer");
            return Err(CodecError::NonCanonical { flag, value });
        }
        if value > MAX_COMPACT {
            return Err(CodecError::TooLarge(value));
        }
        Ok(value)
    }
}

pub fn compact() -> CompactField {
    CompactField
}
