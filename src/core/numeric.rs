//! # Numeric Types
//!
//! Tags for the fixed-width numbers the wire format knows about, and the
//! [`Numeric`] trait that ties each tag to its Rust representation.
//!
//! | Tag | Width | Rust type |
//! |---|---|---|
//! | `u8` .. `u128` | 1, 2, 4, 8, 16 | `u8` .. `u128` |
//! | `u256` | 32 | [`U256`] |
//! | `i8` .. `i128` | 1, 2, 4, 8, 16 | `i8` .. `i128` |
//! | `i256` | 32 | [`I256`] |
//! | `f32`, `f64` | 4, 8 | `f32`, `f64` |
//!
//! All numbers are little-endian on the wire.

use crate::core::wide::{I256, U256};
use crate::error::{CodecError, Result};
use bytes::{Buf, BufMut, BytesMut};
use std::fmt;
use std::str::FromStr;

/// Wire-level numeric type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericType {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    I8,
    I16,
    I32,
    I64,
    I128,
    I256,
    F32,
    F64,
}

impl NumericType {
    /// Every tag, unsigned first, then signed, then floats.
    pub const ALL: [NumericType; 14] = [
        NumericType::U8,
        NumericType::U16,
        NumericType::U32,
        NumericType::U64,
        NumericType::U128,
        NumericType::U256,
        NumericType::I8,
        NumericType::I16,
        NumericType::I32,
        NumericType::I64,
        NumericType::I128,
        NumericType::I256,
        NumericType::F32,
        NumericType::F64,
    ];

    /// Byte width on the wire.
    pub const fn width(self) -> usize {
        match self {
            NumericType::U8 | NumericType::I8 => 1,
            NumericType::U16 | NumericType::I16 => 2,
            NumericType::U32 | NumericType::I32 | NumericType::F32 => 4,
            NumericType::U64 | NumericType::I64 | NumericType::F64 => 8,
            NumericType::U128 | NumericType::I128 => 16,
            NumericType::U256 | NumericType::I256 => 32,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            NumericType::I8
                | NumericType::I16
                | NumericType::I32
                | NumericType::I64
                | NumericType::I128
                | NumericType::I256
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, NumericType::F32 | NumericType::F64)
    }

    /// Unsigned integer tag for a byte width.
    ///
    /// # Errors
    /// Returns `CodecError::NotImplemented` for widths other than 1, 2, 4, 8, 16 or 32.
    pub fn unsigned(bytes: usize) -> Result<Self> {
        match bytes {
            1 => Ok(NumericType::U8),
            2 => Ok(NumericType::U16),
            4 => Ok(NumericType::U32),
            8 => Ok(NumericType::U64),
            16 => Ok(NumericType::U128),
            32 => Ok(NumericType::U256),
            other => Err(CodecError::NotImplemented(format!(
                "unsigned integer of {other} bytes"
            ))),
        }
    }

    /// Signed integer tag for a byte width.
    ///
    /// # Errors
    /// Returns `CodecError::NotImplemented` for widths other than 1, 2, 4, 8, 16 or 32.
    pub fn signed(bytes: usize) -> Result<Self> {
        match bytes {
            1 => Ok(NumericType::I8),
            2 => Ok(NumericType::I16),
            4 => Ok(NumericType::I32),
            8 => Ok(NumericType::I64),
            16 => Ok(NumericType::I128),
            32 => Ok(NumericType::I256),
            other => Err(CodecError::NotImplemented(format!(
                "signed integer of {other} bytes"
            ))),
        }
    }

    /// Float tag for a byte width.
    ///
    /// # Errors
    /// Returns `CodecError::NotImplemented` for widths other than 4 or 8.
    pub fn float(bytes: usize) -> Result<Self> {
        match bytes {
            4 => Ok(NumericType::F32),
            8 => Ok(NumericType::F64),
            other => Err(CodecError::NotImplemented(format!(
                "float of {other} bytes"
            ))),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            NumericType::U8 => "u8",
            NumericType::U16 => "u16",
            NumericType::U32 => "u32",
            NumericType::U64 => "u64",
            NumericType::U128 => "u128",
            NumericType::U256 => "u256",
            NumericType::I8 => "i8",
            NumericType::I16 => "i16",
            NumericType::I32 => "i32",
            NumericType::I64 => "i64",
            NumericType::I128 => "i128",
            NumericType::I256 => "i256",
            NumericType::F32 => "f32",
            NumericType::F64 => "f64",
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        NumericType::ALL
            .iter()
            .copied()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| CodecError::NotImplemented(format!("numeric type '{s}'")))
    }
}

/// A Rust number with a fixed little-endian wire representation.
///
/// `read_le` is only called after the caller has checked that at least
/// `Self::TYPE.width()` bytes remain.
pub trait Numeric: Copy + Send + Sync + fmt::Debug + 'static {
    const TYPE: NumericType;

    fn write_le(self, buf: &mut BytesMut);

    fn read_le(src: &mut &[u8]) -> Self;
}

macro_rules! impl_numeric {
    ($($ty:ty => $tag:ident, $put:ident, $get:ident;)*) => {
        $(
            impl Numeric for $ty {
                const TYPE: NumericType = NumericType::$tag;

                #[inline]
                fn write_le(self, buf: &mut BytesMut) {
                    buf.$put(self);
                }

                #[inline]
                fn read_le(src: &mut &[u8]) -> Self {
                    src.$get()
                }
            }
        )*
    };
}

impl_numeric! {
    u8 => U8, put_u8, get_u8;
    u16 => U16, put_u16_le, get_u16_le;
    u32 => U32, put_u32_le, get_u32_le;
    u64 => U64, put_u64_le, get_u64_le;
    u128 => U128, put_u128_le, get_u128_le;
    i8 => I8, put_i8, get_i8;
    i16 => I16, put_i16_le, get_i16_le;
    i32 => I32, put_i32_le, get_i32_le;
    i64 => I64, put_i64_le, get_i64_le;
    i128 => I128, put_i128_le, get_i128_le;
    f32 => F32, put_f32_le, get_f32_le;
    f64 => F64, put_f64_le, get_f64_le;
}

impl Numeric for U256 {
    const TYPE: NumericType = NumericType::U256;

    fn write_le(self, buf: &mut BytesMut) {
        let mut bytes = [0u8; 32];
        self.to_little_endian(&mut bytes);
        buf.put_slice(&bytes);
    }

    fn read_le(src: &mut &[u8]) -> Self {
        let value = U256::from_little_endian(&src[..32]);
        src.advance(32);
        value
    }
}

impl Numeric for I256 {
    const TYPE: NumericType = NumericType::I256;

    fn write_le(self, buf: &mut BytesMut) {
        buf.put_slice(&self.to_le_bytes());
    }

    fn read_le(src: &mut &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        src.copy_to_slice(&mut bytes);
        I256::from_le_bytes(bytes)
    }
}
