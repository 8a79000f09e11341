//! # Field Codecs
//!
//! A [`Field`] is an encode/decode pair bound to one Rust type. Fields are
//! built once, never change afterwards and keep no state between calls; all
//! mutable state lives in the [`Writer`] or [`Reader`] the caller passes in.
//! That makes a field tree safe to share read-only across threads.
//!
//! Fields compose: collection fields own their element fields, struct and
//! enum fields own their named sub-fields.
//!
//! ## Combinators
//! - **Scalars**: [`unit`], [`bool`], [`option`], [`u8`] .. [`u256`],
//!   [`i8`] .. [`i256`], [`f32`], [`f64`], [`compact`]
//! - **Text**: [`string`], [`utf16_string`]
//! - **Collections**: [`array`], [`vec`], [`set`], [`map`]
//! - **Composites**: [`StructField::builder`], [`VariantsField::builder`]
//! - **Width-selected**: [`unsigned`], [`signed`], [`float`], [`numeric`]
//!
//! ## Example
//! ```rust
//! use schema_codec::fields::{string, u32, vec, StructField};
//! use schema_codec::Value;
//!
//! let person = StructField::builder()
//!     .field("name", string())
//!     .field("scores", vec(u32()))
//!     .build()
//!     .unwrap();
//!
//! let value = Value::record([
//!     ("name", Value::from("ada")),
//!     ("scores", Value::Seq(vec![Value::U32(7)])),
//! ]);
//! let bytes = schema_codec::encode(&person, &value).unwrap();
//! assert_eq!(schema_codec::decode(&person, &bytes).unwrap(), value);
//! ```

pub mod collection;
pub mod composite;
pub mod dynamic;
pub mod scalar;
pub mod string;

use crate::core::{Reader, Writer};
use crate::error::Result;
use std::sync::Arc;

pub use collection::{array, map, set, vec, ArrayField, MapField, SetField, VecField};
pub use composite::{StructBuilder, StructField, VariantsBuilder, VariantsField};
pub use dynamic::DynField;
pub use scalar::{
    bool, compact, f32, f64, float, i128, i16, i256, i32, i64, i8, numeric, option, signed, u128,
    u16, u256, u32, u64, u8, unit, unsigned, BoolField, CompactField, NumberField, OptionField,
    UnitField, MAX_COMPACT,
};
pub use string::{string, utf16_string, StringField, Utf16Field};

/// An encode/decode pair for values of type [`Field::Value`].
pub trait Field: Send + Sync {
    type Value;

    /// Append the encoding of `value` to `writer`.
    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()>;

    /// Read one value from `reader`.
    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value>;
}

impl<F: Field + ?Sized> Field for &F {
    type Value = F::Value;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        (**self).encode(writer, value)
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        (**self).decode(reader)
    }
}

impl<F: Field + ?Sized> Field for Box<F> {
    type Value = F::Value;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        (**self).encode(writer, value)
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        (**self).decode(reader)
    }
}

impl<F: Field + ?Sized> Field for Arc<F> {
    type Value = F::Value;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        (**self).encode(writer, value)
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        (**self).decode(reader)
    }
}
