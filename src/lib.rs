//! # Schema Codec
//!
//! Schema-driven binary serialization in the Borsh style: little-endian
//! fixed-width numbers, `u32` length prefixes, one-byte option and enum
//! tags, and no self-description on the wire. Both sides must agree on the
//! schema.
//!
//! Encoding is canonical. Sets and maps are written in ascending order,
//! compact integers in their shortest form, and a top-level decode rejects
//! trailing bytes, so one value has exactly one encoding.
//!
//! ## Layers
//! - [`core`]: [`Writer`](core::Writer) and [`Reader`](core::Reader) buffers
//! - [`fields`]: typed, composable field codecs
//! - [`value`]: the dynamic [`Value`] tree used by schema-built fields
//! - [`schema`]: JSON schema descriptions, validation and field building
//! - [`json`]: schema-guided JSON conversion
//! - [`codec`]: entry points and the configured [`Codec`] facade
//!
//! ## Quick Start
//! ```rust
//! use schema_codec::fields::{option, string, u64, StructField};
//! use schema_codec::Value;
//!
//! let account = StructField::builder()
//!     .field("id", u64())
//!     .field("nickname", option(string()))
//!     .build()
//!     .unwrap();
//!
//! let value = Value::record([
//!     ("id", Value::U64(42)),
//!     ("nickname", Value::none()),
//! ]);
//! let bytes = schema_codec::encode(&account, &value).unwrap();
//! assert_eq!(bytes, [42, 0, 0, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(schema_codec::decode(&account, &bytes).unwrap(), value);
//! ```

#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod fields;
pub mod json;
pub mod schema;
pub mod utils;
pub mod value;

pub use codec::{decode, decode_with, encode, Codec, DecodeOptions};
pub use config::{CodecConfig, TrailingBytes};
pub use error::{CodecError, PathSegment, Result};
pub use fields::{DynField, Field};
pub use schema::{CompiledSchema, Schema};
pub use value::{Value, ValueType};
