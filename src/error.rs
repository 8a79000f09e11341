//! # Error Types
//!
//! Error handling for the codec.
//!
//! Every failure is synchronous and fatal to the single encode or decode call
//! that produced it. Binary data is either well-formed or it is not, so there
//! is no retry or recovery inside the codec.
//!
//! ## Error Categories
//! - **Buffer Errors**: reading past the end of input, trailing bytes
//! - **Scalar Errors**: invalid option tags, non-canonical compact integers
//! - **Shape Errors**: fixed-array length mismatches, enum shape violations
//! - **Schema Errors**: malformed field lists and schema descriptions
//! - **Text Errors**: malformed UTF-8 in string payloads
//!
//! Struct and enum fields annotate the errors of their children with the
//! field (or variant) name, so a failure deep inside a nested value carries
//! the full path to the offending field.
//!
//! ## Example Usage
//! ```rust
//! use schema_codec::error::CodecError;
//! use schema_codec::fields::{u8, StructField};
//!
//! let inner = StructField::builder().field("b", u8()).build().unwrap();
//! let outer = StructField::builder().field("a", inner).build().unwrap();
//!
//! let err = schema_codec::decode(&outer, [0u8; 0]).unwrap_err();
//! assert_eq!(err.path_names(), vec!["a", "b"]);
//! assert!(matches!(err.root(), CodecError::BufferUnderrun { .. }));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Field list errors
    pub const ERR_EMPTY_FIELD_NAME: &str = "field name cannot be empty";
    pub const ERR_EMPTY_VARIANT_NAME: &str = "variant name cannot be empty";
    pub const ERR_TOO_MANY_VARIANTS: &str = "enum cannot declare more than 256 variants";

    /// Variant shape errors
    pub const ERR_VARIANT_NOT_ENUM: &str = "expected an enum value or a record with exactly one key";

    /// Schema description errors
    pub const ERR_UNKNOWN_PRIMITIVE: &str = "unrecognised primitive type name";
    pub const ERR_SINGLE_KEY: &str =
        "expected an object with exactly one of: option, array, enum, set, map, struct";
    pub const ERR_ENUM_ENTRY: &str = "enum entry must be {\"struct\": {<variant>: <schema>}}";
    pub const ERR_ARRAY_TYPE: &str = "array requires a \"type\" entry";
    pub const ERR_ARRAY_LEN: &str = "array \"len\" must be a non-negative integer below 2^32";
    pub const ERR_MAP_ENTRIES: &str = "map requires both \"key\" and \"value\" entries";
    pub const ERR_SCHEMA_SHAPE: &str = "expected a primitive name or a single-key object";
}

/// One step of the path from the root value to a failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSegment {
    /// A named struct field.
    Field(String),
    /// A selected enum variant.
    Variant(String),
}

impl PathSegment {
    /// The bare field or variant name.
    pub fn name(&self) -> &str {
        match self {
            PathSegment::Field(name) | PathSegment::Variant(name) => name,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Variant(name) => write!(f, "/{name}"),
        }
    }
}

/// Renders a path as `a.b/variant.c`.
pub fn format_path(path: &[PathSegment]) -> String {
    let rendered: String = path.iter().map(ToString::to_string).collect();
    rendered.strip_prefix('.').map(str::to_owned).unwrap_or(rendered)
}

// CodecError is the single error type for every codec operation
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CodecError {
    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },

    #[error("invalid option tag: {0} (expected 0 or 1)")]
    InvalidOption(u8),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("non-canonical compact integer: flag {flag:#04x} with value {value}")]
    NonCanonical { flag: u8, value: u64 },

    #[error("compact integer too large: {0}")]
    TooLarge(u64),

    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("collection of {count} elements with zero-sized encoding")]
    ZeroSizedCollection { count: usize },

    #[error("length {0} does not fit in a u32 prefix")]
    LengthOverflow(usize),

    #[error("invalid field spec: {0}")]
    InvalidFieldSpec(String),

    #[error("invalid variant shape: {0}")]
    InvalidVariantShape(String),

    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error("invalid variant index {index} (enum has {count} variants)")]
    InvalidVariantIndex { index: u8, count: usize },

    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidEncoding { offset: usize },

    #[error("schema error at {path}: {message}")]
    SchemaError { path: String, message: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("{remaining} trailing bytes after decode")]
    TrailingBytes { remaining: usize },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("at {}: {source}", format_path(.path))]
    AtPath {
        path: Vec<PathSegment>,
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Prepend `segment` to the error's path, wrapping the error if it has
    /// no path yet.
    pub fn within(self, segment: PathSegment) -> Self {
        match self {
            CodecError::AtPath { mut path, source } => {
                path.insert(0, segment);
                CodecError::AtPath { path, source }
            }
            other => CodecError::AtPath {
                path: vec![segment],
                source: Box::new(other),
            },
        }
    }

    /// Path from the root value to the failing field; empty when the error
    /// was raised at the top level.
    pub fn path(&self) -> &[PathSegment] {
        match self {
            CodecError::AtPath { path, .. } => path,
            _ => &[],
        }
    }

    /// Bare names along [`path`](Self::path).
    pub fn path_names(&self) -> Vec<&str> {
        self.path().iter().map(PathSegment::name).collect()
    }

    /// The underlying error with any path annotation stripped.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::AtPath { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        CodecError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::SchemaError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Json(err.to_string())
    }
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
