//! # Schema Descriptions
//!
//! A [`Schema`] is the data form of a field tree: it can be parsed from the
//! JSON shapes accepted by [`validate`], turned back into JSON, and built
//! into a [`DynField`] that encodes and decodes [`Value`]s.
//!
//! ```rust
//! use schema_codec::{schema::Schema, Value};
//! use serde_json::json;
//!
//! let schema = Schema::parse(&json!({"struct": {"id": "u32", "tags": {"set": "string"}}})).unwrap();
//! let field = schema.build().unwrap();
//!
//! let value = Value::record([
//!     ("id", Value::U32(7)),
//!     ("tags", Value::Seq(vec![Value::from("b"), Value::from("a")])),
//! ]);
//! let bytes = schema_codec::encode(&field, &value).unwrap();
//! assert_eq!(&bytes[..4], &[7, 0, 0, 0]);
//! ```

mod validate;

pub use validate::{parse, validate};

use crate::core::numeric::NumericType;
use crate::core::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::fields::{self, DynField, Field, StructField, VariantsField};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as Json};
use std::fmt;
use tracing::debug;

/// A parsed, validated schema tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Schema {
    /// Fixed-width integer or float.
    Integer(NumericType),
    Bool,
    String,
    Unit,
    Option(Box<Schema>),
    /// Fixed-length array when `len` is set, otherwise a `u32`-prefixed vec.
    Array {
        ty: Box<Schema>,
        len: Option<u32>,
    },
    /// Variants in declared order; the index is the wire tag.
    Enum(Vec<(String, Schema)>),
    Set(Box<Schema>),
    Map {
        key: Box<Schema>,
        value: Box<Schema>,
    },
    /// Fields in declared order.
    Struct(Vec<(String, Schema)>),
}

impl Schema {
    /// Validate and convert a JSON description.
    ///
    /// # Errors
    /// Returns `CodecError::SchemaError` naming the first offending subtree.
    pub fn parse(description: &Json) -> Result<Self> {
        parse(description)
    }

    /// Parse a schema from JSON text.
    ///
    /// # Errors
    /// Returns `CodecError::Json` for malformed text, otherwise as [`Schema::parse`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let description: Json = serde_json::from_str(text)?;
        parse(&description)
    }

    /// Describe this schema in the JSON form accepted by [`Schema::parse`].
    pub fn to_json(&self) -> Json {
        match self {
            Schema::Integer(ty) => Json::String(ty.name().to_string()),
            Schema::Bool => json!("bool"),
            Schema::String => json!("string"),
            Schema::Unit => json!("unit"),
            Schema::Option(inner) => json!({ "option": inner.to_json() }),
            Schema::Array { ty, len } => {
                let mut body = Map::new();
                body.insert("type".into(), ty.to_json());
                if let Some(len) = len {
                    body.insert("len".into(), json!(len));
                }
                json!({ "array": body })
            }
            Schema::Enum(variants) => {
                let entries: Vec<Json> = variants
                    .iter()
                    .map(|(name, schema)| {
                        let mut body = Map::new();
                        body.insert(name.clone(), schema.to_json());
                        json!({ "struct": body })
                    })
                    .collect();
                json!({ "enum": entries })
            }
            Schema::Set(inner) => json!({ "set": inner.to_json() }),
            Schema::Map { key, value } => {
                json!({ "map": { "key": key.to_json(), "value": value.to_json() } })
            }
            Schema::Struct(fields) => {
                let body: Map<String, Json> = fields
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_json()))
                    .collect();
                json!({ "struct": body })
            }
        }
    }

    /// Build the field tree this schema describes.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidFieldSpec` if a struct or enum is
    /// malformed. Schemas produced by [`Schema::parse`] never fail here.
    pub fn build(&self) -> Result<DynField> {
        let field = match self {
            Schema::Integer(ty) => fields::numeric(*ty),
            Schema::Bool => DynField::new(fields::bool()),
            Schema::String => DynField::new(fields::string()),
            Schema::Unit => DynField::new(fields::unit()),
            Schema::Option(inner) => DynField::new(fields::option(inner.build()?)),
            Schema::Array { ty, len: Some(len) } => {
                DynField::new(fields::array(*len as usize, ty.build()?))
            }
            Schema::Array { ty, len: None } => DynField::new(fields::vec(ty.build()?)),
            Schema::Set(inner) => DynField::new(fields::set(inner.build()?)),
            Schema::Map { key, value } => DynField::new(fields::map(key.build()?, value.build()?)),
            Schema::Struct(entries) => DynField::from_value_field(StructField::new(build_all(entries)?)?),
            Schema::Enum(entries) => DynField::from_value_field(VariantsField::new(build_all(entries)?)?),
        };
        Ok(field)
    }

    /// Parse and build in one step.
    ///
    /// # Errors
    /// As [`Schema::parse`] and [`Schema::build`].
    pub fn compile(description: &Json) -> Result<CompiledSchema> {
        CompiledSchema::new(parse(description)?)
    }
}

fn build_all(entries: &[(String, Schema)]) -> Result<Vec<(String, DynField)>> {
    entries
        .iter()
        .map(|(name, schema)| Ok((name.clone(), schema.build()?)))
        .collect()
}

impl TryFrom<Json> for Schema {
    type Error = CodecError;

    fn try_from(description: Json) -> Result<Self> {
        parse(&description)
    }
}

impl From<Schema> for Json {
    fn from(schema: Schema) -> Self {
        schema.to_json()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// A schema together with its built field.
///
/// Acts as a field over [`Value`] and keeps the schema around for the JSON
/// bridge, which needs type information a bare field does not expose.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    schema: Schema,
    field: DynField,
}

impl CompiledSchema {
    /// # Errors
    /// As [`Schema::build`].
    pub fn new(schema: Schema) -> Result<Self> {
        let field = schema.build()?;
        debug!(schema = %schema, "compiled schema");
        Ok(Self { schema, field })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn field(&self) -> &DynField {
        &self.field
    }
}

impl Field for CompiledSchema {
    type Value = Value;

    fn encode(&self, writer: &mut Writer, value: &Value) -> Result<()> {
        self.field.encode(writer, value)
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Value> {
        self.field.decode(reader)
    }
}
