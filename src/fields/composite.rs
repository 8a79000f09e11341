//! # Composite Fields
//!
//! Structs (named fields in declared order) and tagged enums (one of several
//! named variants, selected by a `u8` discriminant).
//!
//! Both are assembled with a builder, which checks the field list once when
//! [`build`](StructBuilder::build) is called: names must be non-empty and
//! unique, and an enum cannot declare more variants than a `u8` can index.
//!
//! ## Wire Format
//! ```text
//! struct    <field 0> <field 1> ... <field n-1>     declared order, no tags
//! enum      <u8 index> <payload of that variant>
//! ```
//!
//! ## Error Paths
//! A failure inside a sub-field is re-raised with the field name prepended
//! to its path, and a failure inside a variant payload with the variant
//! name, so the caller can tell exactly which nested field was bad.
//!
//! ```rust
//! use schema_codec::fields::{string, u8, VariantsField};
//! use schema_codec::Value;
//!
//! let shape = VariantsField::builder()
//!     .variant("a", u8())
//!     .variant("b", string())
//!     .build()
//!     .unwrap();
//!
//! let value = Value::variant("a", Value::U8(5));
//! let bytes = schema_codec::encode(&shape, &value).unwrap();
//! assert_eq!(bytes, vec![0, 5]);
//! assert_eq!(schema_codec::decode(&shape, &bytes).unwrap(), value);
//! ```

use crate::core::{Reader, Writer};
use crate::error::{constants, CodecError, PathSegment, Result};
use crate::fields::{DynField, Field};
use crate::value::{Value, ValueType};
use std::collections::HashSet;
use tracing::debug;

/// Largest number of variants a `u8` discriminant can address.
pub const MAX_VARIANTS: usize = 256;

fn check_names<'a>(
    names: impl Iterator<Item = &'a str>,
    empty_message: &str,
    what: &str,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(CodecError::InvalidFieldSpec(empty_message.to_string()));
        }
        if !seen.insert(name) {
            return Err(CodecError::InvalidFieldSpec(format!(
                "duplicate {what} name '{name}'"
            )));
        }
    }
    Ok(())
}

/// Record of named fields encoded in declared order.
#[derive(Debug, Clone)]
pub struct StructField {
    fields: Vec<(String, DynField)>,
}

impl StructField {
    pub fn builder() -> StructBuilder {
        StructBuilder::default()
    }

    /// Build from an already erased field list.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidFieldSpec` for empty or duplicate names.
    pub fn new(fields: Vec<(String, DynField)>) -> Result<Self> {
        check_names(
            fields.iter().map(|(name, _)| name.as_str()),
            constants::ERR_EMPTY_FIELD_NAME,
            "field",
        )?;
        Ok(Self { fields })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Field for StructField {
    type Value = Value;

    fn encode(&self, writer: &mut Writer, value: &Value) -> Result<()> {
        let Value::Struct(_) = value else {
            return Err(value.mismatch("struct"));
        };
        for (name, field) in &self.fields {
            let member = value
                .get(name)
                .ok_or_else(|| CodecError::MissingField(name.clone()))?;
            field
                .encode(writer, member)
                .map_err(|e| e.within(PathSegment::Field(name.clone())))?;
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Value> {
        let mut members = Vec::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let member = field
                .decode(reader)
                .map_err(|e| e.within(PathSegment::Field(name.clone())))?;
            members.push((name.clone(), member));
        }
        Ok(Value::Struct(members))
    }
}

/// Collects `(name, field)` pairs for a [`StructField`].
#[derive(Debug, Default)]
pub struct StructBuilder {
    fields: Vec<(String, DynField)>,
}

impl StructBuilder {
    /// Append a named field; any field whose value converts to [`Value`]
    /// is accepted.
    pub fn field<F>(mut self, name: impl Into<String>, field: F) -> Self
    where
        F: Field + 'static,
        F::Value: ValueType,
    {
        self.fields.push((name.into(), DynField::new(field)));
        self
    }

    /// Append an already erased field.
    pub fn dyn_field(mut self, name: impl Into<String>, field: DynField) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// # Errors
    /// Returns `CodecError::InvalidFieldSpec` for empty or duplicate names.
    pub fn build(self) -> Result<StructField> {
        StructField::new(self.fields)
    }
}

/// Tagged union of named variants.
#[derive(Debug, Clone)]
pub struct VariantsField {
    variants: Vec<(String, DynField)>,
}

impl VariantsField {
    pub fn builder() -> VariantsBuilder {
        VariantsBuilder::default()
    }

    /// Build from an already erased variant list.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidFieldSpec` for empty or duplicate names,
    /// or more than [`MAX_VARIANTS`] variants.
    pub fn new(variants: Vec<(String, DynField)>) -> Result<Self> {
        if variants.len() > MAX_VARIANTS {
            return Err(CodecError::InvalidFieldSpec(
                constants::ERR_TOO_MANY_VARIANTS.to_string(),
            ));
        }
        check_names(
            variants.iter().map(|(name, _)| name.as_str()),
            constants::ERR_EMPTY_VARIANT_NAME,
            "variant",
        )?;
        Ok(Self { variants })
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(name, _)| name.as_str())
    }

    /// Split an enum value into variant name and payload. A record with
    /// exactly one field is read as `{ name: payload }`.
    fn split<'v>(value: &'v Value) -> Result<(&'v str, &'v Value)> {
        match value {
            Value::Enum { variant, payload } => Ok((variant.as_str(), payload.as_ref())),
            Value::Struct(fields) if fields.len() == 1 => {
                let (name, payload) = &fields[0];
                Ok((name.as_str(), payload))
            }
            Value::Struct(fields) => Err(CodecError::InvalidVariantShape(format!(
                "record has {} keys, expected exactly one",
                fields.len()
            ))),
            other => Err(CodecError::InvalidVariantShape(format!(
                "{}, found {}",
                constants::ERR_VARIANT_NOT_ENUM,
                other.kind()
            ))),
        }
    }
}

impl Field for VariantsField {
    type Value = Value;

    fn encode(&self, writer: &mut Writer, value: &Value) -> Result<()> {
        let (name, payload) = Self::split(value)?;
        let (index, field) = self
            .variants
            .iter()
            .enumerate()
            .find(|(_, (n, _))| n == name)
            .map(|(i, (_, f))| (i, f))
            .ok_or_else(|| CodecError::UnknownVariant(name.to_string()))?;

        // MAX_VARIANTS is enforced at construction
        writer.write_u8(index as u8);
        field
            .encode(writer, payload)
            .map_err(|e| e.within(PathSegment::Variant(name.to_string())))
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Value> {
        let index = reader.read_u8()?;
        let Some((name, field)) = self.variants.get(usize::from(index)) else {
            debug!(index, count = self.variants.len(), "variant index out of range");
            return Err(CodecError::InvalidVariantIndex {
                index,
                count: self.variants.len(),
            });
        };
        let payload = field
            .decode(reader)
            .map_err(|e| e.within(PathSegment::Variant(name.clone())))?;
        Ok(Value::variant(name.clone(), payload))
    }
}

/// Collects `(name, field)` pairs for a [`VariantsField`].
#[derive(Debug, Default)]
pub struct VariantsBuilder {
    variants: Vec<(String, DynField)>,
}

impl VariantsBuilder {
    pub fn variant<F>(mut self, name: impl Into<String>, field: F) -> Self
    where
        F: Field + 'static,
        F::Value: ValueType,
    {
        self.variants.push((name.into(), DynField::new(field)));
        self
    }

    pub fn dyn_variant(mut self, name: impl Into<String>, field: DynField) -> Self {
        self.variants.push((name.into(), field));
        self
    }

    /// # Errors
    /// Returns `CodecError::InvalidFieldSpec` for empty or duplicate names,
    /// or more than [`MAX_VARIANTS`] variants.
    pub fn build(self) -> Result<VariantsField> {
        VariantsField::new(self.variants)
    }
}
