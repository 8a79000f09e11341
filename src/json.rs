//! # JSON Bridge
//!
//! Schema-guided conversion between JSON documents and [`Value`]s.
//!
//! JSON alone cannot say whether `3` is a `u8` or an `i64`, so every
//! conversion walks a [`Schema`] alongside the document.
//!
//! ## Mapping
//! ```text
//! u8 .. u64, i8 .. i64    number (decimal strings accepted on input)
//! u128, i128, u256, i256  decimal string (numbers accepted on input)
//! f32, f64                number; NaN and infinities cannot be written
//! bool, string            boolean, string
//! unit                    null
//! option                  null or the inner value
//! array, set              array
//! map                     object when keys are strings, else [[k, v], ...]
//! struct                  object keyed by field name; extra keys ignored
//! enum                    object with exactly one key, the variant name
//! ```

use crate::core::numeric::NumericType;
use crate::core::wide::{I256, U256};
use crate::error::{CodecError, PathSegment, Result};
use crate::schema::Schema;
use crate::value::Value;
use serde_json::{Map, Number, Value as Json};
use std::collections::{BTreeMap, BTreeSet};

/// Convert a JSON document into a [`Value`] shaped by `schema`.
///
/// # Errors
/// `CodecError::TypeMismatch` when a JSON node does not fit its schema
/// node, `CodecError::MissingField` for absent struct fields and
/// `CodecError::UnknownVariant` for undeclared enum variants. Errors inside
/// structs and enums carry their path.
pub fn to_value(schema: &Schema, doc: &Json) -> Result<Value> {
    match schema {
        Schema::Integer(ty) => number_to_value(*ty, doc),
        Schema::Bool => doc
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| mismatch("bool", doc)),
        Schema::String => doc
            .as_str()
            .map(Value::from)
            .ok_or_else(|| mismatch("string", doc)),
        Schema::Unit => match doc {
            Json::Null => Ok(Value::Unit),
            other => Err(mismatch("null", other)),
        },
        Schema::Option(inner) => match doc {
            Json::Null => Ok(Value::none()),
            other => to_value(inner, other).map(Value::some),
        },
        Schema::Array { ty, .. } => {
            let items = doc.as_array().ok_or_else(|| mismatch("array", doc))?;
            items
                .iter()
                .map(|item| to_value(ty, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Seq)
        }
        Schema::Set(inner) => {
            let items = doc.as_array().ok_or_else(|| mismatch("array", doc))?;
            items
                .iter()
                .map(|item| to_value(inner, item))
                .collect::<Result<BTreeSet<_>>>()
                .map(Value::Set)
        }
        Schema::Map { key, value } => map_to_value(key, value, doc),
        Schema::Struct(fields) => {
            let object = doc.as_object().ok_or_else(|| mismatch("object", doc))?;
            let mut out = Vec::with_capacity(fields.len());
            for (name, field) in fields {
                let node = object
                    .get(name)
                    .ok_or_else(|| CodecError::MissingField(name.clone()))?;
                let value = to_value(field, node)
                    .map_err(|e| e.within(PathSegment::Field(name.clone())))?;
                out.push((name.clone(), value));
            }
            Ok(Value::Struct(out))
        }
        Schema::Enum(variants) => {
            let object = doc.as_object().ok_or_else(|| mismatch("object", doc))?;
            let (name, node) = match (object.len(), object.iter().next()) {
                (1, Some(entry)) => entry,
                _ => return Err(mismatch("single-key object", doc)),
            };
            let (_, payload_schema) = variants
                .iter()
                .find(|(variant, _)| variant == name)
                .ok_or_else(|| CodecError::UnknownVariant(name.clone()))?;
            let payload = to_value(payload_schema, node)
                .map_err(|e| e.within(PathSegment::Variant(name.clone())))?;
            Ok(Value::variant(name.clone(), payload))
        }
    }
}

/// Convert a [`Value`] into a JSON document shaped by `schema`.
///
/// # Errors
/// `CodecError::TypeMismatch` when the value does not fit the schema and
/// `CodecError::Json` for floats JSON cannot represent.
pub fn from_value(schema: &Schema, value: &Value) -> Result<Json> {
    match (schema, value) {
        (Schema::Integer(ty), value) => number_from_value(*ty, value),
        (Schema::Bool, Value::Bool(b)) => Ok(Json::Bool(*b)),
        (Schema::String, Value::String(s)) => Ok(Json::String(s.clone())),
        (Schema::Unit, Value::Unit) => Ok(Json::Null),
        (Schema::Option(_), Value::Option(None)) => Ok(Json::Null),
        (Schema::Option(inner), Value::Option(Some(value))) => from_value(inner, value),
        (Schema::Array { ty, .. }, Value::Seq(items)) => items
            .iter()
            .map(|item| from_value(ty, item))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        (Schema::Set(inner), Value::Set(items)) => items
            .iter()
            .map(|item| from_value(inner, item))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        (Schema::Map { key, value: val }, Value::Map(entries)) => {
            if **key == Schema::String {
                let mut object = Map::new();
                for (k, v) in entries {
                    let name = match k {
                        Value::String(name) => name.clone(),
                        other => return Err(other.mismatch("string")),
                    };
                    object.insert(name, from_value(val, v)?);
                }
                Ok(Json::Object(object))
            } else {
                entries
                    .iter()
                    .map(|(k, v)| Ok(Json::Array(vec![from_value(key, k)?, from_value(val, v)?])))
                    .collect::<Result<Vec<_>>>()
                    .map(Json::Array)
            }
        }
        (Schema::Struct(fields), Value::Struct(_)) => {
            let mut object = Map::new();
            for (name, field) in fields {
                let member = value
                    .get(name)
                    .ok_or_else(|| CodecError::MissingField(name.clone()))?;
                let node = from_value(field, member)
                    .map_err(|e| e.within(PathSegment::Field(name.clone())))?;
                object.insert(name.clone(), node);
            }
            Ok(Json::Object(object))
        }
        (Schema::Enum(variants), Value::Enum { variant, payload }) => {
            let (_, payload_schema) = variants
                .iter()
                .find(|(name, _)| name == variant)
                .ok_or_else(|| CodecError::UnknownVariant(variant.clone()))?;
            let node = from_value(payload_schema, payload)
                .map_err(|e| e.within(PathSegment::Variant(variant.clone())))?;
            let mut object = Map::new();
            object.insert(variant.clone(), node);
            Ok(Json::Object(object))
        }
        (schema, value) => Err(value.mismatch(schema_kind(schema))),
    }
}

fn schema_kind(schema: &Schema) -> &'static str {
    match schema {
        Schema::Integer(ty) => ty.name(),
        Schema::Bool => "bool",
        Schema::String => "string",
        Schema::Unit => "unit",
        Schema::Option(_) => "option",
        Schema::Array { .. } => "seq",
        Schema::Set(_) => "set",
        Schema::Map { .. } => "map",
        Schema::Struct(_) => "struct",
        Schema::Enum(_) => "enum",
    }
}

fn describe(doc: &Json) -> String {
    match doc {
        Json::Null => "null".into(),
        Json::Bool(b) => b.to_string(),
        Json::Number(n) => n.to_string(),
        Json::String(_) => "string".into(),
        Json::Array(_) => "array".into(),
        Json::Object(_) => "object".into(),
    }
}

fn mismatch(expected: &str, doc: &Json) -> CodecError {
    CodecError::type_mismatch(expected, describe(doc))
}

fn as_unsigned(doc: &Json) -> Option<u64> {
    doc.as_u64().or_else(|| doc.as_str()?.parse().ok())
}

fn as_signed(doc: &Json) -> Option<i64> {
    doc.as_i64().or_else(|| doc.as_str()?.parse().ok())
}

fn number_to_value(ty: NumericType, doc: &Json) -> Result<Value> {
    let value = match ty {
        NumericType::U8 => as_unsigned(doc).and_then(|n| u8::try_from(n).ok()).map(Value::U8),
        NumericType::U16 => as_unsigned(doc).and_then(|n| u16::try_from(n).ok()).map(Value::U16),
        NumericType::U32 => as_unsigned(doc).and_then(|n| u32::try_from(n).ok()).map(Value::U32),
        NumericType::U64 => as_unsigned(doc).map(Value::U64),
        NumericType::U128 => doc
            .as_u64()
            .map(u128::from)
            .or_else(|| doc.as_str()?.parse().ok())
            .map(Value::U128),
        NumericType::U256 => doc
            .as_u64()
            .map(U256::from)
            .or_else(|| U256::from_dec_str(doc.as_str()?).ok())
            .map(Value::U256),
        NumericType::I8 => as_signed(doc).and_then(|n| i8::try_from(n).ok()).map(Value::I8),
        NumericType::I16 => as_signed(doc).and_then(|n| i16::try_from(n).ok()).map(Value::I16),
        NumericType::I32 => as_signed(doc).and_then(|n| i32::try_from(n).ok()).map(Value::I32),
        NumericType::I64 => as_signed(doc).map(Value::I64),
        NumericType::I128 => doc
            .as_i64()
            .map(i128::from)
            .or_else(|| doc.as_str()?.parse().ok())
            .map(Value::I128),
        NumericType::I256 => doc
            .as_i64()
            .map(I256::from)
            .or_else(|| doc.as_str()?.parse().ok())
            .map(Value::I256),
        NumericType::F32 => doc
            .as_f64()
            .map(|f| f as f32)
            .filter(|f| f.is_finite())
            .map(Value::F32),
        NumericType::F64 => doc.as_f64().map(Value::F64),
    };
    value.ok_or_else(|| mismatch(ty.name(), doc))
}

fn float_to_json(f: f64) -> Result<Json> {
    Number::from_f64(f)
        .map(Json::Number)
        .ok_or_else(|| CodecError::Json(format!("{f} cannot be represented in JSON")))
}

fn number_from_value(ty: NumericType, value: &Value) -> Result<Json> {
    let json = match (ty, value) {
        (NumericType::U8, Value::U8(n)) => Json::from(*n),
        (NumericType::U16, Value::U16(n)) => Json::from(*n),
        (NumericType::U32, Value::U32(n)) => Json::from(*n),
        (NumericType::U64, Value::U64(n)) => Json::from(*n),
        (NumericType::U128, Value::U128(n)) => Json::String(n.to_string()),
        (NumericType::U256, Value::U256(n)) => Json::String(n.to_string()),
        (NumericType::I8, Value::I8(n)) => Json::from(*n),
        (NumericType::I16, Value::I16(n)) => Json::from(*n),
        (NumericType::I32, Value::I32(n)) => Json::from(*n),
        (NumericType::I64, Value::I64(n)) => Json::from(*n),
        (NumericType::I128, Value::I128(n)) => Json::String(n.to_string()),
        (NumericType::I256, Value::I256(n)) => Json::String(n.to_string()),
        (NumericType::F32, Value::F32(f)) => float_to_json(f64::from(*f))?,
        (NumericType::F64, Value::F64(f)) => float_to_json(*f)?,
        (ty, other) => return Err(other.mismatch(ty.name())),
    };
    Ok(json)
}

/// Collect `[[k, v], ...]` or, for string keys, an object.
fn map_to_value(key: &Schema, value: &Schema, doc: &Json) -> Result<Value> {
    let mut entries = BTreeMap::new();
    match doc {
        Json::Object(object) if *key == Schema::String => {
            for (k, v) in object {
                let node = to_value(value, v)?;
                entries.insert(Value::from(k.as_str()), node);
            }
        }
        Json::Array(pairs) => {
            for pair in pairs {
                match pair.as_array().map(Vec::as_slice) {
                    Some([k, v]) => {
                        entries.insert(to_value(key, k)?, to_value(value, v)?);
                    }
                    _ => return Err(mismatch("[key, value] pair", pair)),
                }
            }
        }
        other => return Err(mismatch("map", other)),
    }
    Ok(Value::Map(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(description: Json) -> Schema {
        Schema::parse(&description).unwrap()
    }

    #[test]
    fn test_wide_integers_use_strings() {
        let s = schema(json!({"struct": {"big": "u256", "neg": "i128", "small": "u8"}}));
        let doc = json!({"big": "115792089237316195423570985008687907853269984665640564039457584007913129639935", "neg": -5, "small": "7"});
        let value = to_value(&s, &doc).unwrap();
        assert_eq!(value.get("big"), Some(&Value::U256(U256::MAX)));
        assert_eq!(value.get("neg"), Some(&Value::I128(-5)));
        assert_eq!(value.get("small"), Some(&Value::U8(7)));

        let back = from_value(&s, &value).unwrap();
        assert_eq!(back["neg"], json!("-5"));
        assert_eq!(back["small"], json!(7));
    }

    #[test]
    fn test_out_of_range_number() {
        let s = schema(json!("u8"));
        assert_eq!(
            to_value(&s, &json!(256)),
            Err(CodecError::TypeMismatch {
                expected: "u8".into(),
                found: "256".into()
            })
        );
    }

    #[test]
    fn test_missing_field_and_nested_path() {
        let s = schema(json!({"struct": {"inner": {"struct": {"x": "bool"}}}}));
        let err = to_value(&s, &json!({"inner": {}})).unwrap_err();
        assert_eq!(err.path_names(), vec!["inner"]);
        assert_eq!(err.root(), &CodecError::MissingField("x".into()));

        let err = to_value(&s, &json!({"inner": {"x": 1}})).unwrap_err();
        assert_eq!(err.path_names(), vec!["inner", "x"]);
    }

    #[test]
    fn test_enum_object() {
        let s = schema(json!({"enum": [{"struct": {"a": "unit"}}, {"struct": {"b": "u16"}}]}));
        let value = to_value(&s, &json!({"b": 9})).unwrap();
        assert_eq!(value, Value::variant("b", Value::U16(9)));
        assert_eq!(from_value(&s, &value).unwrap(), json!({"b": 9}));
        assert_eq!(
            to_value(&s, &json!({"c": null})),
            Err(CodecError::UnknownVariant("c".into()))
        );
        assert!(to_value(&s, &json!({"a": null, "b": 1})).is_err());
    }

    #[test]
    fn test_maps_by_key_type() {
        let by_name = schema(json!({"map": {"key": "string", "value": "u8"}}));
        let value = to_value(&by_name, &json!({"z": 1, "a": 2})).unwrap();
        assert_eq!(from_value(&by_name, &value).unwrap(), json!({"a": 2, "z": 1}));

        let by_number = schema(json!({"map": {"key": "u16", "value": "bool"}}));
        let value = to_value(&by_number, &json!([[2, true], [1, false]])).unwrap();
        assert_eq!(
            from_value(&by_number, &value).unwrap(),
            json!([[1, false], [2, true]])
        );
    }

    #[test]
    fn test_f32_out_of_range() {
        let s = schema(json!("f32"));
        assert!(matches!(
            to_value(&s, &json!(1e39)),
            Err(CodecError::TypeMismatch { expected, .. }) if expected == "f32"
        ));
        assert!(matches!(
            to_value(&s, &json!(-1e300)),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert_eq!(to_value(&s, &json!(1.5)), Ok(Value::F32(1.5)));
        assert_eq!(to_value(&s, &json!(f32::MAX)), Ok(Value::F32(f32::MAX)));
    }

    #[test]
    fn test_non_finite_float() {
        let s = schema(json!("f64"));
        assert!(matches!(
            from_value(&s, &Value::F64(f64::NAN)),
            Err(CodecError::Json(_))
        ));
    }
}
