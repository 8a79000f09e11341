//! Structural validation of JSON schema descriptions.
//!
//! The accepted shapes are a closed set:
//!
//! ```text
//! "u8" .. "u256" | "i8" .. "i256" | "f32" | "f64" | "bool" | "string" | "unit"
//! { "option": <schema> }
//! { "array": { "type": <schema>, "len": <u32>? } }     no len means vec
//! { "enum": [ { "struct": { <variant>: <schema> } }, ... ] }
//! { "set": <schema> }
//! { "map": { "key": <schema>, "value": <schema> } }
//! { "struct": { <field>: <schema>, ... } }
//! ```
//!
//! Every nested schema is checked the same way. Errors name the offending
//! subtree with a JSON-path style location such as `$.struct.owner.option`.

use super::Schema;
use crate::core::numeric::NumericType;
use crate::error::{constants, CodecError, Result};
use serde_json::{Map, Value as Json};

/// Check a schema description without keeping the parsed tree.
///
/// # Errors
/// Returns `CodecError::SchemaError` naming the first offending subtree.
pub fn validate(description: &Json) -> Result<()> {
    parse(description).map(|_| ())
}

/// Validate and convert a schema description.
///
/// # Errors
/// Returns `CodecError::SchemaError` naming the first offending subtree.
pub fn parse(description: &Json) -> Result<Schema> {
    parse_at(description, "$")
}

fn parse_at(description: &Json, path: &str) -> Result<Schema> {
    match description {
        Json::String(name) => parse_primitive(name, path),
        Json::Object(entries) => {
            let mut iter = entries.iter();
            let (key, inner) = match (iter.next(), iter.next()) {
                (Some(entry), None) => entry,
                _ => return Err(CodecError::schema(path, constants::ERR_SINGLE_KEY)),
            };
            let here = format!("{path}.{key}");
            match key.as_str() {
                "option" => Ok(Schema::Option(Box::new(parse_at(inner, &here)?))),
                "set" => Ok(Schema::Set(Box::new(parse_at(inner, &here)?))),
                "array" => parse_array(inner, &here),
                "map" => parse_map(inner, &here),
                "struct" => parse_struct(inner, &here).map(Schema::Struct),
                "enum" => parse_enum(inner, &here),
                other => Err(CodecError::schema(
                    path,
                    format!("{} (found '{other}')", constants::ERR_SINGLE_KEY),
                )),
            }
        }
        other => Err(CodecError::schema(
            path,
            format!("{} (found {})", constants::ERR_SCHEMA_SHAPE, json_kind(other)),
        )),
    }
}

fn parse_primitive(name: &str, path: &str) -> Result<Schema> {
    match name {
        "bool" => Ok(Schema::Bool),
        "string" => Ok(Schema::String),
        "unit" => Ok(Schema::Unit),
        other => other.parse::<NumericType>().map(Schema::Integer).map_err(|_| {
            CodecError::schema(path, format!("{} '{other}'", constants::ERR_UNKNOWN_PRIMITIVE))
        }),
    }
}

fn expect_object<'a>(value: &'a Json, path: &str, message: &str) -> Result<&'a Map<String, Json>> {
    value
        .as_object()
        .ok_or_else(|| CodecError::schema(path, message))
}

fn reject_extra_keys(entries: &Map<String, Json>, allowed: &[&str], path: &str) -> Result<()> {
    match entries.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(extra) => Err(CodecError::schema(
            path,
            format!("unexpected key '{extra}' (allowed: {})", allowed.join(", ")),
        )),
        None => Ok(()),
    }
}

fn parse_array(inner: &Json, path: &str) -> Result<Schema> {
    let entries = expect_object(inner, path, constants::ERR_ARRAY_TYPE)?;
    reject_extra_keys(entries, &["type", "len"], path)?;

    let ty = entries
        .get("type")
        .ok_or_else(|| CodecError::schema(path, constants::ERR_ARRAY_TYPE))?;
    let len = match entries.get("len") {
        None => None,
        Some(len) => {
            let len = len
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| CodecError::schema(format!("{path}.len"), constants::ERR_ARRAY_LEN))?;
            Some(len)
        }
    };
    let ty = parse_at(ty, &format!("{path}.type"))?;
    Ok(Schema::Array {
        ty: Box::new(ty),
        len,
    })
}

fn parse_map(inner: &Json, path: &str) -> Result<Schema> {
    let entries = expect_object(inner, path, constants::ERR_MAP_ENTRIES)?;
    reject_extra_keys(entries, &["key", "value"], path)?;

    match (entries.get("key"), entries.get("value")) {
        (Some(key), Some(value)) => Ok(Schema::Map {
            key: Box::new(parse_at(key, &format!("{path}.key"))?),
            value: Box::new(parse_at(value, &format!("{path}.value"))?),
        }),
        _ => Err(CodecError::schema(path, constants::ERR_MAP_ENTRIES)),
    }
}

fn parse_struct(inner: &Json, path: &str) -> Result<Vec<(String, Schema)>> {
    let entries = expect_object(inner, path, "struct must map field names to schemas")?;
    entries
        .iter()
        .map(|(name, schema)| {
            if name.is_empty() {
                return Err(CodecError::schema(path, constants::ERR_EMPTY_FIELD_NAME));
            }
            Ok((name.clone(), parse_at(schema, &format!("{path}.{name}"))?))
        })
        .collect()
}

fn parse_enum(inner: &Json, path: &str) -> Result<Schema> {
    let entries = inner
        .as_array()
        .ok_or_else(|| CodecError::schema(path, "enum must be an array of variants"))?;

    let mut variants = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let here = format!("{path}[{i}]");
        let wrapper = expect_object(entry, &here, constants::ERR_ENUM_ENTRY)?;
        let body = match (wrapper.len(), wrapper.get("struct")) {
            (1, Some(body)) => body,
            _ => return Err(CodecError::schema(&here, constants::ERR_ENUM_ENTRY)),
        };
        let here = format!("{here}.struct");
        let body = expect_object(body, &here, constants::ERR_ENUM_ENTRY)?;
        if body.len() != 1 {
            return Err(CodecError::schema(
                &here,
                format!("{} (found {} keys)", constants::ERR_ENUM_ENTRY, body.len()),
            ));
        }
        let mut fields = parse_struct(&Json::Object(body.clone()), &here)?;
        variants.extend(fields.pop());
    }

    if variants.len() > crate::fields::composite::MAX_VARIANTS {
        return Err(CodecError::schema(path, constants::ERR_TOO_MANY_VARIANTS));
    }
    let mut seen = std::collections::HashSet::new();
    if let Some((dup, _)) = variants.iter().find(|(name, _)| !seen.insert(name.clone())) {
        return Err(CodecError::schema(
            path,
            format!("duplicate variant name '{dup}'"),
        ));
    }
    Ok(Schema::Enum(variants))
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
