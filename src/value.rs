//! # Dynamic Values
//!
//! [`Value`] is the self-describing form of anything the codec can encode.
//! Struct and enum fields, and every field built from a declarative
//! [`Schema`](crate::schema::Schema), work on `Value` trees because their
//! shape is only known at runtime.
//!
//! Enum values are a proper sum type: [`Value::Enum`] carries the variant
//! name and payload as separate fields.
//!
//! `Value` has a total order (floats compare with `total_cmp`), so values can
//! be set elements and map keys. Sets and maps iterate in that order, which
//! is what makes their encoding canonical.
//!
//! The [`ValueType`] trait converts between typed Rust values and `Value`,
//! letting typed fields such as `u8()` or `vec(string())` sit inside a
//! struct or enum.

use crate::core::wide::{I256, U256};
use crate::error::{CodecError, Result};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// A dynamically shaped value.
#[derive(Debug, Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    I256(I256),
    F32(f32),
    F64(f64),
    String(String),
    Option(Option<Box<Value>>),
    /// Fixed arrays and vectors.
    Seq(Vec<Value>),
    Set(BTreeSet<Value>),
    Map(BTreeMap<Value, Value>),
    /// Named fields. Decoding yields declaration order; comparison is by
    /// name, so a record built in any order equals its decoded form.
    Struct(Vec<(String, Value)>),
    Enum {
        variant: String,
        payload: Box<Value>,
    },
}

impl Value {
    /// Build a struct value from `(name, value)` pairs.
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    pub fn variant(name: impl Into<String>, payload: Value) -> Self {
        Value::Enum {
            variant: name.into(),
            payload: Box::new(payload),
        }
    }

    pub fn some(value: Value) -> Self {
        Value::Option(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Value::Option(None)
    }

    /// Look up a named field of a struct value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::U128(_) => "u128",
            Value::U256(_) => "u256",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::I128(_) => "i128",
            Value::I256(_) => "i256",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Option(_) => "option",
            Value::Seq(_) => "seq",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
            Value::Enum { .. } => "enum",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Unit => 0,
            Value::Bool(_) => 1,
            Value::U8(_) => 2,
            Value::U16(_) => 3,
            Value::U32(_) => 4,
            Value::U64(_) => 5,
            Value::U128(_) => 6,
            Value::U256(_) => 7,
            Value::I8(_) => 8,
            Value::I16(_) => 9,
            Value::I32(_) => 10,
            Value::I64(_) => 11,
            Value::I128(_) => 12,
            Value::I256(_) => 13,
            Value::F32(_) => 14,
            Value::F64(_) => 15,
            Value::String(_) => 16,
            Value::Option(_) => 17,
            Value::Seq(_) => 18,
            Value::Set(_) => 19,
            Value::Map(_) => 20,
            Value::Struct(_) => 21,
            Value::Enum { .. } => 22,
        }
    }

    pub(crate) fn mismatch(&self, expected: &str) -> CodecError {
        CodecError::type_mismatch(expected, self.kind())
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Unit, Unit) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (U8(a), U8(b)) => a.cmp(b),
            (U16(a), U16(b)) => a.cmp(b),
            (U32(a), U32(b)) => a.cmp(b),
            (U64(a), U64(b)) => a.cmp(b),
            (U128(a), U128(b)) => a.cmp(b),
            (U256(a), U256(b)) => a.cmp(b),
            (I8(a), I8(b)) => a.cmp(b),
            (I16(a), I16(b)) => a.cmp(b),
            (I32(a), I32(b)) => a.cmp(b),
            (I64(a), I64(b)) => a.cmp(b),
            (I128(a), I128(b)) => a.cmp(b),
            (I256(a), I256(b)) => a.cmp(b),
            (F32(a), F32(b)) => a.total_cmp(b),
            (F64(a), F64(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Option(a), Option(b)) => a.cmp(b),
            (Seq(a), Seq(b)) => a.cmp(b),
            (Set(a), Set(b)) => a.cmp(b),
            (Map(a), Map(b)) => a.cmp(b),
            (Struct(a), Struct(b)) => by_name(a).cmp(&by_name(b)),
            (
                Enum {
                    variant: va,
                    payload: pa,
                },
                Enum {
                    variant: vb,
                    payload: pb,
                },
            ) => va.cmp(vb).then_with(|| pa.cmp(pb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn by_name(members: &[(String, Value)]) -> Vec<&(String, Value)> {
    let mut sorted: Vec<_> = members.iter().collect();
    sorted.sort();
    sorted
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

/// Conversion between a typed Rust value and [`Value`].
pub trait ValueType: Sized {
    fn into_value(self) -> Value;

    /// # Errors
    /// Returns `CodecError::TypeMismatch` when `value` has another shape.
    fn from_value(value: &Value) -> Result<Self>;
}

impl ValueType for Value {
    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl ValueType for () {
    fn into_value(self) -> Value {
        Value::Unit
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Unit => Ok(()),
            other => Err(other.mismatch("unit")),
        }
    }
}

macro_rules! impl_scalar_value {
    ($($ty:ty => $variant:ident, $name:literal;)*) => {
        $(
            impl ValueType for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: &Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => Err(other.mismatch($name)),
                    }
                }
            }
        )*
    };
}

impl_scalar_value! {
    bool => Bool, "bool";
    u8 => U8, "u8";
    u16 => U16, "u16";
    u32 => U32, "u32";
    u64 => U64, "u64";
    u128 => U128, "u128";
    U256 => U256, "u256";
    i8 => I8, "i8";
    i16 => I16, "i16";
    i32 => I32, "i32";
    i64 => I64, "i64";
    i128 => I128, "i128";
    I256 => I256, "i256";
    f32 => F32, "f32";
    f64 => F64, "f64";
    String => String, "string";
}

impl<T: ValueType> ValueType for Option<T> {
    fn into_value(self) -> Value {
        Value::Option(self.map(|v| Box::new(v.into_value())))
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Option(None) => Ok(None),
            Value::Option(Some(inner)) => T::from_value(inner).map(Some),
            other => Err(other.mismatch("option")),
        }
    }
}

impl<T: ValueType> ValueType for Vec<T> {
    fn into_value(self) -> Value {
        Value::Seq(self.into_iter().map(ValueType::into_value).collect())
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Seq(items) => items.iter().map(T::from_value).collect(),
            other => Err(other.mismatch("seq")),
        }
    }
}

/// Accepts a set or any sequence; sequences collapse duplicates.
impl<T: ValueType + Ord> ValueType for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(ValueType::into_value).collect())
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Set(items) => items.iter().map(T::from_value).collect(),
            Value::Seq(items) => items.iter().map(T::from_value).collect(),
            other => Err(other.mismatch("set")),
        }
    }
}

/// Accepts a map or a sequence of `[key, value]` pairs.
impl<K: ValueType + Ord, V: ValueType> ValueType for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }

    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            Value::Seq(pairs) => pairs
                .iter()
                .map(|pair| match pair {
                    Value::Seq(kv) if kv.len() == 2 => {
                        Ok((K::from_value(&kv[0])?, V::from_value(&kv[1])?))
                    }
                    other => Err(other.mismatch("[key, value] pair")),
                })
                .collect(),
            other => Err(other.mismatch("map")),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    v.into_value()
                }
            }
        )*
    };
}

impl_from_for_value!(
    bool, u8, u16, u32, u64, u128, U256, i8, i16, i32, i64, i128, I256, f32, f64, String
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_total_order() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert!(Value::F64(-0.0) < Value::F64(0.0));
    }

    #[test]
    fn test_cross_kind_order_is_stable() {
        assert!(Value::Unit < Value::Bool(false));
        assert!(Value::U8(255) < Value::U16(0));
        assert!(Value::from("a") < Value::none());
    }

    #[test]
    fn test_struct_equality_ignores_member_order() {
        let ab = Value::record([("a", Value::U8(1)), ("b", Value::U8(2))]);
        let ba = Value::record([("b", Value::U8(2)), ("a", Value::U8(1))]);
        assert_eq!(ab, ba);
        assert_ne!(ab, Value::record([("a", Value::U8(2)), ("b", Value::U8(1))]));
        assert_ne!(ab, Value::record([("a", Value::U8(1))]));

        let set: BTreeSet<Value> = [ab, ba].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_record_lookup() {
        let record = Value::record([("a", Value::U8(1)), ("b", Value::from("x"))]);
        assert_eq!(record.get("b"), Some(&Value::from("x")));
        assert_eq!(record.get("c"), None);
        assert_eq!(Value::U8(1).get("a"), None);
    }

    #[test]
    fn test_typed_conversions() {
        let v = vec![Some(1u16), None].into_value();
        assert_eq!(
            v,
            Value::Seq(vec![Value::some(Value::U16(1)), Value::none()])
        );
        assert_eq!(Vec::<Option<u16>>::from_value(&v), Ok(vec![Some(1), None]));

        assert_eq!(
            u8::from_value(&Value::U16(1)),
            Err(CodecError::TypeMismatch {
                expected: "u8".into(),
                found: "u16".into()
            })
        );
    }

    #[test]
    fn test_set_from_sequence_collapses_duplicates() {
        let seq = Value::Seq(vec![Value::U8(3), Value::U8(1), Value::U8(3)]);
        let set = BTreeSet::<u8>::from_value(&seq).expect("set");
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_map_from_pairs() {
        let pairs = Value::Seq(vec![
            Value::Seq(vec![Value::from("b"), Value::U8(2)]),
            Value::Seq(vec![Value::from("a"), Value::U8(1)]),
        ]);
        let map = BTreeMap::<String, u8>::from_value(&pairs).expect("map");
        assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec!["a", "b"]);

        let bad = Value::Seq(vec![Value::Seq(vec![Value::U8(1)])]);
        assert!(BTreeMap::<u8, u8>::from_value(&bad).is_err());
    }
}
