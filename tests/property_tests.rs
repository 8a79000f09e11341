//! Property-based tests using proptest
//!
//! These tests validate codec invariants across a wide range of randomly
//! generated inputs: round trips, determinism, canonical ordering and
//! robustness against arbitrary bytes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use schema_codec::fields::{
    compact, f64, i128, i64, map, option, set, string, u16, u32, u64, u8, utf16_string, vec,
    StructField, VariantsField, MAX_COMPACT,
};
use schema_codec::schema::Schema;
use schema_codec::{decode, decode_with, encode, DecodeOptions, Value};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

fn record_field() -> StructField {
    StructField::builder()
        .field("id", u64())
        .field("name", string())
        .field("tags", vec(string()))
        .field("score", option(i64()))
        .build()
        .expect("valid struct")
}

// Property: Any string survives a round trip
proptest! {
    #[test]
    fn prop_string_roundtrip(text in any::<String>()) {
        let bytes = encode(&string(), &text).expect("Encoding should not fail");
        prop_assert_eq!(bytes.len(), 4 + text.len());
        let decoded = decode(&string(), &bytes).expect("Decoding should not fail");
        prop_assert_eq!(decoded, text);
    }
}

// Property: UTF-16 and UTF-8 fields share one wire format
proptest! {
    #[test]
    fn prop_utf16_matches_utf8(text in any::<String>()) {
        let units: Vec<u16> = text.encode_utf16().collect();
        let via_utf16 = encode(&utf16_string(), &units).expect("Encoding should not fail");
        let via_utf8 = encode(&string(), &text).expect("Encoding should not fail");
        prop_assert_eq!(&via_utf16, &via_utf8);
        prop_assert_eq!(decode(&utf16_string(), &via_utf8).expect("Decoding should not fail"), units);
    }
}

// Property: Fixed-width integers round trip
proptest! {
    #[test]
    fn prop_integer_roundtrip(a in any::<u16>(), b in any::<i128>(), c in any::<u32>()) {
        prop_assert_eq!(decode(&u16(), encode(&u16(), &a).unwrap()).unwrap(), a);
        prop_assert_eq!(decode(&i128(), encode(&i128(), &b).unwrap()).unwrap(), b);
        let bytes = encode(&u32(), &c).unwrap();
        prop_assert_eq!(&bytes, &c.to_le_bytes().to_vec());
    }
}

// Property: Finite floats round trip bit-exactly
proptest! {
    #[test]
    fn prop_float_roundtrip(x in any::<f64>()) {
        let decoded = decode(&f64(), encode(&f64(), &x).unwrap()).unwrap();
        prop_assert_eq!(decoded.to_bits(), x.to_bits());
    }
}

// Property: Compact integers round trip in their shortest form
proptest! {
    #[test]
    fn prop_compact_roundtrip(n in 0u64..=MAX_COMPACT) {
        let bytes = encode(&compact(), &n).expect("Encoding should not fail");
        let expected_len = match n {
            0..=252 => 1,
            253..=0xFFFF => 3,
            _ => 5,
        };
        prop_assert_eq!(bytes.len(), expected_len);
        prop_assert_eq!(decode(&compact(), &bytes).unwrap(), n);
    }
}

// Property: Set encoding does not depend on insertion order
proptest! {
    #[test]
    fn prop_set_order_independent(items in prop::collection::vec(any::<u16>(), 0..64)) {
        let forward: BTreeSet<u16> = items.iter().copied().collect();
        let backward: BTreeSet<u16> = items.iter().rev().copied().collect();
        let field = set(u16());
        prop_assert_eq!(encode(&field, &forward).unwrap(), encode(&field, &backward).unwrap());
        prop_assert_eq!(decode(&field, encode(&field, &forward).unwrap()).unwrap(), forward);
    }
}

// Property: Map round trip
proptest! {
    #[test]
    fn prop_map_roundtrip(entries in prop::collection::btree_map(any::<String>(), any::<u8>(), 0..16)) {
        let field = map(string(), u8());
        let bytes = encode(&field, &entries).unwrap();
        let decoded: BTreeMap<String, u8> = decode(&field, &bytes).unwrap();
        prop_assert_eq!(decoded, entries);
    }
}

// Property: Struct encoding is deterministic and round trips
proptest! {
    #[test]
    fn prop_struct_roundtrip(
        id in any::<u64>(),
        name in ".{0,24}",
        tags in prop::collection::vec("[a-z]{0,8}", 0..8),
        score in any::<Option<i64>>(),
    ) {
        let value = Value::record([
            ("id", Value::U64(id)),
            ("name", Value::from(name)),
            ("tags", Value::Seq(tags.into_iter().map(Value::from).collect())),
            ("score", Value::Option(score.map(|s| Box::new(Value::I64(s))))),
        ]);
        let field = record_field();
        let bytes1 = encode(&field, &value).unwrap();
        let bytes2 = encode(&field, &value).unwrap();
        prop_assert_eq!(&bytes1, &bytes2);
        prop_assert_eq!(decode(&field, &bytes1).unwrap(), value);
    }
}

// Property: Enum values round trip through their index
proptest! {
    #[test]
    fn prop_enum_roundtrip(pick in 0usize..3, n in any::<u8>(), text in ".{0,16}") {
        let field = VariantsField::builder()
            .variant("small", u8())
            .variant("text", string())
            .variant("nothing", option(u8()))
            .build()
            .unwrap();
        let value = match pick {
            0 => Value::variant("small", Value::U8(n)),
            1 => Value::variant("text", Value::from(text)),
            _ => Value::variant("nothing", Value::none()),
        };
        let bytes = encode(&field, &value).unwrap();
        prop_assert_eq!(bytes[0] as usize, pick);
        prop_assert_eq!(decode(&field, &bytes).unwrap(), value);
    }
}

// Property: Decoding arbitrary bytes never panics
proptest! {
    #[test]
    fn prop_arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let schema = Schema::compile(&json!({"struct": {
            "kind": {"enum": [
                {"struct": {"a": {"map": {"key": "string", "value": {"set": "i32"}}}}},
                {"struct": {"b": {"array": {"type": "u256", "len": 2}}}}
            ]},
            "note": {"option": "string"}
        }})).unwrap();
        let _ = decode_with(&schema, &data, DecodeOptions::allow_trailing());
        let _ = decode(&compact(), &data);
    }
}

// Property: Appending bytes to a valid encoding is detected
proptest! {
    #[test]
    fn prop_trailing_bytes_detected(n in any::<u32>(), extra in prop::collection::vec(any::<u8>(), 1..8)) {
        let mut bytes = encode(&u32(), &n).unwrap();
        bytes.extend_from_slice(&extra);
        prop_assert!(decode(&u32(), &bytes).is_err());
        prop_assert_eq!(decode_with(&u32(), &bytes, DecodeOptions::allow_trailing()).unwrap(), n);
    }
}
