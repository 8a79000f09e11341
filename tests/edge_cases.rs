//! Edge case tests for the field codecs
//!
//! Boundary inputs: empty buffers, truncated payloads, malformed tags,
//! limits on compact integers and enum variants, and error paths through
//! nested composites.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use schema_codec::fields::{
    array, bool, compact, map, option, set, string, u16, u32, u8, unit, vec, StructField,
    VariantsField, MAX_COMPACT,
};
use schema_codec::schema::Schema;
use schema_codec::{decode, decode_with, encode, CodecError, DecodeOptions, DynField, Value};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

fn event_enum() -> VariantsField {
    VariantsField::builder()
        .variant("a", u8())
        .variant("b", string())
        .build()
        .expect("valid variants")
}

#[test]
fn test_fixed_array_length() {
    let field = array(3, u8());
    assert_eq!(
        encode(&field, &vec![1, 2]),
        Err(CodecError::LengthMismatch {
            expected: 3,
            actual: 2
        })
    );
    let bytes = encode(&field, &vec![1, 2, 3]).expect("exact length encodes");
    assert_eq!(bytes.len(), 3);
}

#[test]
fn test_zero_length_array_is_empty() {
    let field = array(0, u32());
    assert!(encode(&field, &vec![]).unwrap().is_empty());
    assert_eq!(decode(&field, [0u8; 0]).unwrap(), Vec::<u32>::new());
}

#[test]
fn test_option_tags() {
    let field = option(u8());
    assert_eq!(decode(&field, [0x00u8]).unwrap(), None);
    assert_eq!(decode(&field, [0x01u8, 0x05]).unwrap(), Some(5));
    assert_eq!(decode(&field, [0x02u8, 0x05]), Err(CodecError::InvalidOption(2)));
}

#[test]
fn test_vec_wire_layout() {
    let bytes = encode(&vec(u8()), &vec![1, 2, 3]).unwrap();
    assert_eq!(bytes, [0x03, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03]);
    assert_eq!(decode(&vec(u8()), &bytes).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_truncated_length_prefix() {
    assert_eq!(
        decode(&string(), [0x05u8, 0x00]),
        Err(CodecError::BufferUnderrun {
            needed: 4,
            remaining: 2
        })
    );
}

#[test]
fn test_truncated_string_payload() {
    assert_eq!(
        decode(&string(), [0x05u8, 0x00, 0x00, 0x00, b'a', b'b']),
        Err(CodecError::BufferUnderrun {
            needed: 5,
            remaining: 2
        })
    );
}

#[test]
fn test_huge_vec_count_does_not_allocate() {
    // Count claims four billion elements but only one byte follows
    let bytes = [0xFFu8, 0xFF, 0xFF, 0xFF, 0x00];
    assert!(matches!(
        decode(&vec(u8()), bytes),
        Err(CodecError::BufferUnderrun { .. })
    ));
}

#[test]
fn test_zero_sized_elements_cannot_inflate_a_count() {
    // Four bytes of count and nothing else: must fail before allocating
    for description in [
        json!({"array": {"type": "unit"}}),
        json!({"array": {"type": {"array": {"type": "u8", "len": 0}}}}),
        json!({"set": "unit"}),
    ] {
        let schema = Schema::compile(&description).unwrap();
        let err = decode(&schema, [0xFFu8, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert_eq!(
            err.root(),
            &CodecError::ZeroSizedCollection {
                count: u32::MAX as usize
            },
            "{description}"
        );
    }

    let schema = Schema::compile(&json!({"array": {"type": "unit"}})).unwrap();
    let units = Value::Seq(vec![Value::Unit; 2]);
    assert!(matches!(
        encode(&schema, &units).map_err(|e| e.root().clone()),
        Err(CodecError::ZeroSizedCollection { count: 2 })
    ));
    assert_eq!(
        decode(&schema, [0u8, 0, 0, 0]).unwrap(),
        Value::Seq(Vec::new())
    );
}

#[test]
fn test_bool_decode_is_lenient() {
    assert!(decode(&bool(), [0x02u8]).unwrap());
    assert!(!decode(&bool(), [0x00u8]).unwrap());
    assert_eq!(encode(&bool(), &true).unwrap(), [1]);
}

#[test]
fn test_compact_boundaries() {
    assert_eq!(decode(&compact(), [0xFDu8, 0x01, 0x01]).unwrap(), 257);
    assert_eq!(
        decode(&compact(), [0xFDu8, 0x01, 0x00]),
        Err(CodecError::NonCanonical {
            flag: 0xFD,
            value: 1
        })
    );

    let max = encode(&compact(), &MAX_COMPACT).unwrap();
    assert_eq!(max, [0xFE, 0x00, 0x00, 0x00, 0x02]);
    assert_eq!(decode(&compact(), &max).unwrap(), MAX_COMPACT);

    let mut over = vec![0xFEu8];
    over.extend_from_slice(&((MAX_COMPACT + 1) as u32).to_le_bytes());
    assert_eq!(
        decode(&compact(), &over),
        Err(CodecError::TooLarge(MAX_COMPACT + 1))
    );
}

#[test]
fn test_trailing_bytes_policy() {
    let bytes = [0x07u8, 0x00, 0xAA];
    assert_eq!(
        decode(&u16(), bytes),
        Err(CodecError::TrailingBytes { remaining: 1 })
    );
    assert_eq!(
        decode_with(&u16(), bytes, DecodeOptions::allow_trailing()).unwrap(),
        7
    );
}

#[test]
fn test_struct_error_path() {
    let inner = StructField::builder().field("b", u8()).build().unwrap();
    let outer = StructField::builder().field("a", inner).build().unwrap();

    let err = decode(&outer, [0u8; 0]).unwrap_err();
    assert_eq!(err.path_names(), vec!["a", "b"]);
    assert!(matches!(err.root(), CodecError::BufferUnderrun { .. }));
    assert!(err.to_string().starts_with("at a.b:"));
}

#[test]
fn test_struct_accepts_members_in_any_order() {
    let field = StructField::builder()
        .field("a", u8())
        .field("b", string())
        .build()
        .unwrap();
    let shuffled = Value::record([("b", Value::from("x")), ("a", Value::U8(1))]);
    let bytes = encode(&field, &shuffled).unwrap();
    assert_eq!(bytes, [1, 1, 0, 0, 0, b'x']);

    let decoded = decode(&field, &bytes).unwrap();
    assert_eq!(decoded, shuffled);
    match decoded {
        Value::Struct(members) => assert_eq!(members[0].0, "a"),
        other => panic!("expected a struct, got {other:?}"),
    }
}

#[test]
fn test_empty_struct_is_zero_bytes() {
    let field = StructField::builder().build().unwrap();
    assert!(encode(&field, &Value::Struct(Vec::new())).unwrap().is_empty());
    assert_eq!(decode(&field, [0u8; 0]).unwrap(), Value::Struct(Vec::new()));
}

#[test]
fn test_duplicate_field_names_rejected() {
    let result = StructField::builder()
        .field("x", u8())
        .field("x", u16())
        .build();
    assert!(matches!(result, Err(CodecError::InvalidFieldSpec(_))));

    let result = StructField::builder().field("", u8()).build();
    assert!(matches!(result, Err(CodecError::InvalidFieldSpec(_))));
}

#[test]
fn test_enum_roundtrip_and_shape() {
    let field = event_enum();
    let value = Value::variant("a", Value::U8(5));
    let bytes = encode(&field, &value).unwrap();
    assert_eq!(bytes, [0, 5]);
    assert_eq!(decode(&field, &bytes).unwrap(), value);

    let two_keys = Value::record([("a", Value::U8(5)), ("b", Value::from("x"))]);
    assert!(matches!(
        encode(&field, &two_keys),
        Err(CodecError::InvalidVariantShape(_))
    ));
    assert_eq!(
        encode(&field, &Value::variant("c", Value::Unit)),
        Err(CodecError::UnknownVariant("c".into()))
    );
}

#[test]
fn test_enum_index_out_of_range() {
    assert_eq!(
        decode(&event_enum(), [2u8]),
        Err(CodecError::InvalidVariantIndex { index: 2, count: 2 })
    );
}

#[test]
fn test_enum_with_full_variant_table() {
    let mut builder = VariantsField::builder();
    for i in 0..256 {
        builder = builder.variant(format!("v{i}"), unit());
    }
    let field = builder.build().unwrap();
    let bytes = encode(&field, &Value::variant("v255", Value::Unit)).unwrap();
    assert_eq!(bytes, [0xFF]);
    assert_eq!(decode(&field, [0xFFu8]).unwrap(), Value::variant("v255", Value::Unit));
}

#[test]
fn test_enum_payload_error_path() {
    let outer = StructField::builder()
        .field("event", event_enum())
        .build()
        .unwrap();
    let err = decode(&outer, [1u8, 0x02, 0x00, 0x00, 0x00, 0xC3, 0x28]).unwrap_err();
    assert_eq!(err.path_names(), vec!["event", "b"]);
    assert_eq!(err.root(), &CodecError::InvalidEncoding { offset: 5 });
    assert!(err.to_string().starts_with("at event/b:"));
}

#[test]
fn test_set_decode_collapses_duplicates() {
    let decoded = decode(&set(u8()), [3u8, 0, 0, 0, 4, 4, 2]).unwrap();
    let expected: BTreeSet<u8> = [2, 4].into_iter().collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_map_decode_keeps_last_duplicate() {
    let bytes = [2u8, 0, 0, 0, 1, 10, 1, 20];
    let decoded = decode(&map(u8(), u8()), bytes).unwrap();
    let expected: BTreeMap<u8, u8> = [(1, 20)].into_iter().collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_dynamic_map_from_pairs() {
    let field = DynField::new(map(DynField::new(string()), DynField::new(u8())));
    let pairs = Value::Seq(vec![
        Value::Seq(vec![Value::from("b"), Value::U8(2)]),
        Value::Seq(vec![Value::from("a"), Value::U8(1)]),
    ]);
    let bytes = encode(&field, &pairs).unwrap();
    assert_eq!(bytes, [2, 0, 0, 0, 1, 0, 0, 0, b'a', 1, 1, 0, 0, 0, b'b', 2]);
}

#[test]
fn test_surrogate_pair_string() {
    let text = "\u{1F600}\u{1D11E}".to_string();
    let bytes = encode(&string(), &text).unwrap();
    assert_eq!(bytes.len(), 4 + 8);
    assert_eq!(decode(&string(), &bytes).unwrap(), text);
}
