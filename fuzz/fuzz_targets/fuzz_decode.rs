#![no_main]

use libfuzzer_sys::fuzz_target;
use schema_codec::schema::{CompiledSchema, Schema};
use schema_codec::{decode_with, encode, DecodeOptions};
use serde_json::json;
use std::sync::OnceLock;

fn schema() -> &'static CompiledSchema {
    static SCHEMA: OnceLock<CompiledSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let description = json!({"struct": {
            "id": "u64",
            "name": "string",
            "owner": {"option": {"struct": {"key": {"array": {"type": "u8", "len": 32}}}}},
            "balances": {"map": {"key": "string", "value": "u128"}},
            "flags": {"set": "u16"},
            "event": {"enum": [
                {"struct": {"created": "unit"}},
                {"struct": {"moved": {"array": {"type": "i256"}}}},
                {"struct": {"renamed": "string"}}
            ]}
        }});
        Schema::compile(&description).expect("fuzz schema is valid")
    })
}

fuzz_target!(|data: &[u8]| {
    // Sets and maps may arrive unsorted or with repeats, so compare values
    // rather than bytes after re-encoding
    if let Ok(value) = decode_with(schema(), data, DecodeOptions::default()) {
        let bytes = encode(schema(), &value).expect("decoded value re-encodes");
        let again = decode_with(schema(), &bytes, DecodeOptions::default())
            .expect("canonical bytes decode");
        assert_eq!(again, value);
        assert!(bytes.len() <= data.len());
    }
});
