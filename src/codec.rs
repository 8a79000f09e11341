//! # Encode / Decode Entry Points
//!
//! [`encode`] and [`decode`] run one field over a fresh buffer. [`Codec`]
//! wraps the same calls with a [`CodecConfig`] and a [`Metrics`] collector
//! for callers that want tuned buffers, a trailing-bytes policy and
//! counters.
//!
//! ## Trailing Bytes
//! A top-level decode must consume the whole input by default: leftover
//! bytes mean the input was not produced for this schema, and accepting
//! them would give two different byte strings the same meaning. Use
//! [`decode_with`] and [`TrailingBytes::Allow`] to read a prefix instead.

use crate::config::{CodecConfig, TrailingBytes};
use crate::core::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::fields::Field;
use crate::json;
use crate::schema::CompiledSchema;
use crate::utils::metrics::{global_metrics, Metrics, Timer};
use std::sync::Arc;
use tracing::{debug, trace};

/// Options for a single decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub trailing: TrailingBytes,
}

impl DecodeOptions {
    /// Accept input with unread bytes after the value.
    pub fn allow_trailing() -> Self {
        Self {
            trailing: TrailingBytes::Allow,
        }
    }
}

/// Encode `value` with `field`.
///
/// # Errors
/// Whatever the field reports: type mismatches, length mismatches, values
/// out of range. Errors inside structs and enums carry the path to the
/// failing member.
pub fn encode<F: Field + ?Sized>(field: &F, value: &F::Value) -> Result<Vec<u8>> {
    encode_with_capacity(field, value, crate::core::buffer::DEFAULT_CAPACITY)
}

fn encode_with_capacity<F: Field + ?Sized>(
    field: &F,
    value: &F::Value,
    capacity: usize,
) -> Result<Vec<u8>> {
    let mut writer = Writer::with_capacity(capacity);
    field.encode(&mut writer, value)?;
    trace!(len = writer.len(), "encoded value");
    Ok(Vec::from(writer.finish()))
}

/// Decode one value with `field`, rejecting trailing bytes.
///
/// # Errors
/// `CodecError::TrailingBytes` if input remains after the value, otherwise
/// whatever the field reports.
pub fn decode<F: Field + ?Sized>(field: &F, bytes: impl AsRef<[u8]>) -> Result<F::Value> {
    decode_with(field, bytes, DecodeOptions::default())
}

/// Decode one value with `field` under explicit options.
///
/// # Errors
/// As [`decode`], except trailing bytes are accepted under
/// [`TrailingBytes::Allow`].
pub fn decode_with<F: Field + ?Sized>(
    field: &F,
    bytes: impl AsRef<[u8]>,
    options: DecodeOptions,
) -> Result<F::Value> {
    decode_prefix(field, bytes.as_ref(), options).map(|(value, _)| value)
}

/// Decode and report how many bytes the value used.
fn decode_prefix<F: Field + ?Sized>(
    field: &F,
    bytes: &[u8],
    options: DecodeOptions,
) -> Result<(F::Value, usize)> {
    let mut reader = Reader::new(bytes);
    let value = field.decode(&mut reader)?;
    let remaining = reader.remaining();
    if remaining > 0 {
        match options.trailing {
            TrailingBytes::Reject => {
                debug!(consumed = reader.offset(), remaining, "rejecting trailing bytes");
                return Err(CodecError::TrailingBytes { remaining });
            }
            TrailingBytes::Allow => {
                trace!(consumed = reader.offset(), remaining, "ignoring trailing bytes");
            }
        }
    }
    Ok((value, reader.offset()))
}

/// Configured encode/decode with metrics.
///
/// Records into [`global_metrics`] unless [`Codec::with_metrics`] supplies a
/// collector. Cheap to clone; clones share the metrics collector.
#[derive(Debug, Clone)]
pub struct Codec {
    config: CodecConfig,
    metrics: Arc<Metrics>,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            config: CodecConfig::default(),
            metrics: global_metrics(),
        }
    }
}

impl Codec {
    /// # Errors
    /// Returns `CodecError::ConfigError` if `config` does not validate.
    pub fn new(config: CodecConfig) -> Result<Self> {
        let errors = config.codec.validate();
        if !errors.is_empty() {
            return Err(CodecError::ConfigError(errors.join("; ")));
        }
        Ok(Self {
            config,
            metrics: global_metrics(),
        })
    }

    /// Use an existing metrics collector, e.g. one shared between codecs.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    fn options(&self) -> DecodeOptions {
        DecodeOptions {
            trailing: self.config.codec.trailing_bytes,
        }
    }

    /// # Errors
    /// As [`encode`].
    pub fn encode<F: Field + ?Sized>(&self, field: &F, value: &F::Value) -> Result<Vec<u8>> {
        let _timer = Timer::start("encode");
        match encode_with_capacity(field, value, self.config.codec.initial_capacity) {
            Ok(bytes) => {
                self.metrics.encoded(bytes.len() as u64);
                Ok(bytes)
            }
            Err(err) => {
                debug!(error = %err, "encode failed");
                self.metrics.encode_failed();
                Err(err)
            }
        }
    }

    /// # Errors
    /// As [`decode_with`] under the configured trailing-bytes policy.
    pub fn decode<F: Field + ?Sized>(&self, field: &F, bytes: impl AsRef<[u8]>) -> Result<F::Value> {
        let _timer = Timer::start("decode");
        match decode_prefix(field, bytes.as_ref(), self.options()) {
            Ok((value, consumed)) => {
                self.metrics.decoded(consumed as u64);
                Ok(value)
            }
            Err(err) => {
                debug!(error = %err, "decode failed");
                if matches!(err, CodecError::TrailingBytes { .. }) {
                    self.metrics.trailing_rejected();
                } else {
                    self.metrics.decode_failed();
                }
                Err(err)
            }
        }
    }

    /// Encode a JSON document shaped by `schema`.
    ///
    /// # Errors
    /// `CodecError::TypeMismatch` or `CodecError::MissingField` when the
    /// document does not fit the schema, otherwise as [`Codec::encode`].
    pub fn encode_json(&self, schema: &CompiledSchema, document: &serde_json::Value) -> Result<Vec<u8>> {
        let value = json::to_value(schema.schema(), document)?;
        self.encode(schema, &value)
    }

    /// Decode bytes into a JSON document shaped by `schema`.
    ///
    /// # Errors
    /// As [`Codec::decode`].
    pub fn decode_json(&self, schema: &CompiledSchema, bytes: impl AsRef<[u8]>) -> Result<serde_json::Value> {
        let value = self.decode(schema, bytes)?;
        json::from_value(schema.schema(), &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{string, u16, u8};
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_trailing_bytes_rejected_by_default() {
        assert_eq!(
            decode(&u8(), [1u8, 2]),
            Err(CodecError::TrailingBytes { remaining: 1 })
        );
        assert_eq!(decode_with(&u8(), [1u8, 2], DecodeOptions::allow_trailing()), Ok(1));
    }

    #[test]
    fn test_empty_input_underruns() {
        assert!(matches!(
            decode(&u16(), [0u8; 0]),
            Err(CodecError::BufferUnderrun {
                needed: 2,
                remaining: 0
            })
        ));
    }

    #[test]
    fn test_codec_counts_traffic() {
        let codec = Codec::default().with_metrics(Arc::new(Metrics::new()));
        let bytes = codec.encode(&string(), &"hey".to_string()).unwrap();
        assert_eq!(codec.decode(&string(), &bytes).unwrap(), "hey");
        assert!(codec.decode(&string(), [9u8]).is_err());
        let mut extra = bytes.clone();
        extra.push(0);
        assert!(codec.decode(&string(), &extra).is_err());

        let snapshot = codec.metrics().snapshot();
        assert_eq!(snapshot.encodes_total, 1);
        assert_eq!(snapshot.bytes_written, 7);
        assert_eq!(snapshot.decodes_total, 1);
        assert_eq!(snapshot.bytes_read, 7);
        assert_eq!(snapshot.decode_failures, 2);
        assert_eq!(snapshot.trailing_rejections, 1);
    }

    #[test]
    fn test_codec_honours_trailing_policy() {
        let config = CodecConfig::default_with_overrides(|c| {
            c.codec.trailing_bytes = TrailingBytes::Allow;
        });
        let codec = Codec::new(config)
            .unwrap()
            .with_metrics(Arc::new(Metrics::new()));
        assert_eq!(codec.decode(&u8(), [5u8, 6, 7]).unwrap(), 5);
        assert_eq!(codec.metrics().snapshot().bytes_read, 1);
    }

    #[test]
    fn test_codec_records_into_global_metrics_by_default() {
        let codec = Codec::default();
        assert!(Arc::ptr_eq(codec.metrics(), &global_metrics()));
        let configured = Codec::new(CodecConfig::default()).unwrap();
        assert!(Arc::ptr_eq(configured.metrics(), &global_metrics()));

        // Other tests share the global collector, so only check growth
        let before = global_metrics().snapshot().encodes_total;
        codec.encode(&u8(), &1).unwrap();
        assert!(global_metrics().snapshot().encodes_total > before);
    }

    #[test]
    fn test_codec_rejects_bad_config() {
        let config = CodecConfig::default_with_overrides(|c| c.codec.initial_capacity = 0);
        assert!(matches!(Codec::new(config), Err(CodecError::ConfigError(_))));
    }

    #[test]
    fn test_json_roundtrip_through_codec() {
        let schema = Schema::compile(&json!({"struct": {"a": "u8", "b": {"option": "string"}}})).unwrap();
        let codec = Codec::default();
        let document = json!({"a": 3, "b": "x"});
        let bytes = codec.encode_json(&schema, &document).unwrap();
        assert_eq!(bytes, vec![3, 1, 1, 0, 0, 0, b'x']);
        assert_eq!(codec.decode_json(&schema, &bytes).unwrap(), document);
    }
}
