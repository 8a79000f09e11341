//! # Collection Fields
//!
//! Fixed arrays, vectors, sets and maps, generic over their element fields.
//!
//! ## Wire Format
//! ```text
//! array(n)   <elem> * n                       (no length prefix)
//! vec        <u32 count> <elem> * count
//! set        <u32 count> <elem> * count       ascending element order
//! map        <u32 count> (<key> <value>) * count   ascending key order
//! ```
//!
//! Sets and maps are backed by `BTreeSet`/`BTreeMap`, so they always encode
//! in the element (or key) total order: two equal collections produce the
//! same bytes no matter how they were built. Decoding a set that repeats an
//! element keeps one copy, and a map that repeats a key keeps the last
//! value.
//!
//! Decoders never trust a count for allocation: capacity is capped by the
//! bytes actually remaining in the input. A count-prefixed collection whose
//! first element takes no bytes on the wire (`unit`, an empty struct, a
//! zero-length array) fails with `ZeroSizedCollection`, in both directions,
//! since its count would otherwise be unbounded by the input. Fixed arrays
//! are exempt: their length comes from the field, not the input.

use crate::core::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::fields::Field;
use std::collections::{BTreeMap, BTreeSet};

/// Write a collection length or byte count as a `u32` prefix.
pub(crate) fn write_len(writer: &mut Writer, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| CodecError::LengthOverflow(len))?;
    writer.write_number(len);
    Ok(())
}

pub(crate) fn read_len(reader: &mut Reader<'_>) -> Result<usize> {
    Ok(reader.read_number::<u32>()? as usize)
}

/// Fails when the first element of a non-empty collection used no bytes.
fn ensure_sized(count: usize, used: usize) -> Result<()> {
    if used == 0 {
        return Err(CodecError::ZeroSizedCollection { count });
    }
    Ok(())
}

/// Each element takes at least one byte unless the element type is empty,
/// so the remaining input bounds how much is worth preallocating.
fn capacity_hint(count: usize, reader: &Reader<'_>) -> usize {
    count.min(reader.remaining())
}

/// Exactly `len` elements with no length prefix.
#[derive(Debug, Clone)]
pub struct ArrayField<F> {
    len: usize,
    inner: F,
}

impl<F> ArrayField<F> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<F: Field> Field for ArrayField<F> {
    type Value = Vec<F::Value>;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        if value.len() != self.len {
            return Err(CodecError::LengthMismatch {
                expected: self.len,
                actual: value.len(),
            });
        }
        for item in value {
            self.inner.encode(writer, item)?;
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        let mut items = Vec::with_capacity(capacity_hint(self.len, reader));
        for _ in 0..self.len {
            items.push(self.inner.decode(reader)?);
        }
        Ok(items)
    }
}

pub fn array<F: Field>(len: usize, inner: F) -> ArrayField<F> {
    ArrayField { len, inner }
}

/// `u32`-prefixed sequence.
#[derive(Debug, Clone)]
pub struct VecField<F> {
    inner: F,
}

impl<F: Field> Field for VecField<F> {
    type Value = Vec<F::Value>;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        write_len(writer, value.len())?;
        for (i, item) in value.iter().enumerate() {
            let start = writer.len();
            self.inner.encode(writer, item)?;
            if i == 0 {
                ensure_sized(value.len(), writer.len() - start)?;
            }
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        let count = read_len(reader)?;
        let mut items = Vec::with_capacity(capacity_hint(count, reader));
        for i in 0..count {
            let start = reader.offset();
            items.push(self.inner.decode(reader)?);
            if i == 0 {
                ensure_sized(count, reader.offset() - start)?;
            }
        }
        Ok(items)
    }
}

pub fn vec<F: Field>(inner: F) -> VecField<F> {
    VecField { inner }
}

/// `u32`-prefixed set in ascending order.
#[derive(Debug, Clone)]
pub struct SetField<F> {
    inner: F,
}

impl<F> Field for SetField<F>
where
    F: Field,
    F::Value: Ord,
{
    type Value = BTreeSet<F::Value>;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        write_len(writer, value.len())?;
        for (i, item) in value.iter().enumerate() {
            let start = writer.len();
            self.inner.encode(writer, item)?;
            if i == 0 {
                ensure_sized(value.len(), writer.len() - start)?;
            }
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        let count = read_len(reader)?;
        let mut items = BTreeSet::new();
        for i in 0..count {
            let start = reader.offset();
            items.insert(self.inner.decode(reader)?);
            if i == 0 {
                ensure_sized(count, reader.offset() - start)?;
            }
        }
        Ok(items)
    }
}

pub fn set<F>(inner: F) -> SetField<F>
where
    F: Field,
    F::Value: Ord,
{
    SetField { inner }
}

/// `u32`-prefixed key/value pairs in ascending key order.
#[derive(Debug, Clone)]
pub struct MapField<K, V> {
    key: K,
    value: V,
}

impl<K, V> Field for MapField<K, V>
where
    K: Field,
    K::Value: Ord,
    V: Field,
{
    type Value = BTreeMap<K::Value, V::Value>;

    fn encode(&self, writer: &mut Writer, value: &Self::Value) -> Result<()> {
        write_len(writer, value.len())?;
        for (i, (k, v)) in value.iter().enumerate() {
            let start = writer.len();
            self.key.encode(writer, k)?;
            self.value.encode(writer, v)?;
            if i == 0 {
                ensure_sized(value.len(), writer.len() - start)?;
            }
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Self::Value> {
        let count = read_len(reader)?;
        let mut entries = BTreeMap::new();
        for i in 0..count {
            let start = reader.offset();
            let k = self.key.decode(reader)?;
            let v = self.value.decode(reader)?;
            entries.insert(k, v);
            if i == 0 {
                ensure_sized(count, reader.offset() - start)?;
            }
        }
        Ok(entries)
    }
}

pub fn map<K, V>(key: K, value: V) -> MapField<K, V>
where
    K: Field,
    K::Value: Ord,
    V: Field,
{
    MapField { key, value }
}
