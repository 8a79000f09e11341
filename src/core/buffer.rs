//! # Write Buffer
//!
//! Growable byte sink used while encoding.
//!
//! ## Invariants
//! - `len <= capacity`, and the write offset is always `len`
//! - Capacity only grows: when a write does not fit, the buffer is
//!   reallocated to `max(capacity * 2, capacity + n)`, giving amortised O(1)
//!   cost per byte over a sequence of writes
//! - [`Writer::finish`] yields exactly the bytes written, never the spare
//!   capacity
//!
//! ## Usage
//! ```rust
//! use schema_codec::core::buffer::Writer;
//!
//! let mut writer = Writer::new();
//! writer.write_number(0x0102_u16);
//! writer.write_bytes(b"hi");
//! assert_eq!(&writer.finish()[..], &[0x02, 0x01, b'h', b'i']);
//! ```

use crate::core::numeric::Numeric;
use bytes::{BufMut, Bytes, BytesMut};

/// Default starting capacity for a fresh writer.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Growable little-endian write buffer.
#[derive(Debug, Default)]
pub struct Writer {
    buf: BytesMut,
}

impl Writer {
    /// Create a writer with [`DEFAULT_CAPACITY`] bytes of room.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Ensure at least `n` more bytes fit without reallocating.
    pub fn grow(&mut self, n: usize) {
        let capacity = self.buf.capacity();
        if capacity - self.buf.len() >= n {
            return;
        }
        let target = capacity
            .saturating_mul(2)
            .max(capacity.saturating_add(n));
        self.buf.reserve(target - self.buf.len());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.grow(bytes.len());
        self.buf.put_slice(bytes);
    }

    pub fn write_u8(&mut self, byte: u8) {
        self.grow(1);
        self.buf.put_u8(byte);
    }

    /// Write `value` little-endian using its fixed wire width.
    pub fn write_number<N: Numeric>(&mut self, value: N) {
        self.grow(N::TYPE.width());
        value.write_le(&mut self.buf);
    }

    /// Bytes written so far; this is also the write offset.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// View of the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning exactly the bytes written.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::wide::I256;

    #[test]
    fn test_grow_doubles_when_small_write_overflows() {
        let mut writer = Writer::with_capacity(4);
        writer.write_bytes(&[1, 2, 3, 4]);
        let before = writer.capacity();

        writer.write_u8(5);
        assert!(writer.capacity() >= before * 2);
        assert_eq!(writer.len(), 5);
    }

    #[test]
    fn test_grow_covers_large_write() {
        let mut writer = Writer::with_capacity(4);
        let big = vec![7u8; 100];
        writer.write_bytes(&big);
        assert!(writer.capacity() >= 104);
        assert_eq!(writer.as_slice(), big.as_slice());
    }

    #[test]
    fn test_grow_is_noop_with_room() {
        let mut writer = Writer::with_capacity(64);
        let before = writer.capacity();
        writer.grow(10);
        assert_eq!(writer.capacity(), before);
    }

    #[test]
    fn test_finish_trims_to_written() {
        let mut writer = Writer::with_capacity(256);
        writer.write_number(7u32);
        let bytes = writer.finish();
        assert_eq!(&bytes[..], &[7, 0, 0, 0]);
    }

    #[test]
    fn test_numbers_are_little_endian() {
        let mut writer = Writer::new();
        writer.write_number(-2i16);
        writer.write_number(1.5f32);
        writer.write_number(I256::from_i128(-1));

        let bytes = writer.finish();
        assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
        assert_eq!(&bytes[2..6], &1.5f32.to_le_bytes());
        assert_eq!(&bytes[6..], &[0xFF; 32]);
    }
}
