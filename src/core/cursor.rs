//! # Read Cursor
//!
//! Bounds-checked cursor over an immutable byte slice, used while decoding.
//!
//! Every read of `n` bytes first checks that `offset + n <= len` and fails
//! with `CodecError::BufferUnderrun` otherwise. The offset only moves
//! forward; the reader never seeks back.

use crate::core::numeric::Numeric;
use crate::error::{CodecError, Result};

/// Forward-only reader over borrowed bytes.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left between the offset and the end of input.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless at least `n` bytes remain.
    pub fn assert_enough(&self, n: usize) -> Result<()> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::BufferUnderrun {
                needed: n,
                remaining,
            });
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.assert_enough(n)?;
        let start = self.offset;
        self.offset += n;
        Ok(&self.data[start..self.offset])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.assert_enough(1)?;
        let byte = self.data[self.offset];
        self.offset += 1;
        Ok(byte)
    }

    /// Read a little-endian number of `N`'s wire width.
    pub fn read_number<N: Numeric>(&mut self) -> Result<N> {
        let width = N::TYPE.width();
        self.assert_enough(width)?;
        let mut src = &self.data[self.offset..self.offset + width];
        let value = N::read_le(&mut src);
        self.offset += width;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::wide::U256;

    #[test]
    fn test_reads_advance_offset() {
        let data = [0x01, 0x02, 0x03, 0xAA, 0xBB];
        let mut reader = Reader::new(&data);

        assert_eq!(reader.read_number::<u16>(), Ok(0x0201));
        assert_eq!(reader.read_u8(), Ok(0x03));
        assert_eq!(reader.read_bytes(2), Ok(&data[3..]));
        assert_eq!(reader.offset(), 5);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_underrun_reports_need() {
        let mut reader = Reader::new(&[1, 2, 3]);
        assert_eq!(
            reader.read_number::<u32>(),
            Err(CodecError::BufferUnderrun {
                needed: 4,
                remaining: 3
            })
        );
        // failed reads leave the offset untouched
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn test_empty_input() {
        let mut reader = Reader::new(&[]);
        assert!(reader.assert_enough(0).is_ok());
        assert!(reader.read_u8().is_err());
        assert_eq!(reader.read_bytes(0), Ok(&[][..]));
    }

    #[test]
    fn test_wide_read() {
        let mut data = [0u8; 33];
        data[0] = 9;
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_number::<U256>(), Ok(U256::from(9u8)));
        assert_eq!(reader.remaining(), 1);
    }
}
