//! # String Fields
//!
//! Text is written as a `u32` byte count followed by UTF-8 bytes.
//!
//! Decoding validates the UTF-8 by hand rather than trusting the input:
//! bad lead bytes, truncated sequences, bad continuation bytes, overlong
//! forms, surrogate code points and values above `U+10FFFF` all fail with
//! `CodecError::InvalidEncoding`, carrying the absolute input offset of the
//! offending sequence.
//!
//! [`Utf16Field`] carries UTF-16 code units (as used by Windows and
//! JavaScript hosts) over the same wire format, pairing surrogates on the
//! way out and splitting supplementary characters on the way back.

use crate::core::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::fields::collection::{read_len, write_len};
use crate::fields::Field;

/// Length-prefixed UTF-8 string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringField;

impl Field for StringField {
    type Value = String;

    fn encode(&self, writer: &mut Writer, value: &String) -> Result<()> {
        write_len(writer, value.len())?;
        writer.write_bytes(value.as_bytes());
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<String> {
        let len = read_len(reader)?;
        let base = reader.offset();
        let bytes = reader.read_bytes(len)?;
        decode_utf8(bytes, base)
    }
}

pub fn string() -> StringField {
    StringField
}

/// Length-prefixed UTF-8 string exposed as UTF-16 code units.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Field;

impl Field for Utf16Field {
    type Value = Vec<u16>;

    fn encode(&self, writer: &mut Writer, value: &Vec<u16>) -> Result<()> {
        let bytes = utf16_to_utf8(value)?;
        write_len(writer, bytes.len())?;
        writer.write_bytes(&bytes);
        Ok(())
    }

    fn decode(&self, reader: &mut Reader<'_>) -> Result<Vec<u16>> {
        let len = read_len(reader)?;
        let base = reader.offset();
        let bytes = reader.read_bytes(len)?;
        utf8_to_utf16(bytes, base)
    }
}

pub fn utf16_string() -> Utf16Field {
    Utf16Field
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Decode one UTF-8 sequence starting at `bytes[i]`, returning the code
/// point and its byte length. `base` is only used for error offsets.
fn next_code_point(bytes: &[u8], i: usize, base: usize) -> Result<(u32, usize)> {
    let invalid = || CodecError::InvalidEncoding { offset: base + i };
    let lead = bytes[i];

    let (width, initial, minimum) = match lead {
        0x00..=0x7F => return Ok((u32::from(lead), 1)),
        0xC0..=0xDF => (2, u32::from(lead & 0x1F), 0x80),
        0xE0..=0xEF => (3, u32::from(lead & 0x0F), 0x800),
        0xF0..=0xF7 => (4, u32::from(lead & 0x07), 0x1_0000),
        _ => return Err(invalid()),
    };

    let tail = bytes.get(i + 1..i + width).ok_or_else(invalid)?;
    let mut cp = initial;
    for &byte in tail {
        if !is_continuation(byte) {
            return Err(invalid());
        }
        cp = (cp << 6) | u32::from(byte & 0x3F);
    }

    if cp < minimum || cp > 0x10_FFFF || (0xD800..=0xDFFF).contains(&cp) {
        return Err(invalid());
    }
    Ok((cp, width))
}

/// Strictly decode UTF-8 bytes into a `String`.
pub fn decode_utf8(bytes: &[u8], base: usize) -> Result<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let (cp, width) = next_code_point(bytes, i, base)?;
        // next_code_point already excluded surrogates and out-of-range values
        let ch = char::from_u32(cp).ok_or(CodecError::InvalidEncoding { offset: base + i })?;
        out.push(ch);
        i += width;
    }
    Ok(out)
}

/// Strictly decode UTF-8 bytes into UTF-16 code units.
pub fn utf8_to_utf16(bytes: &[u8], base: usize) -> Result<Vec<u16>> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let (cp, width) = next_code_point(bytes, i, base)?;
        if cp >= 0x1_0000 {
            let v = cp - 0x1_0000;
            out.push(0xD800 | (v >> 10) as u16);
            out.push(0xDC00 | (v & 0x3FF) as u16);
        } else {
            out.push(cp as u16);
        }
        i += width;
    }
    Ok(out)
}

/// Encode UTF-16 code units as UTF-8, joining surrogate pairs.
///
/// # Errors
/// Returns `CodecError::InvalidEncoding` with the code unit index of any
/// unpaired surrogate.
pub fn utf16_to_utf8(units: &[u16]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let unit = u32::from(units[i]);
        let cp = match unit {
            0xD800..=0xDBFF => {
                let low = units
                    .get(i + 1)
                    .map(|&u| u32::from(u))
                    .filter(|u| (0xDC00..=0xDFFF).contains(u))
                    .ok_or(CodecError::InvalidEncoding { offset: i })?;
                i += 1;
                0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(CodecError::InvalidEncoding { offset: i }),
            _ => unit,
        };
        push_utf8(&mut out, cp);
        i += 1;
    }
    Ok(out)
}

fn push_utf8(out: &mut Vec<u8>, cp: u32) {
    match cp {
        0..=0x7F => out.push(cp as u8),
        0x80..=0x7FF => {
            out.push(0xC0 | (cp >> 6) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        }
        0x800..=0xFFFF => {
            out.push(0xE0 | (cp >> 12) as u8);
            out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        }
        _ => {
            out.push(0xF0 | (cp >> 18) as u8);
            out.push(0x80 | ((cp >> 12) & 0x3F) as u8);
            out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        }
    }
}
