//! 256-bit integers.
//!
//! Unsigned 256-bit values use [`primitive_types::U256`]. The signed
//! counterpart [`I256`] stores the two's-complement bit pattern in a `U256`,
//! which is exactly the little-endian layout written on the wire.

use crate::error::CodecError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub use primitive_types::U256;

/// Signed 256-bit integer in two's complement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256(U256);

impl I256 {
    pub const ZERO: I256 = I256(U256([0; 4]));

    /// Largest value, `2^255 - 1`.
    pub fn max_value() -> Self {
        I256(U256::MAX >> 1usize)
    }

    /// Smallest value, `-2^255`.
    pub fn min_value() -> Self {
        I256(U256::one() << 255usize)
    }

    /// Reinterpret a raw two's-complement bit pattern.
    pub const fn from_bits(bits: U256) -> Self {
        I256(bits)
    }

    pub const fn to_bits(self) -> U256 {
        self.0
    }

    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        I256(U256::from_little_endian(&bytes))
    }

    pub fn to_le_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        self.0.to_little_endian(&mut bytes);
        bytes
    }

    pub fn is_negative(&self) -> bool {
        self.0.bit(255)
    }

    /// Magnitude as an unsigned value. `min_value()` maps to `2^255`.
    pub fn unsigned_abs(&self) -> U256 {
        if self.is_negative() {
            negate(self.0)
        } else {
            self.0
        }
    }

    pub fn from_i128(value: i128) -> Self {
        let magnitude = U256::from(value.unsigned_abs());
        if value < 0 {
            I256(negate(magnitude))
        } else {
            I256(magnitude)
        }
    }

    /// Narrow to `i128`, or `None` when the value does not fit.
    pub fn to_i128(&self) -> Option<i128> {
        let magnitude = self.unsigned_abs();
        if self.is_negative() {
            if magnitude.bits() <= 127 {
                Some(-(magnitude.low_u128() as i128))
            } else if magnitude == U256::one() << 127usize {
                Some(i128::MIN)
            } else {
                None
            }
        } else if magnitude.bits() <= 127 {
            Some(magnitude.low_u128() as i128)
        } else {
            None
        }
    }
}

fn negate(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            // same sign: two's complement bit patterns order like the values
            _ => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        I256::from_i128(value)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        I256::from_i128(value as i128)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.unsigned_abs())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I256({self})")
    }
}

impl FromStr for I256 {
    type Err = CodecError;

    /// Parse a decimal string with an optional leading `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CodecError::type_mismatch("decimal i256", s);
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let magnitude = U256::from_dec_str(digits).map_err(|_| invalid())?;
        let limit = U256::one() << 255usize;
        if negative {
            if magnitude > limit {
                return Err(invalid());
            }
            Ok(I256(negate(magnitude)))
        } else {
            if magnitude >= limit {
                return Err(invalid());
            }
            Ok(I256(magnitude))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i128_roundtrip_edges() {
        for v in [0i128, 1, -1, 42, -42, i128::MAX, i128::MIN] {
            assert_eq!(I256::from_i128(v).to_i128(), Some(v), "value {v}");
        }
        assert_eq!(I256::max_value().to_i128(), None);
        assert_eq!(I256::min_value().to_i128(), None);
    }

    #[test]
    fn test_minus_one_is_all_ones() {
        assert_eq!(I256::from_i128(-1).to_le_bytes(), [0xFF; 32]);
    }

    #[test]
    fn test_ordering() {
        let mut values = vec![
            I256::from_i128(5),
            I256::min_value(),
            I256::from_i128(-3),
            I256::max_value(),
            I256::ZERO,
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                I256::min_value(),
                I256::from_i128(-3),
                I256::ZERO,
                I256::from_i128(5),
                I256::max_value(),
            ]
        );
    }

    #[test]
    fn test_decimal_parse_and_display() {
        let min = "-57896044618658097711785492504343953926634992332820282019728792003956564819968";
        let parsed: I256 = min.parse().expect("min parses");
        assert_eq!(parsed, I256::min_value());
        assert_eq!(parsed.to_string(), min);

        assert_eq!("-17".parse::<I256>(), Ok(I256::from_i128(-17)));
        assert!("57896044618658097711785492504343953926634992332820282019728792003956564819968"
            .parse::<I256>()
            .is_err());
        assert!("12a".parse::<I256>().is_err());
        assert!("-".parse::<I256>().is_err());
    }
}
