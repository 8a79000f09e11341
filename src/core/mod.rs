//! # Core Buffer Components
//!
//! Low-level byte handling shared by every field codec.
//!
//! ## Components
//! - **Writer**: growable encode buffer with a doubling growth policy
//! - **Reader**: bounds-checked, forward-only decode cursor
//! - **Numeric**: wire type tags and little-endian number access
//! - **Wide**: 256-bit signed and unsigned integers
//!
//! ## Wire Format
//! ```text
//! integers, floats   little-endian, fixed width (1/2/4/8/16/32 bytes)
//! lengths, counts    u32 little-endian
//! ```

pub mod buffer;
pub mod cursor;
pub mod numeric;
pub mod wide;

pub use buffer::Writer;
pub use cursor::Reader;
pub use numeric::{Numeric, NumericType};
pub use wide::{I256, U256};
