//! # bitfield
//!
//! Arbitrary-precision integers with slice-style bit access.
//!
//! A [Bitfield] wraps a big integer and lets you read, write and delete its
//! bits by index or by `start:stop:step` range, counting from the least
//! significant bit. A field is either dynamic (as long as its value) or pinned
//! to a width, in which case every read is masked to that many bits. Bitfields
//! otherwise behave like integers: arithmetic, comparison, hashing and
//! formatting all go through the underlying value.
//!
//! [chunk] splits a byte stream into fixed-width bitfields.
//!
//! ## Example
//!
//! ```
//! use bitfield::{Bitfield, BitRange};
//!
//! let mut b = Bitfield::new(0b1001);
//! b.set(1..3, 0b11).unwrap();
//! assert_eq!(b, 0b1111);
//!
//! assert_eq!(Bitfield::new(0b11001100).get(BitRange::from(1..).step(3)).unwrap(), 0b100);
//!
//! let mut b = Bitfield::new(0b1010);
//! b.delete(2).unwrap();
//! assert_eq!(b, 0b110);
//!
//! let fixed = Bitfield::with_width(0b0011, 4);
//! assert_eq!(fixed.len(), 4);
//! assert_eq!(fixed, Bitfield::new(3));
//! assert_eq!(format!("{:#b}", fixed.reversed()), "0b1100");
//! ```
//!
//! ## Features
//!
//! - `serde`: (de)serialize [Bitfield] as `{"value": "<integer>", "width": n}`
//!   and describe chunker settings with [serde::ChunkerDef].

pub mod bits;
pub mod chunker;
pub mod errors;
pub mod field;
pub mod integral;
pub mod key;
pub mod ops;
#[cfg(feature = "serde")]
pub mod serde;

pub use chunker::{Chunks, chunk};
pub use errors::{BitfieldError, ChunkError};
pub use field::{Bitfield, Bits};
pub use integral::Integral;
pub use key::{BitRange, Key};
pub use num::{BigInt, BigUint};
pub use ops::BinaryOp;
