//! Serializable descriptions of bitfields and chunker settings.
//!
//! Values travel as strings so that integers wider than any JSON number survive
//! the round trip. Decimal is the default; `0b`, `0o` and `0x` prefixes are
//! accepted on input, with an optional leading `-`.

use std::fmt;

use num::{BigInt, Num};
use serde::{Deserialize, Serialize};

use crate::{
    chunker::{self, Chunks},
    errors::ChunkError,
    field::Bitfield,
};

/// Wire form of a [Bitfield].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BitfieldDef {
    /// Integer value as a (possibly prefixed) string.
    pub value: String,
    /// Pinned width in bits; absent for a dynamic-width field.
    #[serde(default)]
    pub width: Option<usize>,
}

/// Settings for splitting byte sources into chunks.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerDef {
    pub chunk_width: usize,
}

impl ChunkerDef {
    pub fn chunks(&self, bytes: &[u8]) -> Result<Chunks, ChunkError> {
        Chunks::from_bytes(bytes, self.chunk_width)
    }

    pub fn read<R: std::io::Read>(&self, source: R) -> Result<Chunks, ChunkError> {
        chunker::chunk(source, self.chunk_width)
    }
}

/// A [BitfieldDef] whose value is not an integer literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue(pub String);

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid integer literal: {:?}", self.0)
    }
}

impl std::error::Error for InvalidValue {}

fn parse_integer(text: &str) -> Result<BigInt, InvalidValue> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let lower = digits.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else {
        (10, lower.as_str())
    };

    let digits = digits.replace('_', "");
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(InvalidValue(text.to_string()));
    }

    let magnitude =
        BigInt::from_str_radix(&digits, radix).map_err(|_| InvalidValue(text.to_string()))?;

    Ok(if negative { -magnitude } else { magnitude })
}

impl TryFrom<BitfieldDef> for Bitfield {
    type Error = InvalidValue;

    fn try_from(value: BitfieldDef) -> Result<Self, Self::Error> {
        let integer = parse_integer(&value.value)?;
        Ok(match value.width {
            Some(width) => Bitfield::with_width(integer, width),
            None => Bitfield::new(integer),
        })
    }
}

impl From<Bitfield> for BitfieldDef {
    fn from(value: Bitfield) -> Self {
        BitfieldDef {
            value: value.to_integer().to_string(),
            width: value.width(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("10").unwrap(), BigInt::from(10));
        assert_eq!(parse_integer("0b1010").unwrap(), BigInt::from(10));
        assert_eq!(parse_integer("0XfF").unwrap(), BigInt::from(255));
        assert_eq!(parse_integer("-0o17").unwrap(), BigInt::from(-15));
        assert_eq!(parse_integer("1_000").unwrap(), BigInt::from(1000));
    }

    #[test]
    fn test_parse_integer_invalid() {
        assert!(parse_integer("").is_err());
        assert!(parse_integer("0x").is_err());
        assert!(parse_integer("--1").is_err());
        assert!(parse_integer("0b102").is_err());
    }

    #[test]
    fn test_bitfield_json() {
        let b = Bitfield::with_width(0b0011, 4);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, r#"{"value":"3","width":4}"#);

        let back: Bitfield = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
        assert_eq!(back.width(), Some(4));
    }

    #[test]
    fn test_bitfield_json_big_value() {
        let back: Bitfield =
            serde_json::from_str(r#"{"value":"0x1_0000_0000_0000_0000_0000"}"#).unwrap();
        assert_eq!(back.len(), 81);
        assert_eq!(back.width(), None);
    }

    #[test]
    fn test_bitfield_json_invalid() {
        let err = serde_json::from_str::<Bitfield>(r#"{"value":"ten"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid integer literal"));
    }

    #[test]
    fn test_chunker_def() {
        let def: ChunkerDef = serde_json::from_str(r#"{"chunk_width":4}"#).unwrap();
        let chunks: Vec<Bitfield> = def.chunks(&[0xAB]).unwrap().collect();
        assert_eq!(chunks, vec![0b1011, 0b1010]);

        let chunks: Vec<Bitfield> = def.read(&[0x0Fu8][..]).unwrap().collect();
        assert_eq!(chunks, vec![0b1111]);
    }
}
