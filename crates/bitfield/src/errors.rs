//! Error types for bit indexing, operator coercion and chunking.

use std::fmt;

/// Errors produced by [crate::Bitfield] indexing and by the fallible operator path
/// ([crate::Bitfield::apply]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitfieldError {
    /// Integer key outside `-len..len`, or a range whose `stop` is past the end.
    IndexOutOfRange { index: isize, len: usize },
    /// Operand is neither a bitfield nor an integer-like value.
    UnsupportedOperand {
        op: &'static str,
        operand: &'static str,
    },
    /// Key cannot be interpreted (e.g. a range with a zero step).
    UnsupportedKeyType(&'static str),
    /// Floor division, modulo or modular exponentiation by zero.
    DivisionByZero,
    /// Shift by a negative amount.
    NegativeShiftCount,
    /// Integer power with a negative exponent.
    NegativeExponent,
    /// Result or intermediate does not fit the native representation.
    Overflow(&'static str),
}

impl fmt::Display for BitfieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitfieldError::IndexOutOfRange { index, len } => {
                write!(f, "bitfield index {index} out of range for length {len}")
            }
            BitfieldError::UnsupportedOperand { op, operand } => {
                write!(f, "unsupported operand type(s) for {op}: Bitfield and {operand}")
            }
            BitfieldError::UnsupportedKeyType(reason) => {
                write!(f, "unsupported index: {reason}")
            }
            BitfieldError::DivisionByZero => f.write_str("integer division or modulo by zero"),
            BitfieldError::NegativeShiftCount => f.write_str("negative shift count"),
            BitfieldError::NegativeExponent => f.write_str("negative exponent"),
            BitfieldError::Overflow(what) => write!(f, "{what} too large"),
        }
    }
}

impl std::error::Error for BitfieldError {}

/// Errors produced when building a [crate::chunker::Chunks] sequence.
#[derive(Debug)]
pub enum ChunkError {
    /// Chunk width of zero would never consume the source.
    ZeroWidth,
    /// Reading the byte source failed.
    Io(std::io::Error),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::ZeroWidth => f.write_str("chunk width must be at least one bit"),
            ChunkError::Io(err) => write!(f, "failed to read chunk source: {err}"),
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::Io(err) => Some(err),
            ChunkError::ZeroWidth => None,
        }
    }
}

impl From<std::io::Error> for ChunkError {
    fn from(value: std::io::Error) -> Self {
        ChunkError::Io(value)
    }
}
