//! Index keys: single bit positions and slice-style ranges.
//!
//! A [BitRange] selects positions from the sequence `0..len` the way slicing does:
//! negative bounds count from the end, omitted bounds default to the ends of
//! the sequence, and a negative step walks it backwards.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::errors::BitfieldError;

/// A key accepted by [crate::Bitfield::get], [crate::Bitfield::set] and
/// [crate::Bitfield::delete].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A single bit position; negative values count from the most significant end.
    Index(isize),
    /// A `start:stop:step` selection of positions.
    Range(BitRange),
}

/// Slice descriptor with optional `start`, `stop` and `step`.
///
/// ```
/// use bitfield::BitRange;
///
/// // [1::3]
/// let range = BitRange::from(1..).step(3);
/// assert_eq!(range.indices(8).unwrap(), vec![1, 4, 7]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitRange {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl BitRange {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        BitRange { start, stop, step }
    }

    /// `[:]`
    pub fn full() -> Self {
        BitRange::default()
    }

    /// `[::-1]`, the reverse-endianness form.
    pub fn reversed() -> Self {
        BitRange::full().step(-1)
    }

    /// Replaces the step.
    pub fn step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// True for `[::-1]` exactly (no bounds given).
    pub fn is_reverse(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && self.step == Some(-1)
    }

    /// Positions selected over a sequence of `len` bits, in visiting order.
    ///
    /// Negative bounds count from the end. A bound that still falls outside the
    /// sequence fails with [BitfieldError::IndexOutOfRange]; so does a `start`
    /// that is not a position when walking down. A zero step fails with
    /// [BitfieldError::UnsupportedKeyType]. In-range bounds that select nothing
    /// (`start >= stop` going up) give an empty list.
    pub fn indices(&self, len: usize) -> Result<Vec<usize>, BitfieldError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(BitfieldError::UnsupportedKeyType("range step cannot be zero"));
        }

        let (start, stop) = self.resolve(len, step)?;

        let mut out = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            out.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }

        Ok(out)
    }

    // -1 is the "before position 0" stop when walking down with no explicit stop.
    fn resolve(&self, len: usize, step: isize) -> Result<(isize, isize), BitfieldError> {
        let ilen = isize::try_from(len).map_err(|_| BitfieldError::Overflow("bitfield length"))?;
        let resolve = |bound: isize, last: isize| {
            let pos = if bound < 0 { bound + ilen } else { bound };
            if (0..=last).contains(&pos) {
                Ok(pos)
            } else {
                Err(BitfieldError::IndexOutOfRange { index: bound, len })
            }
        };

        let start = match self.start {
            Some(start) if step < 0 => resolve(start, ilen - 1)?,
            Some(start) => resolve(start, ilen)?,
            None if step < 0 => ilen - 1,
            None => 0,
        };
        let stop = match self.stop {
            Some(stop) => resolve(stop, ilen)?,
            None if step < 0 => -1,
            None => ilen,
        };

        Ok((start, stop))
    }
}

impl Key {
    /// Resolves an [Key::Index] to a position in `0..len`.
    pub(crate) fn normalize_index(index: isize, len: usize) -> Result<usize, BitfieldError> {
        let out_of_range = BitfieldError::IndexOutOfRange { index, len };
        let ilen = isize::try_from(len).map_err(|_| out_of_range.clone())?;
        if index >= ilen || index < -ilen {
            return Err(out_of_range);
        }

        Ok(if index < 0 { ilen + index } else { index } as usize)
    }
}

// Positions past isize::MAX cannot be in range; saturate so they fail as such.
fn to_bound<T: TryInto<isize>>(value: T) -> isize {
    value.try_into().unwrap_or(isize::MAX)
}

macro_rules! impl_key_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(value: $t) -> Self {
                    Key::Index(to_bound(value))
                }
            }

            impl From<Range<$t>> for Key {
                fn from(value: Range<$t>) -> Self {
                    Key::Range(value.into())
                }
            }

            impl From<RangeFrom<$t>> for Key {
                fn from(value: RangeFrom<$t>) -> Self {
                    Key::Range(value.into())
                }
            }

            impl From<RangeTo<$t>> for Key {
                fn from(value: RangeTo<$t>) -> Self {
                    Key::Range(value.into())
                }
            }

            impl From<Range<$t>> for BitRange {
                fn from(value: Range<$t>) -> Self {
                    BitRange::new(Some(to_bound(value.start)), Some(to_bound(value.end)), None)
                }
            }

            impl From<RangeFrom<$t>> for BitRange {
                fn from(value: RangeFrom<$t>) -> Self {
                    BitRange::new(Some(to_bound(value.start)), None, None)
                }
            }

            impl From<RangeTo<$t>> for BitRange {
                fn from(value: RangeTo<$t>) -> Self {
                    BitRange::new(None, Some(to_bound(value.end)), None)
                }
            }
        )*
    };
}

// i32 is what unsuffixed literals fall back to.
impl_key_from!(isize, i32, usize);

impl From<BitRange> for Key {
    fn from(value: BitRange) -> Self {
        Key::Range(value)
    }
}

impl From<RangeFull> for Key {
    fn from(_: RangeFull) -> Self {
        Key::Range(BitRange::full())
    }
}

impl From<RangeFull> for BitRange {
    fn from(_: RangeFull) -> Self {
        BitRange::full()
    }
}
