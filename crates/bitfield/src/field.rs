//! The [Bitfield] value type: an integer with slice-style bit access.

use std::{borrow::Cow, fmt};

use num::{BigInt, BigUint, Zero};

use crate::{
    bits,
    errors::BitfieldError,
    integral::Integral,
    key::Key,
};

/// An arbitrary-precision integer addressable bit by bit.
///
/// Bit 0 is the least significant bit. Without a width the field is as long as
/// its value's bit length; with a width every read of the value is masked to
/// the low `width` bits and [Bitfield::len] reports `width`.
///
/// Negative values are infinite two's-complement bit strings. Their dynamic
/// length is the bit length of the magnitude, and masking to a width always
/// yields a non-negative value.
///
/// ```
/// use bitfield::{Bitfield, BitRange};
///
/// let mut b = Bitfield::new(0b11001010);
/// assert_eq!(b.get(..4).unwrap(), 0b1010);
/// assert_eq!(b.get(4..).unwrap(), 0b1100);
/// assert_eq!(b.get(BitRange::reversed()).unwrap(), 0b01010011);
///
/// b.set(BitRange::from(1..).step(2), 0b1000).unwrap();
/// assert_eq!(b, 0b11000000);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(::serde::Serialize, ::serde::Deserialize),
    serde(try_from = "crate::serde::BitfieldDef", into = "crate::serde::BitfieldDef")
)]
pub struct Bitfield {
    pub(crate) value: BigInt,
    width: Option<usize>,
}

impl Bitfield {
    /// Creates a dynamic-width bitfield.
    pub fn new(value: impl Into<BigInt>) -> Self {
        Bitfield {
            value: value.into(),
            width: None,
        }
    }

    /// Creates a bitfield pinned to `width` bits.
    pub fn with_width(value: impl Into<BigInt>, width: usize) -> Self {
        Bitfield {
            value: value.into(),
            width: Some(width),
        }
    }

    /// The value as seen through the width mask.
    pub fn value(&self) -> BigInt {
        self.masked().into_owned()
    }

    /// The stored value, before any width mask.
    pub fn raw_value(&self) -> &BigInt {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<BigInt>) {
        self.value = value.into();
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Pins (`Some`) or releases (`None`) the width. The stored value is left
    /// untouched; masking applies on the next read.
    pub fn set_width(&mut self, width: Option<usize>) {
        log::trace!("bitfield width {:?} -> {:?}", self.width, width);
        self.width = width;
    }

    pub fn is_fixed_width(&self) -> bool {
        self.width.is_some()
    }

    /// Number of addressable bits.
    pub fn len(&self) -> usize {
        match self.width {
            Some(width) => width,
            None => bits::bit_length(&self.value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn masked(&self) -> Cow<'_, BigInt> {
        match self.width {
            Some(width) => Cow::Owned(bits::truncate(&self.value, width)),
            None => Cow::Borrowed(&self.value),
        }
    }

    /// Reads the bit or bits selected by `key`.
    ///
    /// An index yields a one-bit field. A range packs the selected bits, in
    /// visiting order, into a new dynamic-width field starting at bit 0.
    pub fn get(&self, key: impl Into<Key>) -> Result<Bitfield, BitfieldError> {
        let len = self.len();
        let value = self.masked();

        match key.into() {
            Key::Index(index) => {
                let pos = Key::normalize_index(index, len)?;
                Ok(Bitfield::new(bits::read_bit_at(&value, pos)))
            }
            Key::Range(range) if range.is_reverse() => {
                Ok(Bitfield::new(bits::reverse_bits_n(&value, len)))
            }
            Key::Range(range) => {
                let positions = range.indices(len)?;
                Ok(Bitfield::new(bits::gather(&value, &positions)))
            }
        }
    }

    /// Reads a single bit as a `bool`.
    pub fn bit(&self, index: isize) -> Result<bool, BitfieldError> {
        let pos = Key::normalize_index(index, self.len())?;
        Ok(self.masked().bit(pos as u64))
    }

    /// Writes `value` into the bit or bits selected by `key`.
    ///
    /// For a range, bit 0 of `value` goes to the first selected position, bit 1
    /// to the second, and so on. Surplus input bits are dropped; positions
    /// without an input bit are cleared.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Integral) -> Result<(), BitfieldError> {
        let len = self.len();
        let input = value.to_integer();

        match key.into() {
            Key::Index(index) => {
                let pos = Key::normalize_index(index, len)?;
                let mut value = self.masked().into_owned();
                value.set_bit(pos as u64, input.bit(0));
                self.value = value;
            }
            Key::Range(range) => {
                let positions = range.indices(len)?;
                let (expanded, mask) = bits::scatter(&input, &positions);
                let value = (&*self.masked() & !mask) | expanded;
                self.value = value;
            }
        }

        Ok(())
    }

    /// Removes the bit or bits selected by `key`, shifting the higher bits down
    /// to close the gap. The width, if any, is not changed.
    pub fn delete(&mut self, key: impl Into<Key>) -> Result<(), BitfieldError> {
        let len = self.len();

        match key.into() {
            Key::Index(index) => {
                let pos = Key::normalize_index(index, len)?;
                let value = {
                    let value = self.masked();
                    let low = bits::truncate(&value, pos);
                    let high = bits::truncate(&(&*value >> (pos + 1)), len - pos - 1) << pos;
                    high | low
                };
                self.value = value;
            }
            Key::Range(range) => {
                let selected = range.indices(len)?;
                let mut keep = vec![true; len];
                for &pos in &selected {
                    keep[pos] = false;
                }
                let survivors: Vec<usize> = (0..len).filter(|&pos| keep[pos]).collect();

                log::trace!("deleting {} of {} bits", selected.len(), len);
                let value = bits::gather(&self.masked(), &survivors);
                self.value = value;
            }
        }

        Ok(())
    }

    /// Bit reversal over the full `len()`-bit representation, same as `[::-1]`.
    pub fn reversed(&self) -> Bitfield {
        Bitfield::new(bits::reverse_bits_n(&self.masked(), self.len()))
    }

    /// Iterates the bits LSB first as one-bit fields.
    pub fn iter(&self) -> Bits<'_> {
        Bits {
            field: self,
            pos: 0,
            len: self.len(),
        }
    }

    /// The (masked) value as an integer.
    pub fn to_integer(&self) -> BigInt {
        self.value()
    }

    /// The (masked) value as digits in `radix`, without prefix.
    ///
    /// # Panics
    ///
    /// Panics if `radix` is not in `2..=36`, like [BigInt::to_str_radix].
    pub fn format_radix(&self, radix: u32) -> String {
        self.masked().to_str_radix(radix)
    }

    /// True if the (masked) value is zero.
    pub fn is_zero(&self) -> bool {
        self.masked().is_zero()
    }
}

/// Iterator over the bits of a [Bitfield], least significant first.
pub struct Bits<'a> {
    field: &'a Bitfield,
    pos: usize,
    len: usize,
}

impl Iterator for Bits<'_> {
    type Item = Bitfield;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.len {
            return None;
        }

        let bit = bits::read_bit_at(&self.field.masked(), self.pos);
        self.pos += 1;
        Some(Bitfield::new(bit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}

impl<'a> IntoIterator for &'a Bitfield {
    type Item = Bitfield;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Bitfield {
                fn from(value: $t) -> Self {
                    Bitfield::new(value)
                }
            }

            impl TryFrom<&Bitfield> for $t {
                type Error = BitfieldError;

                fn try_from(value: &Bitfield) -> Result<Self, Self::Error> {
                    <$t>::try_from(value.value()).map_err(|_| BitfieldError::Overflow("bitfield value"))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Bitfield {
    fn from(value: BigInt) -> Self {
        Bitfield::new(value)
    }
}

impl From<BigUint> for Bitfield {
    fn from(value: BigUint) -> Self {
        Bitfield::new(value)
    }
}

impl From<Bitfield> for BigInt {
    fn from(value: Bitfield) -> Self {
        value.value()
    }
}

impl From<&Bitfield> for BigInt {
    fn from(value: &Bitfield) -> Self {
        value.value()
    }
}

impl fmt::Display for Bitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.masked(), f)
    }
}

impl fmt::Binary for Bitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&*self.masked(), f)
    }
}

impl fmt::Octal for Bitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Octal::fmt(&*self.masked(), f)
    }
}

impl fmt::LowerHex for Bitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&*self.masked(), f)
    }
}

impl fmt::UpperHex for Bitfield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&*self.masked(), f)
    }
}
