//! Low-level bit manipulation over arbitrary-precision integers.
//!
//! Bits are addressed LSB-first: bit 0 is the least significant bit. Negative
//! integers are treated as infinite two's-complement bit strings.

use num::{BigInt, One, Zero};

/// Number of bits needed to represent `|value|` (0 for zero).
pub fn bit_length(value: &BigInt) -> usize {
    value.bits() as usize
}

/// `2^n - 1`: a mask covering the low `n` bits.
pub fn low_mask(n: usize) -> BigInt {
    (BigInt::one() << n) - 1
}

/// Keeps the low `n` bits of `value`. Always non-negative.
pub fn truncate(value: &BigInt, n: usize) -> BigInt {
    value & low_mask(n)
}

/// Reads the bit at `pos`. Returns 0 or 1.
pub fn read_bit_at(value: &BigInt, pos: usize) -> u8 {
    value.bit(pos as u64) as u8
}

/// Collects `value`'s bits at `positions`, packing the i-th visited position
/// into bit i of the result.
pub fn gather(value: &BigInt, positions: &[usize]) -> BigInt {
    let mut out = BigInt::zero();
    for (new_pos, &old_pos) in positions.iter().enumerate() {
        if value.bit(old_pos as u64) {
            out.set_bit(new_pos as u64, true);
        }
    }

    out
}

/// Inverse of [gather]: bit i of `input` lands at `positions[i]`. Also returns the
/// mask of every destination position, so callers can clear them first.
///
/// Positions past the number of input bits receive 0; input bits past the
/// number of positions are dropped.
pub fn scatter(input: &BigInt, positions: &[usize]) -> (BigInt, BigInt) {
    let mut expanded = BigInt::zero();
    let mut mask = BigInt::zero();
    for (val_pos, &new_pos) in positions.iter().enumerate() {
        mask.set_bit(new_pos as u64, true);
        if input.bit(val_pos as u64) {
            expanded.set_bit(new_pos as u64, true);
        }
    }

    (expanded, mask)
}

/// Reverses the low `n` bits of `x` (bit 0 becomes bit `n - 1` of the result).
pub fn reverse_bits_n(x: &BigInt, n: usize) -> BigInt {
    let mut r = BigInt::zero();
    for i in 0..n {
        if x.bit(i as u64) {
            r.set_bit((n - 1 - i) as u64, true);
        }
    }

    r
}
