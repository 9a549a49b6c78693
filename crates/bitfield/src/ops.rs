//! Integer arithmetic, comparison and hashing for [Bitfield].
//!
//! Every operator reads the (masked) value of the bitfield, applies the native
//! big-integer operation, and wraps the result in a new dynamic-width field.
//! Assignment forms store the result back into the same field.
//!
//! `/` and `%` follow floor semantics (the quotient rounds toward negative
//! infinity, the remainder takes the sign of the divisor). True division is
//! [Bitfield::true_div].
//!
//! # Panics
//!
//! The `std::ops` impls panic where a primitive integer would: division by
//! zero, and shifts by a negative or oversized amount. [Bitfield::apply] is the
//! non-panicking path and also accepts operands of any type, reporting
//! [BitfieldError::UnsupportedOperand] for non-integers.

use std::{
    any::Any,
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::{
        Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
        DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
        SubAssign,
    },
};

use num::{BigInt, BigUint, Integer, Signed, ToPrimitive, Zero};

use crate::{
    errors::BitfieldError,
    field::Bitfield,
    integral::{Integral, coerce_operand},
};

/// Binary integer operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Division rounding toward negative infinity.
    FloorDiv,
    /// Remainder with the sign of the divisor.
    Mod,
    Pow,
    Shl,
    Shr,
    And,
    Xor,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::Xor => "^",
            BinaryOp::Or => "|",
        }
    }

    pub fn assign_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+=",
            BinaryOp::Sub => "-=",
            BinaryOp::Mul => "*=",
            BinaryOp::FloorDiv => "//=",
            BinaryOp::Mod => "%=",
            BinaryOp::Pow => "**=",
            BinaryOp::Shl => "<<=",
            BinaryOp::Shr => ">>=",
            BinaryOp::And => "&=",
            BinaryOp::Xor => "^=",
            BinaryOp::Or => "|=",
        }
    }

    /// Applies the operator to two integers.
    pub fn eval(self, lhs: &BigInt, rhs: &BigInt) -> Result<BigInt, BitfieldError> {
        Ok(match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::FloorDiv => {
                if rhs.is_zero() {
                    return Err(BitfieldError::DivisionByZero);
                }
                lhs.div_floor(rhs)
            }
            BinaryOp::Mod => {
                if rhs.is_zero() {
                    return Err(BitfieldError::DivisionByZero);
                }
                lhs.mod_floor(rhs)
            }
            BinaryOp::Pow => {
                if rhs.is_negative() {
                    return Err(BitfieldError::NegativeExponent);
                }
                let exp = rhs.to_u32().ok_or(BitfieldError::Overflow("exponent"))?;
                lhs.pow(exp)
            }
            BinaryOp::Shl => lhs << shift_count(rhs)?,
            BinaryOp::Shr => match shift_count(rhs) {
                Ok(n) => lhs >> n,
                // Shifting out every bit leaves only the sign.
                Err(BitfieldError::Overflow(_)) if lhs.is_negative() => BigInt::from(-1),
                Err(BitfieldError::Overflow(_)) => BigInt::zero(),
                Err(err) => return Err(err),
            },
            BinaryOp::And => lhs & rhs,
            BinaryOp::Xor => lhs ^ rhs,
            BinaryOp::Or => lhs | rhs,
        })
    }
}

fn shift_count(rhs: &BigInt) -> Result<usize, BitfieldError> {
    if rhs.is_negative() {
        return Err(BitfieldError::NegativeShiftCount);
    }
    rhs.to_usize().ok_or(BitfieldError::Overflow("shift count"))
}

fn eval_or_panic(op: BinaryOp, lhs: &BigInt, rhs: &BigInt) -> BigInt {
    match op.eval(lhs, rhs) {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

fn float_div(lhs: &BigInt, rhs: &BigInt) -> Result<f64, BitfieldError> {
    if rhs.is_zero() {
        return Err(BitfieldError::DivisionByZero);
    }
    let lhs = lhs.to_f64().ok_or(BitfieldError::Overflow("integer"))?;
    let rhs = rhs.to_f64().ok_or(BitfieldError::Overflow("integer"))?;
    Ok(lhs / rhs)
}

impl Bitfield {
    /// Applies `op` with an operand of any type, returning a new dynamic-width field.
    ///
    /// ```
    /// use bitfield::{Bitfield, BinaryOp, BitfieldError};
    ///
    /// let b = Bitfield::new(0b0011);
    /// assert_eq!(b.apply(BinaryOp::Add, &0b1100).unwrap(), 0b1111);
    /// assert!(matches!(
    ///     b.apply(BinaryOp::Add, &1.5),
    ///     Err(BitfieldError::UnsupportedOperand { op: "+", operand: "f64" })
    /// ));
    /// ```
    pub fn apply<T: Any>(&self, op: BinaryOp, operand: &T) -> Result<Bitfield, BitfieldError> {
        let rhs = coerce_operand(op.symbol(), operand)?;
        Ok(Bitfield::new(op.eval(&self.masked(), &rhs)?))
    }

    /// In-place form of [Bitfield::apply]. The width is kept.
    pub fn apply_assign<T: Any>(
        &mut self,
        op: BinaryOp,
        operand: &T,
    ) -> Result<&mut Self, BitfieldError> {
        let rhs = coerce_operand(op.assign_symbol(), operand)?;
        let value = op.eval(&self.masked(), &rhs)?;
        self.value = value;
        Ok(self)
    }

    /// Applies `op` with `operand` on the left and this field on the right.
    ///
    /// ```
    /// use bitfield::{Bitfield, BinaryOp};
    ///
    /// let b = Bitfield::new(3);
    /// assert_eq!(b.apply_reflected(BinaryOp::Pow, &2).unwrap(), 8);
    /// assert_eq!(b.apply_reflected(BinaryOp::Shl, &1u8).unwrap(), 8);
    /// ```
    pub fn apply_reflected<T: Any>(
        &self,
        op: BinaryOp,
        operand: &T,
    ) -> Result<Bitfield, BitfieldError> {
        let lhs = coerce_operand(op.symbol(), operand)?;
        Ok(Bitfield::new(op.eval(&lhs, &self.masked())?))
    }

    /// Division producing a float, since the quotient of two integers need not be one.
    pub fn true_div<T: Any>(&self, operand: &T) -> Result<f64, BitfieldError> {
        let rhs = coerce_operand("/", operand)?;
        float_div(&self.masked(), &rhs)
    }

    /// [Bitfield::true_div] with `operand` as the dividend.
    pub fn rtrue_div<T: Any>(&self, operand: &T) -> Result<f64, BitfieldError> {
        let lhs = coerce_operand("/", operand)?;
        float_div(&lhs, &self.masked())
    }

    /// Comparison against an operand of any type. Non-integers are never equal.
    pub fn eq_any<T: Any>(&self, other: &T) -> bool {
        coerce_operand("==", other).is_ok_and(|rhs| *self.masked() == rhs)
    }

    pub fn pow(&self, exp: impl Integral) -> Result<Bitfield, BitfieldError> {
        let value = BinaryOp::Pow.eval(&self.masked(), &exp.to_integer())?;
        Ok(Bitfield::new(value))
    }

    /// `self ** exp % modulus`, with the result taking the sign of `modulus`.
    pub fn pow_mod(
        &self,
        exp: impl Integral,
        modulus: impl Integral,
    ) -> Result<Bitfield, BitfieldError> {
        let exp = exp.to_integer();
        let modulus = modulus.to_integer();
        if exp.is_negative() {
            return Err(BitfieldError::NegativeExponent);
        }
        if modulus.is_zero() {
            return Err(BitfieldError::DivisionByZero);
        }
        Ok(Bitfield::new(self.masked().modpow(&exp, &modulus)))
    }

    pub fn abs(&self) -> Bitfield {
        Bitfield::new(self.masked().abs())
    }

    /// Unary plus: a dynamic-width copy of the value.
    pub fn pos(&self) -> Bitfield {
        Bitfield::new(self.value())
    }
}

macro_rules! forward_binop {
    ($Trait:ident, $method:ident, $AssignTrait:ident, $assign_method:ident, $op:expr) => {
        impl<T: Integral> $Trait<T> for &Bitfield {
            type Output = Bitfield;

            fn $method(self, rhs: T) -> Bitfield {
                Bitfield::new(eval_or_panic($op, &self.masked(), &rhs.to_integer()))
            }
        }

        impl<T: Integral> $Trait<T> for Bitfield {
            type Output = Bitfield;

            fn $method(self, rhs: T) -> Bitfield {
                (&self).$method(rhs)
            }
        }

        impl<T: Integral> $AssignTrait<T> for Bitfield {
            fn $assign_method(&mut self, rhs: T) {
                let value = eval_or_panic($op, &self.masked(), &rhs.to_integer());
                self.value = value;
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign, BinaryOp::Add);
forward_binop!(Sub, sub, SubAssign, sub_assign, BinaryOp::Sub);
forward_binop!(Mul, mul, MulAssign, mul_assign, BinaryOp::Mul);
forward_binop!(Div, div, DivAssign, div_assign, BinaryOp::FloorDiv);
forward_binop!(Rem, rem, RemAssign, rem_assign, BinaryOp::Mod);
forward_binop!(Shl, shl, ShlAssign, shl_assign, BinaryOp::Shl);
forward_binop!(Shr, shr, ShrAssign, shr_assign, BinaryOp::Shr);
forward_binop!(BitAnd, bitand, BitAndAssign, bitand_assign, BinaryOp::And);
forward_binop!(BitXor, bitxor, BitXorAssign, bitxor_assign, BinaryOp::Xor);
forward_binop!(BitOr, bitor, BitOrAssign, bitor_assign, BinaryOp::Or);

// Integer on the left, bitfield on the right.
macro_rules! reflected_binops {
    (@op $t:ty, $Trait:ident, $method:ident, $op:expr) => {
        impl $Trait<Bitfield> for $t {
            type Output = Bitfield;

            fn $method(self, rhs: Bitfield) -> Bitfield {
                self.$method(&rhs)
            }
        }

        impl $Trait<&Bitfield> for $t {
            type Output = Bitfield;

            fn $method(self, rhs: &Bitfield) -> Bitfield {
                Bitfield::new(eval_or_panic($op, &self.to_integer(), &rhs.masked()))
            }
        }
    };
    ($($t:ty),*) => {
        $(
            reflected_binops!(@op $t, Add, add, BinaryOp::Add);
            reflected_binops!(@op $t, Sub, sub, BinaryOp::Sub);
            reflected_binops!(@op $t, Mul, mul, BinaryOp::Mul);
            reflected_binops!(@op $t, Div, div, BinaryOp::FloorDiv);
            reflected_binops!(@op $t, Rem, rem, BinaryOp::Mod);
            reflected_binops!(@op $t, Shl, shl, BinaryOp::Shl);
            reflected_binops!(@op $t, Shr, shr, BinaryOp::Shr);
            reflected_binops!(@op $t, BitAnd, bitand, BinaryOp::And);
            reflected_binops!(@op $t, BitXor, bitxor, BinaryOp::Xor);
            reflected_binops!(@op $t, BitOr, bitor, BinaryOp::Or);

            impl PartialEq<Bitfield> for $t {
                fn eq(&self, other: &Bitfield) -> bool {
                    other == self
                }
            }

            impl PartialOrd<Bitfield> for $t {
                fn partial_cmp(&self, other: &Bitfield) -> Option<Ordering> {
                    other.partial_cmp(self).map(Ordering::reverse)
                }
            }
        )*
    };
}

reflected_binops!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, BigInt, BigUint
);

impl Neg for &Bitfield {
    type Output = Bitfield;

    fn neg(self) -> Bitfield {
        Bitfield::new(-&*self.masked())
    }
}

impl Neg for Bitfield {
    type Output = Bitfield;

    fn neg(self) -> Bitfield {
        -&self
    }
}

/// Two's-complement inversion, `-(x + 1)`.
impl Not for &Bitfield {
    type Output = Bitfield;

    fn not(self) -> Bitfield {
        Bitfield::new(!&*self.masked())
    }
}

impl Not for Bitfield {
    type Output = Bitfield;

    fn not(self) -> Bitfield {
        !&self
    }
}

/// Equality is by value only; the width does not take part.
impl<T: Integral> PartialEq<T> for Bitfield {
    fn eq(&self, other: &T) -> bool {
        *self.masked() == other.to_integer()
    }
}

impl Eq for Bitfield {}

impl<T: Integral> PartialOrd<T> for Bitfield {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        Some(BigInt::cmp(&self.masked(), &other.to_integer()))
    }
}

impl Ord for Bitfield {
    fn cmp(&self, other: &Self) -> Ordering {
        self.masked().cmp(&other.masked())
    }
}

/// Hashes exactly like the [BigInt] value, so a bitfield and an equal [BigInt]
/// land in the same bucket.
impl Hash for Bitfield {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.masked().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, hash_map::DefaultHasher};

    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality() {
        let a = Bitfield::new(0b0011);
        let b = Bitfield::new(0b1100);

        assert_eq!(a, 0b0011);
        assert_ne!(a, 0b1100);
        assert_eq!(0b0011, a);
        assert_eq!(Bitfield::new(0b1), true);
        assert_ne!(Bitfield::new(0b0), true);
        assert_eq!(a, Bitfield::new(0b0011));
        assert_ne!(a, b);
        assert!(!a.eq_any(&vec![0, 0, 1, 1]));
        assert!(a.eq_any(&3u64));
    }

    #[test]
    fn test_equality_ignores_width() {
        let fixed = Bitfield::with_width(0b0011, 4);
        assert_eq!(fixed, Bitfield::new(0b0011));
        assert_eq!(fixed, 3);
        assert_eq!(hash_of(&fixed), hash_of(&Bitfield::new(3)));
    }

    #[test]
    fn test_ordering() {
        let a = Bitfield::new(3);
        let b = Bitfield::with_width(0xff, 4);
        assert!(a < b);
        assert!(a > 2);
        assert!(4u8 > a);
        assert_eq!(a.cmp(&Bitfield::new(3)), Ordering::Equal);
    }

    #[test]
    fn test_hash_matches_bigint() {
        let b = Bitfield::new(0b1010);
        assert_eq!(hash_of(&b), hash_of(&BigInt::from(10)));

        let mut set = HashSet::new();
        set.insert(Bitfield::new(10));
        set.insert(Bitfield::with_width(0b11010, 4));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_add() {
        let a = Bitfield::new(0b0011);
        let b = Bitfield::new(0b1100);

        assert_eq!(&a + &b, 0b1111);
        assert_eq!(&a + 0b1100, 0b1111);
        assert_eq!(0b1100 + &a, 0b1111);
        let sum: Bitfield = a + b;
        assert_eq!(sum.width(), None);
    }

    #[test]
    fn test_arithmetic() {
        let a = Bitfield::new(7);
        assert_eq!(&a - 10, -3);
        assert_eq!(10 - &a, 3);
        assert_eq!(&a * 3, 21);
        assert_eq!(&a / 2, 3);
        assert_eq!(&a % 4, 3);
        assert_eq!(-7 / Bitfield::new(2), -4);
        assert_eq!(-7 % Bitfield::new(2), 1);
        assert_eq!(&a << 2, 28);
        assert_eq!(&a >> 1, 3);
        assert_eq!(&a & 0b101, 0b101);
        assert_eq!(&a | 0b1000, 0b1111);
        assert_eq!(&a ^ 0b1, 0b110);
        assert_eq!(&a + Bitfield::new(1), 8);
    }

    #[test]
    fn test_reflected_shifts() {
        let n = Bitfield::new(3);
        assert_eq!(1 << &n, 8);
        assert_eq!(64u8 >> n.clone(), 8);
        assert_eq!(BigInt::from(-16) >> &n, -2);
        assert_eq!((1u64 << Bitfield::with_width(0b1_0010, 4)).width(), None);
        assert_eq!(1u64 << Bitfield::with_width(0b1_0010, 4), 4);
    }

    #[test]
    #[should_panic(expected = "negative shift count")]
    fn test_reflected_shift_negative_panics() {
        let _ = 1 << Bitfield::new(-1);
    }

    #[test]
    fn test_apply_reflected() {
        let b = Bitfield::new(3);
        assert_eq!(b.apply_reflected(BinaryOp::Pow, &2).unwrap(), 8);
        assert_eq!(b.apply_reflected(BinaryOp::Sub, &10u32).unwrap(), 7);
        assert_eq!(b.apply_reflected(BinaryOp::FloorDiv, &-7).unwrap(), -3);
        assert_eq!(b.apply_reflected(BinaryOp::Shr, &BigInt::from(64)).unwrap(), 8);
        assert_eq!(
            Bitfield::new(-1).apply_reflected(BinaryOp::Pow, &2).unwrap_err(),
            BitfieldError::NegativeExponent
        );
        assert_eq!(
            Bitfield::new(0).apply_reflected(BinaryOp::Mod, &5).unwrap_err(),
            BitfieldError::DivisionByZero
        );
        assert_eq!(
            b.apply_reflected(BinaryOp::Add, &"2").unwrap_err(),
            BitfieldError::UnsupportedOperand {
                op: "+",
                operand: "&str"
            }
        );
    }

    #[test]
    fn test_rtrue_div() {
        let b = Bitfield::new(4);
        assert_eq!(b.rtrue_div(&10).unwrap(), 2.5);
        assert_eq!(b.rtrue_div(&Bitfield::new(1)).unwrap(), 0.25);
        assert_eq!(
            Bitfield::new(0).rtrue_div(&1).unwrap_err(),
            BitfieldError::DivisionByZero
        );
    }

    #[test]
    fn test_arithmetic_reads_masked_value() {
        let a = Bitfield::with_width(0b1_0001, 4);
        assert_eq!(&a + 1, 2);
    }

    #[test]
    fn test_assign_ops() {
        let mut a = Bitfield::with_width(0b0011, 8);
        a += 1;
        assert_eq!(a, 4);
        a <<= 7;
        assert_eq!(a, 0);
        assert_eq!(*a.raw_value(), BigInt::from(512));
        assert_eq!(a.width(), Some(8));

        let mut b = Bitfield::new(10);
        b -= Bitfield::new(4);
        b *= 2u8;
        b /= 5;
        b %= 2;
        b |= 0b110;
        b &= 0b011;
        b ^= 0b001;
        b >>= 1;
        assert_eq!(b, 0b1);
    }

    #[test]
    fn test_unary() {
        let a = Bitfield::new(5);
        assert_eq!(-&a, -5);
        assert_eq!(!&a, -6);
        assert_eq!((-a.clone()).abs(), 5);
        assert_eq!(a.pos(), 5);
        assert_eq!(Bitfield::with_width(0xff, 4).pos().width(), None);
    }

    #[test]
    fn test_pow() {
        let a = Bitfield::new(3);
        assert_eq!(a.pow(4).unwrap(), 81);
        assert_eq!(a.pow_mod(4, 5).unwrap(), 1);
        assert_eq!(a.pow(-1).unwrap_err(), BitfieldError::NegativeExponent);
        assert_eq!(a.pow_mod(2, 0).unwrap_err(), BitfieldError::DivisionByZero);
    }

    #[test]
    fn test_true_div() {
        let a = Bitfield::new(7);
        assert_eq!(a.true_div(&2).unwrap(), 3.5);
        assert_eq!(a.true_div(&Bitfield::new(7)).unwrap(), 1.0);
        assert_eq!(a.true_div(&0).unwrap_err(), BitfieldError::DivisionByZero);
        assert!(matches!(
            a.true_div(&"2"),
            Err(BitfieldError::UnsupportedOperand { op: "/", .. })
        ));
    }

    #[test]
    fn test_apply() {
        let a = Bitfield::new(0b0011);
        assert_eq!(a.apply(BinaryOp::Or, &0b1100u16).unwrap(), 0b1111);
        assert_eq!(a.apply(BinaryOp::Pow, &2).unwrap(), 9);
        assert_eq!(
            a.apply(BinaryOp::FloorDiv, &0).unwrap_err(),
            BitfieldError::DivisionByZero
        );
        assert_eq!(
            a.apply(BinaryOp::Shl, &-1).unwrap_err(),
            BitfieldError::NegativeShiftCount
        );
        assert_eq!(
            a.apply(BinaryOp::Sub, &2.0f32).unwrap_err(),
            BitfieldError::UnsupportedOperand {
                op: "-",
                operand: "f32"
            }
        );
    }

    #[test]
    fn test_apply_assign() {
        let mut a = Bitfield::with_width(0b0011, 4);
        a.apply_assign(BinaryOp::Add, &1)
            .unwrap()
            .apply_assign(BinaryOp::Mul, &Bitfield::new(2))
            .unwrap();
        assert_eq!(a, 8);
        assert_eq!(a.width(), Some(4));

        assert_eq!(
            a.apply_assign(BinaryOp::Xor, &'x').unwrap_err(),
            BitfieldError::UnsupportedOperand {
                op: "^=",
                operand: "char"
            }
        );
        assert_eq!(a, 8);
    }

    #[test]
    fn test_shr_past_width() {
        let big = BigInt::from(u64::MAX) << 64;
        assert_eq!(
            BinaryOp::Shr.eval(&BigInt::from(5), &big).unwrap(),
            BigInt::zero()
        );
        assert_eq!(
            BinaryOp::Shr.eval(&BigInt::from(-5), &big).unwrap(),
            BigInt::from(-1)
        );
    }

    #[test]
    #[should_panic(expected = "division or modulo by zero")]
    fn test_div_by_zero_panics() {
        let _ = Bitfield::new(1) / 0;
    }
}
