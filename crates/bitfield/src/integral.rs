//! Integer-like operands.
//!
//! Anything implementing [Integral] can stand on the other side of a
//! [crate::Bitfield] operator or comparison without being wrapped first.

use std::any::{Any, type_name};

use num::{BigInt, BigUint};

use crate::{errors::BitfieldError, field::Bitfield};

/// A value with an exact integer interpretation.
pub trait Integral {
    fn to_integer(&self) -> BigInt;
}

macro_rules! impl_integral {
    ($($t:ty),*) => {
        $(
            impl Integral for $t {
                fn to_integer(&self) -> BigInt {
                    BigInt::from(*self)
                }
            }
        )*
    };
}

impl_integral!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Integral for bool {
    fn to_integer(&self) -> BigInt {
        BigInt::from(u8::from(*self))
    }
}

impl Integral for BigInt {
    fn to_integer(&self) -> BigInt {
        self.clone()
    }
}

impl Integral for BigUint {
    fn to_integer(&self) -> BigInt {
        BigInt::from(self.clone())
    }
}

impl Integral for Bitfield {
    fn to_integer(&self) -> BigInt {
        self.value()
    }
}

impl<T: Integral + ?Sized> Integral for &T {
    fn to_integer(&self) -> BigInt {
        (**self).to_integer()
    }
}

/// Coerces a dynamically typed operand to an integer.
///
/// Accepts bitfields, `bool`, [BigInt], [BigUint] and every primitive integer.
/// Anything else fails with [BitfieldError::UnsupportedOperand] naming `op`
/// and the operand's type.
pub fn coerce_operand<T: Any>(op: &'static str, operand: &T) -> Result<BigInt, BitfieldError> {
    let any = operand as &dyn Any;

    macro_rules! try_downcast {
        ($($t:ty),*) => {
            $(
                if let Some(value) = any.downcast_ref::<$t>() {
                    return Ok(value.to_integer());
                }
            )*
        };
    }

    try_downcast!(
        Bitfield, BigInt, BigUint, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128,
        usize
    );

    Err(BitfieldError::UnsupportedOperand {
        op,
        operand: type_name::<T>(),
    })
}
