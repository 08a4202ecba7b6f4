//! Field arithmetic on [`Decimal`].
//!
//! Layer 0 operands use plain float arithmetic. As soon as a layer 1+
//! operand is involved the operation moves to log space, where addition of
//! magnitudes more than 17 decades apart leaves the larger one untouched.
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::decimal::{Decimal, MAX_SIGNIFICAND};

/// Decades beyond which the smaller addend no longer shows in an f64 mantissa.
const ADD_PRECISION_DECADES: f64 = 17.0;

impl Decimal {
    fn add_impl(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::NAN;
        }
        if self.is_infinite() {
            if rhs.is_infinite() && rhs.sign() != self.sign() {
                return Self::NAN;
            }
            return self;
        }
        if rhs.is_infinite() {
            return rhs;
        }
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }
        if self.layer() == 0 && rhs.layer() == 0 {
            return Self::from_f64(self.to_f64() + rhs.to_f64());
        }
        if self.layer() == rhs.layer() && self.mag() == rhs.mag() && self.sign() != rhs.sign() {
            return Self::ZERO;
        }

        let (big, small) = match self.cmp_abs(&rhs) {
            Ordering::Less => (rhs, self),
            _ => (self, rhs),
        };
        if big.layer() >= 2 {
            return big;
        }

        let big_log = big.abs_log10_f64();
        let gap = small.abs_log10_f64() - big_log;
        if gap < -ADD_PRECISION_DECADES {
            return big;
        }
        let ratio = 10f64.powf(gap);
        let shifted = if big.sign() == small.sign() {
            (1.0 + ratio).log10()
        } else {
            (1.0 - ratio).log10()
        };
        if !shifted.is_finite() {
            return Self::ZERO;
        }
        Self::from_log10(big_log + shifted).with_sign(big.sign())
    }

    fn mul_impl(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::NAN;
        }
        let sign = self.sign() * rhs.sign();
        if self.is_infinite() || rhs.is_infinite() {
            if self.is_zero() || rhs.is_zero() {
                return Self::NAN;
            }
            return Self::infinite(sign);
        }
        if self.is_zero() || rhs.is_zero() {
            return Self::ZERO;
        }
        if self.layer() == 0 && rhs.layer() == 0 {
            let product = self.mag() * rhs.mag();
            if product.is_finite() && product >= 1e-300 {
                return Self::from_parts(sign, 0, product);
            }
        }
        (self.abs().log10() + rhs.abs().log10())
            .pow10()
            .with_sign(sign)
    }

    fn div_impl(self, rhs: Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return Self::NAN;
        }
        if rhs.is_zero() {
            if self.is_zero() {
                return Self::NAN;
            }
            return Self::infinite(self.sign());
        }
        let sign = self.sign() * rhs.sign();
        if self.is_infinite() {
            if rhs.is_infinite() {
                return Self::NAN;
            }
            return Self::infinite(sign);
        }
        if rhs.is_infinite() || self.is_zero() {
            return Self::ZERO;
        }
        if self.layer() == 0 && rhs.layer() == 0 {
            let quotient = self.mag() / rhs.mag();
            if quotient.is_finite() && quotient >= 1e-300 && quotient < MAX_SIGNIFICAND {
                return Self::from_parts(sign, 0, quotient);
            }
        }
        (self.abs().log10() - rhs.abs().log10())
            .pow10()
            .with_sign(sign)
    }

    /// `1 / self`.
    pub fn recip(self) -> Self {
        Self::ONE.div_impl(self)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        self.with_sign(-self.sign())
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        -*self
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $imp:ident) => {
        impl $trait for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                self.$imp(rhs)
            }
        }

        impl $trait<&Decimal> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &Decimal) -> Decimal {
                self.$imp(*rhs)
            }
        }

        impl $trait<Decimal> for &Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                (*self).$imp(rhs)
            }
        }

        impl<'a> $trait<&'a Decimal> for &Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &'a Decimal) -> Decimal {
                (*self).$imp(*rhs)
            }
        }

        impl $trait<f64> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: f64) -> Decimal {
                self.$imp(Decimal::from_f64(rhs))
            }
        }

        impl $assign_trait for Decimal {
            #[inline]
            fn $assign_method(&mut self, rhs: Decimal) {
                *self = self.$imp(rhs);
            }
        }

        impl $assign_trait<&Decimal> for Decimal {
            #[inline]
            fn $assign_method(&mut self, rhs: &Decimal) {
                *self = self.$imp(*rhs);
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign, add_impl);
forward_binop!(Mul, mul, MulAssign, mul_assign, mul_impl);
forward_binop!(Div, div, DivAssign, div_assign, div_impl);

impl Decimal {
    fn sub_impl(self, rhs: Self) -> Self {
        self.add_impl(-rhs)
    }
}

forward_binop!(Sub, sub, SubAssign, sub_assign, sub_impl);
