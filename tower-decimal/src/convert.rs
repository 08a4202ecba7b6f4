//! Conversions into [`Decimal`].
use bigdecimal::{BigDecimal, ToPrimitive};
use num_bigint::{BigInt, Sign};

use crate::decimal::Decimal;

macro_rules! from_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Decimal {
                #[inline]
                fn from(value: $ty) -> Self {
                    Decimal::from_f64(value as f64)
                }
            }
        )*
    };
}

from_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&Decimal> for Decimal {
    #[inline]
    fn from(value: &Decimal) -> Self {
        *value
    }
}

/// Significant digits read from the front of an oversized integer.
const LEADING_DIGITS: usize = 17;

impl From<&BigInt> for Decimal {
    /// Integers beyond f64 range keep their magnitude on layer 1, derived
    /// from the digit count and the leading digits.
    fn from(value: &BigInt) -> Self {
        let sign = match value.sign() {
            Sign::Minus => -1,
            Sign::NoSign => return Decimal::ZERO,
            Sign::Plus => 1,
        };
        if let Some(float) = value.to_f64().filter(|f| f.is_finite()) {
            return Decimal::from_f64(float);
        }
        let digits = value.magnitude().to_string();
        let lead = &digits[..digits.len().min(LEADING_DIGITS)];
        let lead_value: f64 = lead.parse().unwrap_or(1.0);
        let exponent = (digits.len() - lead.len()) as f64 + lead_value.log10();
        Decimal::from_log10(exponent).with_sign(sign)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::from(&value)
    }
}

impl From<&BigDecimal> for Decimal {
    /// Coefficient and scale are converted separately, so large or tiny
    /// scales never pass through an overflowing f64.
    fn from(value: &BigDecimal) -> Self {
        let (coefficient, scale) = value.as_bigint_and_exponent();
        let coefficient = Decimal::from(&coefficient);
        if scale == 0 {
            return coefficient;
        }
        coefficient * Decimal::from_log10(-(scale as f64))
    }
}

impl From<BigDecimal> for Decimal {
    fn from(value: BigDecimal) -> Self {
        Decimal::from(&value)
    }
}
