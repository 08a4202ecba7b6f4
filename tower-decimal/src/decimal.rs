//! The layered value type and its normal form.
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest magnitude kept on layer 0 before moving up one layer.
pub const MAX_SIGNIFICAND: f64 = 9e15;

/// `log10(MAX_SIGNIFICAND)`: layer `n + 1` magnitudes below this move down to layer `n`.
pub const LAYER_DOWN: f64 = 15.954242509439325;

/// Smallest decimal exponent kept on layer 0. Smaller magnitudes are stored on
/// layer 1 with a negative `mag`.
pub const MIN_EXPONENT: f64 = -300.0;

/// Arbitrary-magnitude decimal value.
///
/// The value is `sign * 10^10^...^mag` where the exponentiation is applied
/// `layer` times. Layer 0 stores a plain magnitude, layer 1 stores a decimal
/// exponent (negative for magnitudes below f64 range), and every further layer
/// adds one more `10^`.
///
/// Values are always kept in normal form, so two equal numbers have the same
/// `(sign, layer, mag)` triple. `NaN` compares unequal to everything, itself
/// included.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decimal {
    sign: i8,
    layer: u64,
    mag: f64,
}

impl Decimal {
    pub const ZERO: Self = Self {
        sign: 0,
        layer: 0,
        mag: 0.0,
    };
    pub const ONE: Self = Self {
        sign: 1,
        layer: 0,
        mag: 1.0,
    };
    pub const TWO: Self = Self {
        sign: 1,
        layer: 0,
        mag: 2.0,
    };
    pub const TEN: Self = Self {
        sign: 1,
        layer: 0,
        mag: 10.0,
    };
    pub const INFINITY: Self = Self {
        sign: 1,
        layer: 0,
        mag: f64::INFINITY,
    };
    pub const NEG_INFINITY: Self = Self {
        sign: -1,
        layer: 0,
        mag: f64::INFINITY,
    };
    pub const NAN: Self = Self {
        sign: 0,
        layer: 0,
        mag: f64::NAN,
    };

    /// Build a value from its raw parts and bring it to normal form.
    ///
    /// A negative `mag` on layer 0 flips the sign. Any non-zero `sign` is
    /// reduced to `-1` or `1`.
    pub fn from_parts(sign: i8, layer: u64, mag: f64) -> Self {
        if mag.is_nan() {
            return Self::NAN;
        }
        let mut sign = sign.signum();
        let mut layer = layer;
        let mut mag = mag;

        if layer == 0 && mag < 0.0 {
            sign = -sign;
            mag = -mag;
        }
        if sign == 0 || (layer == 0 && mag == 0.0) {
            return Self::ZERO;
        }
        if mag == f64::INFINITY {
            return Self::infinite(sign);
        }
        if mag == f64::NEG_INFINITY {
            return Self::ZERO;
        }

        while mag >= MAX_SIGNIFICAND {
            mag = mag.log10();
            layer = layer.saturating_add(1);
        }
        if layer == 0 && mag < 1e-300 {
            mag = mag.log10();
            layer = 1;
        }
        if layer == 1 && mag <= -MAX_SIGNIFICAND {
            return Self::ZERO;
        }

        while layer > 0 {
            let fits_below = if layer == 1 {
                mag < LAYER_DOWN && mag > MIN_EXPONENT
            } else {
                mag < LAYER_DOWN
            };
            if !fits_below {
                break;
            }
            mag = pow_ten(mag);
            layer -= 1;
        }

        Self { sign, layer, mag }
    }

    /// Convert an `f64`, mapping its NaN and infinities to the sentinels.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::NAN
        } else if value.is_infinite() {
            Self::infinite(if value > 0.0 { 1 } else { -1 })
        } else if value == 0.0 {
            Self::ZERO
        } else {
            Self::from_parts(if value > 0.0 { 1 } else { -1 }, 0, value.abs())
        }
    }

    /// The positive value `10^exponent`.
    pub fn from_log10(exponent: f64) -> Self {
        if exponent.is_nan() {
            Self::NAN
        } else if exponent == f64::INFINITY {
            Self::INFINITY
        } else if exponent == f64::NEG_INFINITY {
            Self::ZERO
        } else if exponent > MIN_EXPONENT && exponent < LAYER_DOWN {
            Self::from_f64(pow_ten(exponent))
        } else {
            Self::from_parts(1, 1, exponent)
        }
    }

    pub(crate) const fn infinite(sign: i8) -> Self {
        if sign < 0 {
            Self::NEG_INFINITY
        } else {
            Self::INFINITY
        }
    }

    /// `-1`, `0` or `1`. `NaN` reports `0`.
    #[inline]
    pub const fn sign(&self) -> i8 {
        self.sign
    }

    /// Number of stacked `10^` applied to [`Decimal::mag`].
    #[inline]
    pub const fn layer(&self) -> u64 {
        self.layer
    }

    #[inline]
    pub const fn mag(&self) -> f64 {
        self.mag
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        self.mag.is_nan()
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.mag.is_infinite()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.mag.is_finite()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.sign == 0 && !self.is_nan()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign < 0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.sign > 0
    }

    /// `true` for finite values without a fractional part. Every layer 2+
    /// value and every layer 1 value with a positive exponent is an integer.
    pub fn is_integer(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        match self.layer {
            0 => self.mag.fract() == 0.0,
            1 => self.mag > 0.0,
            _ => true,
        }
    }

    /// Nearest `f64`. Layer 2+ values saturate to an infinity, tiny layer 1
    /// values flush to zero.
    pub fn to_f64(&self) -> f64 {
        if self.is_nan() {
            return f64::NAN;
        }
        let sign = f64::from(self.sign);
        match self.layer {
            0 => sign * self.mag,
            1 => sign * pow_ten(self.mag),
            _ => sign * f64::INFINITY,
        }
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self {
            sign: self.sign.abs(),
            ..self
        }
    }

    #[inline]
    pub(crate) fn with_sign(self, sign: i8) -> Self {
        if self.is_zero() || self.is_nan() {
            self
        } else {
            Self {
                sign: sign.signum(),
                ..self
            }
        }
    }

    /// `log10(|self|)` as an `f64`. Only meaningful for layers 0 and 1.
    pub(crate) fn abs_log10_f64(&self) -> f64 {
        match self.layer {
            0 => self.mag.log10(),
            1 => self.mag,
            _ => f64::INFINITY,
        }
    }

    /// Compare magnitudes, ignoring the sign. Neither value may be NaN.
    pub(crate) fn cmp_abs(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        match (self.is_infinite(), other.is_infinite()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        if self.layer == other.layer {
            return self.mag.total_cmp(&other.mag);
        }
        // Layer 1 with a negative exponent lies below every layer 0 magnitude.
        let tiny = |d: &Self| d.layer == 1 && d.mag < 0.0;
        match (tiny(self), tiny(other)) {
            (true, _) => Ordering::Less,
            (_, true) => Ordering::Greater,
            _ => self.layer.cmp(&other.layer),
        }
    }

    pub fn floor(self) -> Self {
        self.integral(f64::floor)
    }

    pub fn ceil(self) -> Self {
        self.integral(f64::ceil)
    }

    pub fn round(self) -> Self {
        self.integral(f64::round)
    }

    pub fn trunc(self) -> Self {
        self.integral(f64::trunc)
    }

    fn integral(self, op: fn(f64) -> f64) -> Self {
        if !self.is_finite() {
            return self;
        }
        match self.layer {
            0 => Self::from_f64(op(f64::from(self.sign) * self.mag)),
            // Below f64 range: the value lies strictly between -1 and 1.
            1 if self.mag < 0.0 => Self::from_f64(op(f64::from(self.sign) * f64::MIN_POSITIVE)),
            _ => self,
        }
    }

    pub fn max(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            Self::NAN
        } else if other > self {
            other
        } else {
            self
        }
    }

    pub fn min(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            Self::NAN
        } else if other < self {
            other
        } else {
            self
        }
    }

    /// Restrict `self` to `[low, high]`.
    pub fn clamp(self, low: Self, high: Self) -> Self {
        self.max(low).min(high)
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        !self.is_nan()
            && !other.is_nan()
            && self.sign == other.sign
            && self.layer == other.layer
            && self.mag == other.mag
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        match self.sign.cmp(&other.sign) {
            Ordering::Equal => {}
            unequal => return Some(unequal),
        }
        let ordering = self.cmp_abs(other);
        Some(if self.sign < 0 {
            ordering.reverse()
        } else {
            ordering
        })
    }
}

/// `10^x` on plain floats, exact for integral exponents within f64 range.
pub(crate) fn pow_ten(x: f64) -> f64 {
    if x.fract() == 0.0 && x.abs() <= 308.0 {
        10f64.powi(x as i32)
    } else {
        10f64.powf(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_upwards() {
        let big = Decimal::from_f64(1e20);
        assert_eq!(big.layer(), 1);
        assert!((big.mag() - 20.0).abs() < 1e-12);

        let tower = Decimal::from_parts(1, 1, 1e20);
        assert_eq!(tower.layer(), 2);
        assert!((tower.mag() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn normalises_downwards() {
        let small = Decimal::from_parts(1, 1, 3.0);
        assert_eq!(small.layer(), 0);
        assert_eq!(small.mag(), 1000.0);

        let two_steps = Decimal::from_parts(1, 2, 1.0);
        assert_eq!(two_steps.layer(), 0);
        assert_eq!(two_steps.mag(), 1e10);
    }

    #[test]
    fn tiny_values_live_on_layer_one() {
        let tiny = Decimal::from_log10(-400.0);
        assert_eq!(tiny.layer(), 1);
        assert_eq!(tiny.mag(), -400.0);
        assert!(tiny > Decimal::ZERO);
        assert!(tiny < Decimal::from_f64(1e-300));
        assert_eq!(tiny.floor(), Decimal::ZERO);
        assert_eq!((-tiny).floor(), Decimal::from(-1));
    }

    #[test]
    fn ordering_across_layers_and_signs() {
        let values = [
            Decimal::NEG_INFINITY,
            Decimal::from_parts(-1, 2, 20.0),
            Decimal::from_f64(-5.0),
            Decimal::ZERO,
            Decimal::from_log10(-500.0),
            Decimal::from_f64(0.5),
            Decimal::from_f64(8e15),
            Decimal::from_log10(400.0),
            Decimal::from_parts(1, 2, 20.0),
            Decimal::from_parts(1, 5, 20.0),
            Decimal::INFINITY,
        ];
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1], "{:?} < {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn nan_is_incomparable() {
        assert_ne!(Decimal::NAN, Decimal::NAN);
        assert_eq!(Decimal::NAN.partial_cmp(&Decimal::ONE), None);
        assert!(Decimal::NAN.max(Decimal::ONE).is_nan());
    }

    #[test]
    fn integral_parts() {
        assert_eq!(Decimal::from_f64(2.7).floor(), Decimal::from(2));
        assert_eq!(Decimal::from_f64(-2.2).floor(), Decimal::from(-3));
        assert_eq!(Decimal::from_f64(2.2).ceil(), Decimal::from(3));
        assert_eq!(Decimal::from_f64(2.5).round(), Decimal::from(3));
        let huge = Decimal::from_log10(1e6);
        assert_eq!(huge.floor(), huge);
        assert!(huge.is_integer());
    }
}
