//! Logarithms, powers and the hyperoperators built on them.
//!
//! Tetration follows the linear approximation: `b^^x = 1 + x` on `(-1, 0]`
//! and `b^^x = b^(b^^(x - 1))` above. The super-logarithm is its exact
//! inverse under that convention.
//!
//! Tall towers are not walked one exponentiation at a time. From layer 3 on,
//! one more `b^` (or one less `log_b`) shifts the layer count while leaving
//! `mag` untouched to f64 precision, so whole runs of layers are moved at once.
use log::debug;

use crate::decimal::Decimal;

/// Layer from which exponentiation and logarithms move whole layers at once.
const TOWER_LAYER: u64 = 3;

/// Upper bound on single steps taken by the iterated operations.
pub const MAX_HYPER_STEPS: u64 = 10_000;

impl Decimal {
    /// Base-10 logarithm. Negative inputs give `NaN`, zero gives `-Infinity`.
    pub fn log10(self) -> Self {
        if self.is_nan() || self.is_negative() {
            return Self::NAN;
        }
        if self.is_zero() {
            return Self::NEG_INFINITY;
        }
        if self.is_infinite() {
            return Self::INFINITY;
        }
        match self.layer() {
            0 => Self::from_f64(self.mag().log10()),
            1 => Self::from_f64(self.mag()),
            layer => Self::from_parts(1, layer - 1, self.mag()),
        }
    }

    /// Natural logarithm.
    pub fn ln(self) -> Self {
        self.log10() * std::f64::consts::LN_10
    }

    /// Logarithm in an arbitrary base.
    pub fn log(self, base: Self) -> Self {
        let base_log = base.log10();
        if base_log == Self::ONE {
            return self.log10();
        }
        self.log10() / base_log
    }

    /// `10^self`.
    pub fn pow10(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        if self.is_infinite() {
            return if self.is_positive() {
                Self::INFINITY
            } else {
                Self::ZERO
            };
        }
        match self.layer() {
            0 => Self::from_log10(self.to_f64()),
            // Exponent below f64 range: 10^x rounds to one.
            1 if self.mag() < 0.0 => Self::ONE,
            layer if self.is_positive() => Self::from_parts(1, layer + 1, self.mag()),
            _ => Self::ZERO,
        }
    }

    /// `e^self`.
    pub fn exp(self) -> Self {
        (self * std::f64::consts::LOG10_E).pow10()
    }

    /// `self^exponent`. Negative bases require an integral exponent.
    pub fn pow(self, exponent: Self) -> Self {
        if self.is_nan() || exponent.is_nan() {
            return Self::NAN;
        }
        if exponent.is_zero() || self == Self::ONE {
            return Self::ONE;
        }
        if self.is_zero() {
            return if exponent.is_positive() {
                Self::ZERO
            } else {
                Self::INFINITY
            };
        }
        if self.is_negative() {
            if !exponent.is_integer() {
                return Self::NAN;
            }
            let magnitude = self.abs().pow(exponent);
            let odd = exponent.layer() == 0 && exponent.mag() % 2.0 == 1.0;
            return if odd { -magnitude } else { magnitude };
        }
        if self.layer() == 0 && exponent.layer() == 0 {
            let result = self.mag().powf(exponent.to_f64());
            if result.is_finite() && result >= 1e-300 && result < crate::decimal::MAX_SIGNIFICAND {
                return Self::from_f64(result);
            }
        }
        (self.log10() * exponent).pow10()
    }

    /// `self^(1/degree)`.
    pub fn root(self, degree: Self) -> Self {
        self.pow(degree.recip())
    }

    pub fn sqrt(self) -> Self {
        if self.layer() == 0 && !self.is_negative() {
            return Self::from_f64(self.mag().sqrt());
        }
        self.root(Self::TWO)
    }

    /// Apply `x -> base^x` to `self`, `times` times.
    ///
    /// Stops early on a fixed point (bases at most `e^(1/e)` converge) or
    /// when the value leaves the finite range.
    pub fn iterated_exp(self, base: Self, times: u64) -> Self {
        let mut value = self;
        let mut left = times;
        while left > 0 {
            if !value.is_finite() {
                break;
            }
            if value.layer() >= TOWER_LAYER && value.is_positive() {
                return Self::from_parts(1, value.layer().saturating_add(left), value.mag());
            }
            let next = base.pow(value);
            if next == value {
                break;
            }
            value = next;
            left -= 1;
        }
        value
    }

    /// Apply `x -> log_base(x)` to `self`, `times` times.
    pub fn iterated_log(self, base: Self, times: u64) -> Self {
        let mut value = self;
        let mut left = times;
        while left > 0 {
            if !value.is_finite() {
                break;
            }
            if value.layer() > TOWER_LAYER && value.is_positive() {
                let jump = left.min(value.layer() - TOWER_LAYER);
                value = Self::from_parts(1, value.layer() - jump, value.mag());
                left -= jump;
                continue;
            }
            value = value.log(base);
            left -= 1;
        }
        value
    }

    /// `self^^height` (tetration with `self` as the base).
    ///
    /// Heights below `-1` are undefined and give `NaN`. Heights beyond the
    /// layer counter saturate to `Infinity`.
    pub fn tetrate(self, height: Self) -> Self {
        if self.is_nan() || height.is_nan() || self.is_negative() {
            return Self::NAN;
        }
        if height.is_infinite() {
            return if height.is_positive() {
                Self::INFINITY
            } else {
                Self::NAN
            };
        }
        let height = height.to_f64();
        if height < -1.0 {
            return Self::NAN;
        }
        if height >= u64::MAX as f64 {
            return Self::INFINITY;
        }
        let whole = height.floor();
        let payload = Self::from_f64(height - whole);
        payload.iterated_exp(self, (whole + 1.0) as u64)
    }

    /// Super-logarithm: the height `h` with `base^^h == self`.
    ///
    /// Inputs in `[0, 1]` map linearly onto `[-1, 0]`. For bases whose towers
    /// converge, values above the limit never come down and the count stops
    /// at [`MAX_HYPER_STEPS`].
    pub fn slog(self, base: Self) -> Self {
        if self.is_nan() || base.is_nan() || self.is_negative() {
            return Self::NAN;
        }
        if self.is_infinite() {
            return Self::INFINITY;
        }
        if self <= Self::ONE {
            return self - Self::ONE;
        }

        let mut value = self;
        let mut count: u64 = 0;
        for _ in 0..MAX_HYPER_STEPS {
            if value <= Self::ONE {
                return Self::from(count) + (value - Self::ONE);
            }
            if value.layer() > TOWER_LAYER {
                let jump = value.layer() - TOWER_LAYER;
                value = Self::from_parts(1, TOWER_LAYER, value.mag());
                count = count.saturating_add(jump);
                continue;
            }
            let next = value.log(base);
            if !(next < value) {
                debug!("slog stalled at {value} for base {base}");
                break;
            }
            value = next;
            count += 1;
        }
        debug!("slog stopped after {count} steps for base {base}");
        Self::from(count) + (value.min(Self::TWO) - Self::ONE)
    }

    /// Apply `x -> base^^x` to `self`, `times` times (pentation by repetition).
    pub fn iterated_tetrate(self, base: Self, times: u64) -> Self {
        let mut value = self;
        for _ in 0..times {
            if !value.is_finite() {
                break;
            }
            let next = base.tetrate(value);
            if next == value {
                break;
            }
            value = next;
        }
        value
    }

    /// `base` pentated to an integral `height` (`base^^^height`).
    pub fn pentate(self, height: u64) -> Self {
        Self::ONE.iterated_tetrate(self, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Decimal, b: Decimal) -> bool {
        let diff = (a - b).abs();
        diff <= b.abs() * 1e-9 || diff <= Decimal::from_f64(1e-9)
    }

    #[test]
    fn logarithms() {
        assert!(approx(Decimal::from(1000).log10(), Decimal::from(3)));
        assert_eq!(Decimal::from_log10(500.0).log10(), Decimal::from(500));
        assert_eq!(Decimal::from_parts(1, 4, 30.0).log10().layer(), 3);
        assert!(approx(Decimal::from(8).log(Decimal::TWO), Decimal::from(3)));
        assert!(Decimal::from(-1).log10().is_nan());
        assert_eq!(Decimal::ZERO.log10(), Decimal::NEG_INFINITY);
    }

    #[test]
    fn powers() {
        assert_eq!(Decimal::TWO.pow(Decimal::from(10)), Decimal::from(1024));
        assert_eq!(Decimal::from(-2).pow(Decimal::from(3)), Decimal::from(-8));
        assert!(Decimal::from(-2).pow(Decimal::from_f64(0.5)).is_nan());
        let googol = Decimal::TEN.pow(Decimal::from(100));
        assert_eq!(googol.layer(), 1);
        assert_eq!(googol.mag(), 100.0);
        assert!(approx(Decimal::from(81).root(Decimal::from(4)), Decimal::from(3)));
        assert_eq!(Decimal::from(49).sqrt(), Decimal::from(7));
    }

    #[test]
    fn tetration_matches_towers() {
        assert_eq!(Decimal::TEN.tetrate(Decimal::ZERO), Decimal::ONE);
        assert_eq!(Decimal::TEN.tetrate(Decimal::ONE), Decimal::TEN);
        assert_eq!(Decimal::TEN.tetrate(Decimal::TWO), Decimal::from_f64(1e10));
        assert_eq!(Decimal::TWO.tetrate(Decimal::from(4)), Decimal::from(65536));
        let tall = Decimal::TEN.tetrate(Decimal::from(1000));
        assert_eq!(tall.layer(), 998);
        assert!(approx(Decimal::TEN.tetrate(Decimal::from_f64(0.5)), Decimal::TEN.sqrt()));
    }

    #[test]
    fn slog_inverts_tetration() {
        for height in [0.25, 1.0, 2.5, 3.0, 5.75, 40.0, 1234.0] {
            let tower = Decimal::TEN.tetrate(Decimal::from_f64(height));
            let back = tower.slog(Decimal::TEN);
            assert!(approx(back, Decimal::from_f64(height)), "height {height}: {back}");
        }
        assert_eq!(Decimal::from_f64(0.5).slog(Decimal::TEN), Decimal::from_f64(-0.5));
    }

    #[test]
    fn iterated_exp_and_log() {
        let value = Decimal::from(3);
        let up = value.iterated_exp(Decimal::TEN, 3);
        assert_eq!(up.layer(), 2);
        assert!(approx(up.iterated_log(Decimal::TEN, 3), value));
        let converged = Decimal::ONE.iterated_exp(Decimal::from_f64(1.2), 5_000);
        assert!(converged < Decimal::TWO);
    }

    #[test]
    fn pentation() {
        assert_eq!(Decimal::TWO.pentate(0), Decimal::ONE);
        assert_eq!(Decimal::TWO.pentate(1), Decimal::TWO);
        assert_eq!(Decimal::TWO.pentate(2), Decimal::from(4));
        assert_eq!(Decimal::TWO.pentate(3), Decimal::from(65536));
    }
}
