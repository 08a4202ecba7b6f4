//! Iterated inverse factorial.
//!
//! `x` with `Gamma(x + 1) == v` is found by Newton's method on the Stirling
//! series of `ln Gamma`. Once `ln v` is beyond what an f64 resolves, the
//! asymptotic inverse `x ~ L / (ln x - 1)` with `L = ln v` is used directly.
use std::f64::consts::{PI, TAU};

use log::debug;
use tower_decimal::Decimal;

use crate::{
    error::{NotationError, NotationResult},
    notation::{CommonConfig, Configurable, Notation, NotationExt, SharedNotation},
    plain::plain,
};

/// Argument from which the Stirling series is accurate to f64 precision.
const STIRLING_FROM: f64 = 10.0;

/// `ln v` from which Newton's method no longer improves on the asymptotic form.
const NEWTON_LIMIT: f64 = 1e15;

const NEWTON_STEPS: usize = 100;

fn ln_gamma(z: f64) -> f64 {
    let mut z = z;
    let mut shift = 0.0;
    while z < STIRLING_FROM {
        shift += z.ln();
        z += 1.0;
    }
    let inv = z.recip();
    let inv2 = inv * inv;
    let series = inv * (1.0 / 12.0 - inv2 * (1.0 / 360.0 - inv2 * (1.0 / 1260.0 - inv2 / 1680.0)));
    (z - 0.5) * z.ln() - z + 0.5 * TAU.ln() + series - shift
}

fn digamma(z: f64) -> f64 {
    let mut z = z;
    let mut shift = 0.0;
    while z < STIRLING_FROM {
        shift += z.recip();
        z += 1.0;
    }
    let inv = z.recip();
    let inv2 = inv * inv;
    z.ln() - 0.5 * inv - inv2 * (1.0 / 12.0 - inv2 * (1.0 / 120.0 - inv2 / 252.0)) - shift
}

/// Solve `ln Gamma(x + 1) == target` for `x >= 2`.
fn newton(target: f64) -> f64 {
    let mut x = if target > PI * PI {
        target / (target.ln() - 1.0)
    } else {
        3.0
    };
    for _ in 0..NEWTON_STEPS {
        let step = (ln_gamma(x + 1.0) - target) / digamma(x + 1.0);
        let next = (x - step).max(1.5);
        if (next - x).abs() <= 1e-14 * x {
            return next;
        }
        x = next;
    }
    x
}

/// The `x` with `x! == value`, for values of at least 3.
pub fn inverse_factorial(value: &Decimal) -> Decimal {
    let target = value.ln();
    if target.layer() == 0 && target.to_f64() < NEWTON_LIMIT {
        return Decimal::from(newton(target.to_f64()));
    }
    let guess = target / target.ln();
    target / (guess.ln() - Decimal::ONE)
}

#[derive(Debug, Clone)]
pub struct FactorialConfig {
    /// Values at or above this are reduced. At least 3, below which the
    /// inverse factorial no longer shrinks its input.
    pub threshold: Decimal,
    pub max_iterations: usize,
    /// Appended once per reduction.
    pub marker: String,
    pub inner_notation: SharedNotation,
}

impl Default for FactorialConfig {
    fn default() -> Self {
        Self {
            threshold: Decimal::from(1e6),
            max_iterations: 50,
            marker: "!".to_string(),
            inner_notation: plain(),
        }
    }
}

impl FactorialConfig {
    fn validate(&self) -> NotationResult<()> {
        if !(self.threshold.is_finite() && self.threshold >= Decimal::from(3)) {
            return Err(NotationError::out_of_range(
                "threshold",
                "a finite number of at least 3",
                self.threshold,
            ));
        }
        Ok(())
    }
}

/// A value written as an iterated factorial, `5!!` for `120!`.
#[derive(Debug, Clone, Default)]
pub struct FactorialNotation {
    common: CommonConfig,
    config: FactorialConfig,
}

impl FactorialNotation {
    pub fn new(config: FactorialConfig) -> NotationResult<Self> {
        config.validate()?;
        Ok(Self {
            common: CommonConfig::default(),
            config,
        })
    }

    /// Reduce `value` below the threshold, returning it with the number of factorials undone.
    pub fn reduce(&self, value: &Decimal) -> (Decimal, usize) {
        let mut value = *value;
        let mut iterations = 0;
        while value >= self.config.threshold {
            if iterations == self.config.max_iterations {
                debug!("factorial reduction stopped after {iterations} steps at {value}");
                break;
            }
            value = inverse_factorial(&value);
            iterations += 1;
        }
        (value, iterations)
    }
}

impl Notation for FactorialNotation {
    fn name(&self) -> &str {
        "Factorial"
    }

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonConfig {
        &mut self.common
    }

    fn format_decimal(&self, value: &Decimal) -> String {
        let (reduced, iterations) = self.reduce(value);
        let mut out = self.config.inner_notation.format(reduced);
        out.push_str(&self.config.marker.repeat(iterations));
        out
    }
}

impl Configurable for FactorialNotation {
    type Config = FactorialConfig;

    fn config(&self) -> &FactorialConfig {
        &self.config
    }

    fn install(&mut self, config: FactorialConfig) -> NotationResult<()> {
        config.validate()?;
        debug!("factorial notation reconfigured: threshold {}", config.threshold);
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factorial(n: u32) -> Decimal {
        (1..=n).fold(Decimal::ONE, |acc, k| acc * Decimal::from(k))
    }

    #[test]
    fn gamma_helpers() {
        assert!((ln_gamma(6.0) - 120f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
        // digamma(1) is minus the Euler-Mascheroni constant.
        assert!((digamma(1.0) + 0.577_215_664_901_532_9).abs() < 1e-9);
    }

    #[test]
    fn inverts_factorials() {
        for n in [3u32, 5, 10, 20, 170] {
            let back = inverse_factorial(&factorial(n)).to_f64();
            assert!((back - f64::from(n)).abs() < 1e-6, "{n}! -> {back}");
        }
    }

    #[test]
    fn formats_iterated_factorials() {
        let mut notation = FactorialNotation::default();
        assert_eq!(notation.format(120), "120");
        notation
            .reconfigure(|cfg| cfg.threshold = Decimal::from(100))
            .unwrap();
        assert_eq!(notation.format(120), "5!");
        assert_eq!(notation.format(3_628_800), "10!");
        assert_eq!(notation.format(factorial(120)), "5!!");
    }

    #[test]
    fn towers_shrink_to_the_cap() {
        let notation = FactorialNotation::default();
        let (value, iterations) = notation.reduce(&Decimal::TEN.tetrate(Decimal::from(5)));
        assert!(iterations > 1 && iterations <= 50);
        assert!(value < Decimal::from(1e6) || iterations == 50);
    }

    #[test]
    fn rejects_small_thresholds() {
        let mut notation = FactorialNotation::default();
        assert!(notation.reconfigure(|cfg| cfg.threshold = Decimal::TWO).is_err());
    }
}
