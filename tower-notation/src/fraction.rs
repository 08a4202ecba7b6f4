//! Continued-fraction approximation.
//!
//! The value is expanded term by term (`a_k = floor(x)`, `x <- 1 / (x - a_k)`)
//! and the convergents are built with the usual recurrence
//! `p_k = a_k p_{k-1} + p_{k-2}`, `q_k = a_k q_{k-1} + q_{k-2}`.
use log::{debug, trace};
use smallvec::SmallVec;
use strum::{EnumIter, IntoEnumIterator};
use tower_decimal::Decimal;

use crate::{
    error::{NotationError, NotationResult},
    notation::{
        CommonConfig, Configurable, Notation, NotationExt, SharedNotation, pair, push_wrapped,
    },
    plain::plain,
};

/// The three tokens a fraction is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Whole,
    Numerator,
    Denominator,
}

/// Order in which the whole part, numerator and denominator are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum FractionOrder {
    #[default]
    WholeNumeratorDenominator,
    WholeDenominatorNumerator,
    NumeratorWholeDenominator,
    NumeratorDenominatorWhole,
    DenominatorWholeNumerator,
    DenominatorNumeratorWhole,
}

impl FractionOrder {
    fn tokens(self) -> [Token; 3] {
        use Token::*;
        match self {
            FractionOrder::WholeNumeratorDenominator => [Whole, Numerator, Denominator],
            FractionOrder::WholeDenominatorNumerator => [Whole, Denominator, Numerator],
            FractionOrder::NumeratorWholeDenominator => [Numerator, Whole, Denominator],
            FractionOrder::NumeratorDenominatorWhole => [Numerator, Denominator, Whole],
            FractionOrder::DenominatorWholeNumerator => [Denominator, Whole, Numerator],
            FractionOrder::DenominatorNumeratorWhole => [Denominator, Numerator, Whole],
        }
    }

    /// Every supported ordering.
    pub fn all() -> impl Iterator<Item = FractionOrder> {
        FractionOrder::iter()
    }
}

/// Why the expansion stopped, mostly for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// The convergent is within the requested precision.
    Converged,
    /// The remainder became zero: the convergent is exact.
    Exact,
    IterationCap,
    DenominatorCap,
    NumeratorCap,
}

/// Result of approximating a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergent {
    pub numerator: Decimal,
    pub denominator: Decimal,
    pub terms: usize,
    pub stop: Stop,
}

#[derive(Debug, Clone)]
pub struct FractionConfig {
    /// Positive: absolute tolerance. Negative: the error may reach `|v| / |precision|`.
    /// Zero: only an exact expansion stops early.
    pub precision: Decimal,
    pub max_iterations: usize,
    pub max_denominator: Option<Decimal>,
    pub max_numerator: Option<Decimal>,
    /// Roll back to the previous convergent when a cap is crossed.
    pub strict: bool,
    /// Write `1 3/4` instead of `7/4`.
    pub mixed: bool,
    /// Keep the `/1` of whole results.
    pub show_unit_denominator: bool,
    pub order: FractionOrder,
    pub whole_delimiters: (String, String),
    pub numerator_delimiters: (String, String),
    pub denominator_delimiters: (String, String),
    pub whole_notation: SharedNotation,
    pub numerator_notation: SharedNotation,
    pub denominator_notation: SharedNotation,
}

impl Default for FractionConfig {
    fn default() -> Self {
        Self {
            precision: Decimal::from(1e-10),
            max_iterations: 100,
            max_denominator: None,
            max_numerator: None,
            strict: true,
            mixed: false,
            show_unit_denominator: false,
            order: FractionOrder::default(),
            whole_delimiters: pair("", " "),
            numerator_delimiters: pair("", ""),
            denominator_delimiters: pair("/", ""),
            whole_notation: plain(),
            numerator_notation: plain(),
            denominator_notation: plain(),
        }
    }
}

impl FractionConfig {
    fn validate(&self) -> NotationResult<()> {
        if self.precision.is_nan() || self.precision.is_infinite() {
            return Err(NotationError::out_of_range(
                "precision",
                "a finite number",
                self.precision,
            ));
        }
        if self.max_iterations == 0 {
            return Err(NotationError::out_of_range(
                "max_iterations",
                "at least 1",
                self.max_iterations,
            ));
        }
        for (parameter, cap) in [
            ("max_denominator", self.max_denominator),
            ("max_numerator", self.max_numerator),
        ] {
            if let Some(cap) = cap
                && !(cap >= Decimal::ONE)
            {
                return Err(NotationError::out_of_range(parameter, "at least 1", cap));
            }
        }
        Ok(())
    }
}

/// Rational approximation rendered as `numerator/denominator` or as a mixed number.
///
/// ```
/// use tower_notation::prelude::*;
///
/// let fraction = FractionNotation::default();
/// assert_eq!(fraction.format(0.75), "3/4");
/// assert_eq!(fraction.format(5), "5");
///
/// let mut mixed = FractionNotation::default();
/// mixed.reconfigure(|cfg| cfg.mixed = true).unwrap();
/// assert_eq!(mixed.format(1.75), "1 3/4");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FractionNotation {
    common: CommonConfig,
    config: FractionConfig,
}

impl FractionNotation {
    pub fn new(config: FractionConfig) -> NotationResult<Self> {
        config.validate()?;
        Ok(Self {
            common: CommonConfig::default(),
            config,
        })
    }

    fn within_tolerance(&self, value: Decimal, error: Decimal) -> bool {
        let precision = self.config.precision;
        if precision.is_positive() {
            error <= precision
        } else if precision.is_negative() {
            error <= value.abs() / precision.abs()
        } else {
            error.is_zero()
        }
    }

    /// Best convergent of a non-negative finite value under the configured limits.
    pub fn approximate(&self, value: &Decimal) -> Convergent {
        let config = &self.config;
        let mut convergents: SmallVec<(Decimal, Decimal), 16> = SmallVec::new();
        let (mut p2, mut p1) = (Decimal::ZERO, Decimal::ONE);
        let (mut q2, mut q1) = (Decimal::ONE, Decimal::ZERO);
        let mut x = *value;

        let stop = loop {
            let term = x.floor();
            let p = term * p1 + p2;
            let q = term * q1 + q2;
            convergents.push((p, q));
            trace!("convergent #{}: {p}/{q}", convergents.len());

            let remainder = x - term;
            let error = (*value - p / q).abs();
            if self.within_tolerance(*value, error) {
                break if remainder.is_zero() {
                    Stop::Exact
                } else {
                    Stop::Converged
                };
            }
            if convergents.len() >= config.max_iterations {
                debug!(
                    "fraction expansion of {value} hit the iteration cap ({})",
                    config.max_iterations
                );
                break Stop::IterationCap;
            }
            if config.max_denominator.is_some_and(|cap| q > cap) {
                break Stop::DenominatorCap;
            }
            if config.max_numerator.is_some_and(|cap| p > cap) {
                break Stop::NumeratorCap;
            }
            if remainder.is_zero() || !remainder.is_finite() {
                break Stop::Exact;
            }

            x = remainder.recip();
            (p2, p1) = (p1, p);
            (q2, q1) = (q1, q);
        };

        let mut index = convergents.len() - 1;
        let (_, q) = convergents[index];
        let roll_back = match stop {
            Stop::DenominatorCap => config.strict,
            Stop::NumeratorCap => config.strict && q != Decimal::ONE,
            _ => false,
        };
        // The first convergent has no predecessor to fall back on.
        if roll_back && index > 0 {
            index -= 1;
        }
        let (numerator, denominator) = convergents[index];
        Convergent {
            numerator,
            denominator,
            terms: index + 1,
            stop,
        }
    }

    fn render(&self, whole: Option<Decimal>, numerator: Decimal, denominator: Option<Decimal>) -> String {
        let config = &self.config;
        let mut out = String::new();
        for token in config.order.tokens() {
            match token {
                Token::Whole => {
                    if let Some(whole) = whole {
                        let text = config.whole_notation.format(whole);
                        push_wrapped(&mut out, &config.whole_delimiters, &text);
                    }
                }
                Token::Numerator => {
                    let text = config.numerator_notation.format(numerator);
                    push_wrapped(&mut out, &config.numerator_delimiters, &text);
                }
                Token::Denominator => {
                    if let Some(denominator) = denominator {
                        let text = config.denominator_notation.format(denominator);
                        push_wrapped(&mut out, &config.denominator_delimiters, &text);
                    }
                }
            }
        }
        out
    }
}

impl Notation for FractionNotation {
    fn name(&self) -> &str {
        "Fraction"
    }

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonConfig {
        &mut self.common
    }

    fn format_decimal(&self, value: &Decimal) -> String {
        let Convergent {
            numerator: p,
            denominator: q,
            ..
        } = self.approximate(value);

        if !self.config.mixed {
            let denominator = (q != Decimal::ONE || self.config.show_unit_denominator).then_some(q);
            return self.render(None, p, denominator);
        }

        let whole = (p / q).floor();
        let remainder = p - whole * q;
        if remainder.is_zero() {
            return self.config.whole_notation.format(whole);
        }
        let whole = (!whole.is_zero()).then_some(whole);
        self.render(whole, remainder, Some(q))
    }
}

impl Configurable for FractionNotation {
    type Config = FractionConfig;

    fn config(&self) -> &FractionConfig {
        &self.config
    }

    fn install(&mut self, config: FractionConfig) -> NotationResult<()> {
        config.validate()?;
        debug!(
            "fraction notation reconfigured: precision {}, {} iterations, order {:?}",
            config.precision, config.max_iterations, config.order
        );
        self.config = config;
        Ok(())
    }
}
