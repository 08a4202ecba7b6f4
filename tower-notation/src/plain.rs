//! Leaf notation: fixed places for ordinary numbers, scientific form beyond.
use std::sync::Arc;

use log::debug;
use tower_decimal::Decimal;

use crate::{
    error::{NotationError, NotationResult},
    notation::{CommonConfig, Configurable, Notation, SharedNotation},
};

/// Largest number of decimal places an f64 mantissa can meaningfully show.
const MAX_PLACES: usize = 15;

/// Longest `eee...` chain accepted for [`PlainConfig::max_e_chain`].
const MAX_E_CHAIN: u64 = 64;

#[derive(Debug, Clone)]
pub struct PlainConfig {
    /// Decimal places kept on plain numbers and mantissas; trailing zeros are trimmed.
    pub places: usize,
    /// Values at or above this are written as `mantissa e exponent`. Between 10 and 1e15.
    pub exponent_threshold: Decimal,
    /// Positive values below this are written as `mantissa e -exponent`. Zero disables it.
    pub small_threshold: Decimal,
    /// Longest `eee...` chain written out before collapsing into `(e^N)`. At most 64.
    pub max_e_chain: u64,
    /// Marker between mantissa and exponent, also repeated for stacked exponents.
    pub exponent_marker: String,
}

impl Default for PlainConfig {
    fn default() -> Self {
        Self {
            places: 3,
            exponent_threshold: Decimal::from(1e9),
            small_threshold: Decimal::from(1e-5),
            max_e_chain: 4,
            exponent_marker: "e".to_string(),
        }
    }
}

impl PlainConfig {
    fn validate(&self) -> NotationResult<()> {
        if self.places > MAX_PLACES {
            return Err(NotationError::out_of_range(
                "places",
                "at most 15",
                self.places,
            ));
        }
        if !(self.exponent_threshold >= Decimal::TEN && self.exponent_threshold <= Decimal::from(1e15)) {
            return Err(NotationError::out_of_range(
                "exponent_threshold",
                "a value between 10 and 1e15",
                self.exponent_threshold,
            ));
        }
        if self.max_e_chain > MAX_E_CHAIN {
            return Err(NotationError::out_of_range(
                "max_e_chain",
                "at most 64",
                self.max_e_chain,
            ));
        }
        if !(self.small_threshold >= Decimal::ZERO && self.small_threshold < Decimal::ONE) {
            return Err(NotationError::out_of_range(
                "small_threshold",
                "a value in [0, 1)",
                self.small_threshold,
            ));
        }
        Ok(())
    }
}

/// Plain decimal text, the default inner notation of every composite notation.
///
/// ```
/// use tower_decimal::Decimal;
/// use tower_notation::prelude::*;
///
/// let plain = PlainNotation::default();
/// assert_eq!(plain.format(1234.5678), "1234.568");
/// assert_eq!(plain.format(1.5e300), "1.5e300");
/// assert_eq!(plain.format(Decimal::from_parts(1, 2, 20.0)), "e1e20");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlainNotation {
    common: CommonConfig,
    config: PlainConfig,
}

impl PlainNotation {
    pub fn new(config: PlainConfig) -> NotationResult<Self> {
        config.validate()?;
        Ok(Self {
            common: CommonConfig::default(),
            config,
        })
    }

    /// Default configuration with a different number of places.
    pub fn with_places(places: usize) -> NotationResult<Self> {
        Self::new(PlainConfig {
            places,
            ..PlainConfig::default()
        })
    }

    fn fixed(&self, value: f64) -> String {
        fixed(value, self.config.places)
    }

    /// `mantissa e exponent` for a value whose exponent fits on layer 0.
    fn mantissa_exponent(&self, value: Decimal) -> String {
        let log = value.log10().to_f64();
        let mut exponent = log.floor();
        let scale = 10f64.powi(self.config.places as i32);
        let mut mantissa = (10f64.powf(log - exponent) * scale).round() / scale;
        if mantissa >= 10.0 {
            mantissa /= 10.0;
            exponent += 1.0;
        }
        format!(
            "{}{}{}",
            self.fixed(mantissa),
            self.config.exponent_marker,
            fixed(exponent, 0)
        )
    }

    fn scientific(&self, value: Decimal) -> String {
        let threshold = self.config.exponent_threshold;
        let mut value = value;
        let mut stacked: u64 = 0;
        loop {
            if value.layer() >= 3 {
                stacked += value.layer() - 2;
                value = Decimal::from_parts(1, 2, value.mag());
                continue;
            }
            let exponent = value.log10();
            if exponent < threshold {
                break;
            }
            value = exponent;
            stacked += 1;
        }

        let marker = &self.config.exponent_marker;
        let prefix = if stacked <= self.config.max_e_chain {
            marker.repeat(stacked as usize)
        } else {
            format!("({marker}^{stacked})")
        };
        format!("{prefix}{}", self.mantissa_exponent(value))
    }
}

/// `value` with `places` decimals, trailing zeros and a dangling point removed.
pub(crate) fn fixed(value: f64, places: usize) -> String {
    let mut text = format!("{value:.places$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

impl Notation for PlainNotation {
    fn name(&self) -> &str {
        "Plain"
    }

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonConfig {
        &mut self.common
    }

    fn format_decimal(&self, value: &Decimal) -> String {
        if value.is_zero() {
            return "0".to_string();
        }
        if *value < self.config.exponent_threshold && *value >= self.config.small_threshold {
            return self.fixed(value.to_f64());
        }
        if *value < self.config.small_threshold {
            return self.mantissa_exponent(*value);
        }
        self.scientific(*value)
    }
}

impl Configurable for PlainNotation {
    type Config = PlainConfig;

    fn config(&self) -> &PlainConfig {
        &self.config
    }

    fn install(&mut self, config: PlainConfig) -> NotationResult<()> {
        config.validate()?;
        debug!("plain notation reconfigured: {config:?}");
        self.config = config;
        Ok(())
    }
}

/// A shared [`PlainNotation`] with default settings.
pub fn plain() -> SharedNotation {
    Arc::new(PlainNotation::default())
}
