//! Iterated polygonal roots.
//!
//! The `n`-th `s`-gonal number is `P(s, n) = ((s - 2) n^2 - (s - 4) n) / 2`.
//! Large values are replaced by their polygonal root until they drop below
//! the threshold, and every replacement adds one pair of delimiters.
use log::debug;
use tower_decimal::Decimal;

use crate::{
    error::{NotationError, NotationResult},
    notation::{CommonConfig, Configurable, Notation, NotationExt, SharedNotation, pair},
    plain::plain,
};

#[derive(Debug, Clone)]
pub struct PolygonalConfig {
    /// At least 3: 3 gives triangular numbers, 4 square numbers.
    pub sides: Decimal,
    /// Values at or above this are reduced. Must exceed 1.
    pub threshold: Decimal,
    pub max_iterations: usize,
    pub delimiters: (String, String),
    pub inner_notation: SharedNotation,
}

impl Default for PolygonalConfig {
    fn default() -> Self {
        Self {
            sides: Decimal::from(3),
            threshold: Decimal::from(1e6),
            max_iterations: 50,
            delimiters: pair("P(", ")"),
            inner_notation: plain(),
        }
    }
}

impl PolygonalConfig {
    fn validate(&self) -> NotationResult<()> {
        if !(self.sides.is_finite() && self.sides >= Decimal::from(3)) {
            return Err(NotationError::InvalidPolygon { sides: self.sides });
        }
        if !(self.threshold.is_finite() && self.threshold > Decimal::ONE) {
            return Err(NotationError::out_of_range(
                "threshold",
                "a finite number greater than 1",
                self.threshold,
            ));
        }
        Ok(())
    }
}

/// A value written as nested polygonal roots, `P(P(10))` and so on.
#[derive(Debug, Clone, Default)]
pub struct PolygonalNotation {
    common: CommonConfig,
    config: PolygonalConfig,
}

impl PolygonalNotation {
    pub fn new(config: PolygonalConfig) -> NotationResult<Self> {
        config.validate()?;
        Ok(Self {
            common: CommonConfig::default(),
            config,
        })
    }

    /// The `n` with `P(sides, n) == value`.
    pub fn polygonal_root(&self, value: &Decimal) -> Decimal {
        let two = Decimal::TWO;
        let s = self.config.sides;
        let offset = s - Decimal::from(4);
        let discriminant = offset * offset + Decimal::from(8) * (s - two) * *value;
        (offset + discriminant.sqrt()) / (two * (s - two))
    }

    /// Reduce `value` below the threshold, returning it with the number of roots taken.
    pub fn reduce(&self, value: &Decimal) -> (Decimal, usize) {
        let mut value = *value;
        let mut iterations = 0;
        while value >= self.config.threshold {
            if iterations == self.config.max_iterations {
                debug!(
                    "polygonal reduction stopped after {iterations} roots at {value}"
                );
                break;
            }
            value = self.polygonal_root(&value);
            iterations += 1;
        }
        (value, iterations)
    }
}

impl Notation for PolygonalNotation {
    fn name(&self) -> &str {
        "Polygonal"
    }

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonConfig {
        &mut self.common
    }

    fn format_decimal(&self, value: &Decimal) -> String {
        let (reduced, iterations) = self.reduce(value);
        let (prefix, suffix) = &self.config.delimiters;
        format!(
            "{}{}{}",
            prefix.repeat(iterations),
            self.config.inner_notation.format(reduced),
            suffix.repeat(iterations)
        )
    }
}

impl Configurable for PolygonalNotation {
    type Config = PolygonalConfig;

    fn config(&self) -> &PolygonalConfig {
        &self.config
    }

    fn install(&mut self, config: PolygonalConfig) -> NotationResult<()> {
        config.validate()?;
        debug!("polygonal notation reconfigured: {} sides", config.sides);
        self.config = config;
        Ok(())
    }
}
