//! Text form of [`Decimal`].
//!
//! - layer 0: the float itself (`1234.5`)
//! - layer 1: mantissa and exponent (`1.5e300`)
//! - layer 2+: one `e` per layer in front of the magnitude (`ee20`), or
//!   `(e^N)` once the chain would get longer than four
//!
//! Parsing accepts all of the above, nested exponents such as `1e1e20`,
//! and the `NaN` / `Infinity` sentinels.
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::decimal::Decimal;

/// Longest run of leading `e` written out before switching to `(e^N)`.
const MAX_E_CHAIN: u64 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDecimalError {
    #[error("Cannot parse a decimal from an empty string")]
    Empty,

    #[error("Invalid number literal `{0}`")]
    InvalidNumber(String),

    #[error("Invalid tower prefix in `{0}`, expected `(e^N)` with an integral N")]
    InvalidTower(String),
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            return write!(f, "NaN");
        }
        if self.is_negative() {
            write!(f, "-")?;
        }
        if self.is_infinite() {
            return write!(f, "Infinity");
        }
        match self.layer() {
            0 => write!(f, "{}", self.mag()),
            1 => {
                let mut exponent = self.mag().floor();
                let mut mantissa = 10f64.powf(self.mag() - exponent);
                mantissa = (mantissa * 1e12).round() / 1e12;
                if mantissa >= 10.0 {
                    mantissa /= 10.0;
                    exponent += 1.0;
                }
                write!(f, "{mantissa}e{exponent}")
            }
            layer if layer <= MAX_E_CHAIN => {
                write!(f, "{}{}", "e".repeat(layer as usize), self.mag())
            }
            layer => write!(f, "(e^{layer}){}", self.mag()),
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(ParseDecimalError::Empty);
        }
        match text {
            "NaN" => return Ok(Decimal::NAN),
            "Infinity" | "inf" => return Ok(Decimal::INFINITY),
            "-Infinity" | "-inf" => return Ok(Decimal::NEG_INFINITY),
            _ => {}
        }
        if let Some(rest) = text.strip_prefix('-') {
            return Ok(-rest.parse::<Decimal>()?);
        }
        if let Some(rest) = text.strip_prefix("(e^") {
            let (count, inner) = rest
                .split_once(')')
                .ok_or_else(|| ParseDecimalError::InvalidTower(text.to_string()))?;
            let count: u64 = count
                .trim()
                .parse()
                .map_err(|_| ParseDecimalError::InvalidTower(text.to_string()))?;
            let inner: Decimal = inner.parse()?;
            return Ok(raise_layers(inner, count));
        }
        if let Some(rest) = text.strip_prefix(['e', 'E']) {
            let exponent: Decimal = rest.parse()?;
            return Ok(exponent.pow10());
        }
        match text.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                let mantissa = parse_float(mantissa)?;
                let exponent: Decimal = exponent.parse()?;
                Ok(mantissa * exponent.pow10())
            }
            None => parse_float(text),
        }
    }
}

fn parse_float(text: &str) -> Result<Decimal, ParseDecimalError> {
    text.trim()
        .parse::<f64>()
        .map(Decimal::from_f64)
        .map_err(|_| ParseDecimalError::InvalidNumber(text.to_string()))
}

/// `10^` applied `count` times, moving whole layers once the value is tall.
fn raise_layers(value: Decimal, count: u64) -> Decimal {
    let mut value = value;
    let mut left = count;
    while left > 0 && value.is_finite() {
        if value.layer() >= 1 && value.is_positive() && value.mag() > 0.0 {
            return Decimal::from_parts(1, value.layer().saturating_add(left), value.mag());
        }
        value = value.pow10();
        left -= 1;
    }
    value
}
