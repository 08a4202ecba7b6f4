//! The notation contract shared by every notation in the crate.
//!
//! A notation implements [`Notation::format_decimal`] for non-negative finite
//! values and optionally overrides [`Notation::format_negative_decimal`].
//! Callers go through [`NotationExt::format`], which is implemented once for
//! every notation and takes care of `NaN`, infinities and the sign before the
//! notation-specific code runs.
use std::fmt;
use std::sync::Arc;

use tower_decimal::Decimal;

use crate::error::NotationResult;

/// A notation shared between several parents of a composition graph.
pub type SharedNotation = Arc<dyn Notation>;

/// Predicate deciding whether a value is displayed as infinite.
pub type InfinityPredicate = Arc<dyn Fn(&Decimal) -> bool + Send + Sync>;

/// How [`NotationExt::format`] recognises infinite values.
///
/// The real infinities are always recognised; the other variants only widen
/// the set of values rendered with the infinity strings.
#[derive(Clone, Default)]
pub enum InfinityCheck {
    /// Only `Infinity` and `-Infinity` themselves.
    #[default]
    Exact,
    /// Any value whose magnitude reaches the threshold.
    AtLeast(Decimal),
    /// A caller supplied predicate.
    Custom(InfinityPredicate),
}

impl InfinityCheck {
    pub fn holds(&self, value: &Decimal) -> bool {
        if value.is_infinite() {
            return true;
        }
        match self {
            InfinityCheck::Exact => false,
            InfinityCheck::AtLeast(threshold) => value.abs() >= *threshold,
            InfinityCheck::Custom(predicate) => predicate(value),
        }
    }
}

impl fmt::Debug for InfinityCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfinityCheck::Exact => write!(f, "Exact"),
            InfinityCheck::AtLeast(threshold) => write!(f, "AtLeast({threshold})"),
            InfinityCheck::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Strings and checks every notation uses for values outside its own domain.
#[derive(Debug, Clone)]
pub struct CommonConfig {
    /// Wraps the formatted absolute value of a negative number.
    pub negative_string: (String, String),
    pub infinity_string: String,
    /// When unset, `-Infinity` is the infinity string wrapped in [`Self::negative_string`].
    pub negative_infinity_string: Option<String>,
    pub nan_string: String,
    pub infinity_check: InfinityCheck,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            negative_string: ("-".to_string(), String::new()),
            infinity_string: "Infinity".to_string(),
            negative_infinity_string: None,
            nan_string: "???".to_string(),
            infinity_check: InfinityCheck::Exact,
        }
    }
}

/// Partial update of a [`CommonConfig`]: unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct CommonUpdate {
    negative_string: Option<(String, String)>,
    infinity_string: Option<String>,
    negative_infinity_string: Option<Option<String>>,
    nan_string: Option<String>,
    infinity_check: Option<InfinityCheck>,
}

impl CommonUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn negative_string(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.negative_string = Some((prefix.into(), suffix.into()));
        self
    }

    pub fn infinity_string(mut self, value: impl Into<String>) -> Self {
        self.infinity_string = Some(value.into());
        self
    }

    pub fn negative_infinity_string(mut self, value: impl Into<String>) -> Self {
        self.negative_infinity_string = Some(Some(value.into()));
        self
    }

    /// Go back to deriving `-Infinity` from the negative string pair.
    pub fn clear_negative_infinity_string(mut self) -> Self {
        self.negative_infinity_string = Some(None);
        self
    }

    pub fn nan_string(mut self, value: impl Into<String>) -> Self {
        self.nan_string = Some(value.into());
        self
    }

    pub fn infinity_check(mut self, check: InfinityCheck) -> Self {
        self.infinity_check = Some(check);
        self
    }

    fn apply(self, config: &mut CommonConfig) {
        if let Some(pair) = self.negative_string {
            config.negative_string = pair;
        }
        if let Some(value) = self.infinity_string {
            config.infinity_string = value;
        }
        if let Some(value) = self.negative_infinity_string {
            config.negative_infinity_string = value;
        }
        if let Some(value) = self.nan_string {
            config.nan_string = value;
        }
        if let Some(check) = self.infinity_check {
            config.infinity_check = check;
        }
    }
}

/// A configured, pure value-to-string transform.
pub trait Notation: Send + Sync {
    /// Human readable name, used in logs and debug output.
    fn name(&self) -> &str;

    fn common(&self) -> &CommonConfig;

    fn common_mut(&mut self) -> &mut CommonConfig;

    /// Format a non-negative finite value.
    ///
    /// Must be total over `[0, Infinity)`. Negative or non-finite inputs are
    /// never passed in by [`NotationExt::format`].
    fn format_decimal(&self, value: &Decimal) -> String;

    /// Format a negative finite value. Defaults to the absolute value wrapped
    /// in the configured negative string pair.
    fn format_negative_decimal(&self, value: &Decimal) -> String {
        let (prefix, suffix) = &self.common().negative_string;
        format!("{prefix}{}{suffix}", self.format_decimal(&value.abs()))
    }
}

/// Entry points available on every notation.
///
/// Implemented for all notations through a blanket implementation so the
/// special-value dispatch cannot be replaced by an individual notation.
pub trait NotationExt: Notation {
    /// Format any value convertible into a [`Decimal`].
    fn format(&self, value: impl Into<Decimal>) -> String {
        let value = value.into();
        let common = self.common();
        if value.is_nan() {
            return common.nan_string.clone();
        }
        if common.infinity_check.holds(&value) {
            if !value.is_negative() {
                return common.infinity_string.clone();
            }
            return match &common.negative_infinity_string {
                Some(text) => text.clone(),
                None => {
                    let (prefix, suffix) = &common.negative_string;
                    format!("{prefix}{}{suffix}", common.infinity_string)
                }
            };
        }
        if value.is_negative() {
            self.format_negative_decimal(&value)
        } else {
            self.format_decimal(&value)
        }
    }

    /// Apply a bulk update of the shared strings and return `self` for chaining.
    fn configure(&mut self, update: CommonUpdate) -> &mut Self {
        update.apply(self.common_mut());
        self
    }
}

impl<N: Notation + ?Sized> NotationExt for N {}

/// Validated access to a notation's own configuration.
///
/// [`Configurable::install`] validates a complete configuration and rebuilds
/// any derived state from it before swapping it in; on error the notation is
/// left exactly as it was.
pub trait Configurable {
    type Config: Clone;

    fn config(&self) -> &Self::Config;

    fn install(&mut self, config: Self::Config) -> NotationResult<()>;

    /// Edit a copy of the current configuration and install it.
    fn reconfigure(&mut self, update: impl FnOnce(&mut Self::Config)) -> NotationResult<&mut Self>
    where
        Self: Sized,
    {
        let mut config = self.config().clone();
        update(&mut config);
        self.install(config)?;
        Ok(self)
    }
}

impl fmt::Debug for dyn Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notation({})", self.name())
    }
}

/// Append `body` surrounded by a delimiter pair.
pub(crate) fn push_wrapped(out: &mut String, (prefix, suffix): &(String, String), body: &str) {
    out.push_str(prefix);
    out.push_str(body);
    out.push_str(suffix);
}

/// Build an owned delimiter pair from two string slices.
pub(crate) fn pair(prefix: &str, suffix: &str) -> (String, String) {
    (prefix.to_string(), suffix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        common: CommonConfig,
    }

    impl Notation for Echo {
        fn name(&self) -> &str {
            "Echo"
        }

        fn common(&self) -> &CommonConfig {
            &self.common
        }

        fn common_mut(&mut self) -> &mut CommonConfig {
            &mut self.common
        }

        fn format_decimal(&self, value: &Decimal) -> String {
            assert!(!value.is_negative() && value.is_finite());
            value.to_string()
        }
    }

    fn echo() -> Echo {
        Echo {
            common: CommonConfig::default(),
        }
    }

    #[test]
    fn dispatches_special_values() {
        let notation = echo();
        assert_eq!(notation.format(Decimal::NAN), "???");
        assert_eq!(notation.format(Decimal::INFINITY), "Infinity");
        assert_eq!(notation.format(Decimal::NEG_INFINITY), "-Infinity");
        assert_eq!(notation.format(-4), "-4");
        assert_eq!(notation.format(0), "0");
    }

    #[test]
    fn bulk_update_keeps_unset_fields() {
        let mut notation = echo();
        notation
            .configure(CommonUpdate::new().negative_string("(", ")"))
            .configure(CommonUpdate::new().nan_string("NaN"));
        assert_eq!(notation.format(-4), "(4)");
        assert_eq!(notation.format(Decimal::NEG_INFINITY), "(Infinity)");
        assert_eq!(notation.format(Decimal::NAN), "NaN");
        assert_eq!(notation.common().infinity_string, "Infinity");

        notation.configure(CommonUpdate::new().negative_infinity_string("-inf"));
        assert_eq!(notation.format(Decimal::NEG_INFINITY), "-inf");
        notation.configure(CommonUpdate::new().clear_negative_infinity_string());
        assert_eq!(notation.format(Decimal::NEG_INFINITY), "(Infinity)");
    }

    #[test]
    fn threshold_infinity() {
        let mut notation = echo();
        notation.configure(
            CommonUpdate::new()
                .infinity_check(InfinityCheck::AtLeast(Decimal::from(1000)))
                .infinity_string("big"),
        );
        assert_eq!(notation.format(999), "999");
        assert_eq!(notation.format(1000), "big");
        assert_eq!(notation.format(-5000), "-big");

        notation.configure(CommonUpdate::new().infinity_check(InfinityCheck::Custom(Arc::new(
            |value: &Decimal| value.layer() >= 1,
        ))));
        assert_eq!(notation.format(5000), "5000");
        assert_eq!(notation.format(Decimal::from_log10(40.0)), "big");
        assert_eq!(notation.format(Decimal::INFINITY), "big");
    }
}
