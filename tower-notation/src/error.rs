use thiserror::Error;
use tower_decimal::Decimal;

/// Configuration errors raised when a notation is built or reconfigured.
///
/// Formatting itself never fails; these only surface from `new` and
/// `reconfigure`, and a rejected update leaves the notation untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotationError {
    /// A base (or requirement acting as one) must be a finite number above 1.
    #[error("Parameter `{parameter}` must be a finite number greater than 1, found {value}")]
    InvalidBase {
        parameter: &'static str,
        value: Decimal,
    },

    /// A parameter falls outside of its documented range.
    #[error("Parameter `{parameter}` is out of range: expected {expected}, found {found}")]
    OutOfRange {
        parameter: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Two rampings were scheduled on the same layer.
    #[error("Two rampings are scheduled on layer {layer}; each layer accepts at most one")]
    DuplicateRamping { layer: u64 },

    /// A token ordering is not a permutation of the expected tokens.
    #[error("Token order `{order}` must list every component exactly once")]
    InvalidOrder { order: String },

    /// Polygonal numbers need at least three sides.
    #[error("A polygon needs at least 3 sides, found {sides}")]
    InvalidPolygon { sides: Decimal },
}

pub type NotationResult<T> = Result<T, NotationError>;

impl NotationError {
    pub(crate) fn out_of_range(
        parameter: &'static str,
        expected: &'static str,
        found: impl std::fmt::Display,
    ) -> Self {
        Self::OutOfRange {
            parameter,
            expected,
            found: found.to_string(),
        }
    }
}

/// Reject anything that is not a finite value strictly above 1.
pub(crate) fn ensure_above_one(parameter: &'static str, value: Decimal) -> NotationResult<()> {
    if value.is_finite() && value > Decimal::ONE {
        Ok(())
    } else {
        Err(NotationError::InvalidBase { parameter, value })
    }
}
