//! Tower-notation: structural notations for arbitrarily large numbers.
//!
//! Every notation turns a [`Decimal`](tower_decimal::Decimal) into a string.
//! The shared special-value handling (`NaN`, infinities, the sign) lives in
//! [`NotationExt::format`](notation::NotationExt::format); each notation only
//! formats non-negative finite values. Composite notations format their
//! components through inner notations, so notations nest into graphs.
//!
//! Layout
//!  - [`notation`]: the contract, shared strings and the configuration trait.
//!  - [`error`]: configuration errors.
//!  - [`plain`]: fixed and scientific text, the default inner notation.
//!  - [`fraction`]: continued-fraction approximation.
//!  - [`hypersplit`]: mantissa / exponent / tetration / pentation split.
//!  - [`prestige`]: prestige layers with rampings and hyperlayers.
//!  - [`polygonal`], [`factorial`]: iterated polygonal roots and inverse factorials.
//!
//! Example
//! ```
//! use std::sync::Arc;
//! use tower_notation::prelude::*;
//!
//! let mut fraction = FractionNotation::default();
//! fraction
//!     .reconfigure(|cfg| {
//!         cfg.mixed = true;
//!         cfg.whole_notation = Arc::new(PrestigeLayerNotation::default());
//!     })
//!     .unwrap()
//!     .configure(CommonUpdate::new().negative_string("(", ")"));
//! assert_eq!(fraction.format(-2.5), "(2 1/2)");
//! ```

pub mod error;
pub mod factorial;
pub mod fraction;
pub mod hypersplit;
pub mod notation;
pub mod plain;
pub mod polygonal;
pub mod prestige;

pub mod prelude {
    pub use crate::error::{NotationError, NotationResult};
    pub use crate::factorial::{FactorialConfig, FactorialNotation};
    pub use crate::fraction::{FractionConfig, FractionNotation, FractionOrder};
    pub use crate::hypersplit::{HyperLevel, HypersplitConfig, HypersplitNotation, Rounding, ShowPolicy};
    pub use crate::notation::{
        CommonConfig, CommonUpdate, Configurable, InfinityCheck, Notation, NotationExt, SharedNotation,
    };
    pub use crate::plain::{PlainConfig, PlainNotation, plain};
    pub use crate::polygonal::{PolygonalConfig, PolygonalNotation};
    pub use crate::prestige::{LayerPosition, PrestigeLayerConfig, PrestigeLayerNotation, Ramping};
}
