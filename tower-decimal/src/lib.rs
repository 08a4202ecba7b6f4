//! Tower-decimal: a layered, arbitrary-magnitude decimal value.
//!
//! A [`Decimal`] stores a sign, a `layer` count and an `f64` magnitude and
//! stands for `sign * 10^10^...^mag` with `layer` exponentiations. This keeps
//! ordinary numbers exact up to f64 precision while still representing values
//! such as `10^^1000` (a power tower of a thousand tens).
//!
//! Layout
//!  - [`decimal`]: the value type, normalisation, sentinels and ordering.
//!  - [`arith`]: `+ - * /` and their assigning forms.
//!  - [`hyper`]: logarithms, powers, tetration, super-logarithm and pentation.
//!  - [`convert`]: primitive, `BigInt` and `BigDecimal` conversions.
//!  - [`parse`]: `Display` and `FromStr`.
//!
//! Example
//! ```
//! use tower_decimal::Decimal;
//!
//! let googol = Decimal::from(10).pow(Decimal::from(100));
//! assert_eq!(googol.log10(), Decimal::from(100));
//!
//! let tower = Decimal::from(10).tetrate(Decimal::from(4));
//! assert_eq!(tower.layer(), 2);
//! assert_eq!(tower.to_string(), "ee10000000000");
//! ```

pub mod arith;
pub mod convert;
pub mod decimal;
pub mod hyper;
pub mod parse;

pub use decimal::Decimal;
pub use parse::ParseDecimalError;
