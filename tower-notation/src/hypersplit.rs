//! Hyperoperator decomposition.
//!
//! A value is split into `(mantissa, exponent, tetration, pentation)` so that
//!
//! ```text
//! value = P^pentation( E^tetration( mantissa * base^exponent ) )
//! ```
//!
//! where `E(x) = base^x` and `P(x) = base^^x`. Each level rolls over into the
//! next one once it reaches its threshold, the same way digits carry in a
//! positional system.
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use strum::{EnumIter, IntoEnumIterator};
use tower_decimal::Decimal;

use crate::{
    error::{NotationError, NotationResult, ensure_above_one},
    notation::{
        CommonConfig, Configurable, Notation, NotationExt, SharedNotation, pair, push_wrapped,
    },
    plain::plain,
};

/// One level of the decomposition, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum HyperLevel {
    Mantissa,
    Exponent,
    Tetration,
    Pentation,
}

impl HyperLevel {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// When a component shows up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum ShowPolicy {
    #[default]
    Always,
    /// Hidden when the component is zero.
    HideZero,
    /// Shown only when some higher component is non-zero.
    WhenHigherNonZero,
}

/// Computes a rounding unit from the mantissa it will be applied to.
pub type UnitRule = Arc<dyn Fn(&Decimal) -> Decimal + Send + Sync>;

/// Final snapping of the mantissa.
///
/// A mantissa rounded up to its threshold carries into the exponent, so
/// `9.999` with a unit of `0.01` splits like `10` does. Values below the
/// configured minimum are never split and never rounded.
#[derive(Clone, Default)]
pub enum Rounding {
    #[default]
    None,
    /// Nearest multiple of a fixed unit.
    Unit(Decimal),
    /// Nearest multiple of a unit computed from the mantissa.
    Rule(UnitRule),
}

impl fmt::Debug for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::None => write!(f, "None"),
            Rounding::Unit(unit) => write!(f, "Unit({unit})"),
            Rounding::Rule(_) => write!(f, "Rule(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HypersplitConfig {
    pub base: Decimal,
    /// Rollover thresholds of the mantissa, exponent and tetration.
    pub maximums: [Decimal; 3],
    /// Thresholds used while the next level up is still zero. Derived from
    /// `maximums` when unset: `[maximum, base^maximum, base^maximum]`.
    pub original_maximums: Option<[Decimal; 3]>,
    /// How much the exponent, tetration and pentation grow per rollover.
    pub steps: [u64; 3],
    /// Values below this are not decomposed at all.
    pub minimum: Decimal,
    pub rounding: Rounding,
    /// Indexed by [`HyperLevel::index`], as are the delimiters and notations.
    pub show: [ShowPolicy; 4],
    pub delimiters: [(String, String); 4],
    pub notations: [SharedNotation; 4],
    /// Output order, a permutation of the four levels.
    pub order: [HyperLevel; 4],
    pub max_rollovers: usize,
}

impl Default for HypersplitConfig {
    fn default() -> Self {
        Self {
            base: Decimal::TEN,
            maximums: [Decimal::TEN; 3],
            original_maximums: None,
            steps: [1; 3],
            minimum: Decimal::ONE,
            rounding: Rounding::None,
            show: [
                ShowPolicy::Always,
                ShowPolicy::HideZero,
                ShowPolicy::HideZero,
                ShowPolicy::HideZero,
            ],
            delimiters: [pair("", ""), pair("e", ""), pair("", "T "), pair("", "P ")],
            notations: [plain(), plain(), plain(), plain()],
            order: [
                HyperLevel::Pentation,
                HyperLevel::Tetration,
                HyperLevel::Mantissa,
                HyperLevel::Exponent,
            ],
            max_rollovers: 1_000,
        }
    }
}

impl HypersplitConfig {
    fn validate(&self) -> NotationResult<()> {
        ensure_above_one("base", self.base)?;
        for maximum in self.maximums {
            ensure_above_one("maximums", maximum)?;
        }
        for maximum in self.original_maximums.iter().flatten() {
            ensure_above_one("original_maximums", *maximum)?;
        }
        if self.steps.contains(&0) {
            return Err(NotationError::out_of_range(
                "steps",
                "at least 1 on every level",
                format!("{:?}", self.steps),
            ));
        }
        if !(self.minimum.is_finite() && self.minimum >= Decimal::ZERO) {
            return Err(NotationError::out_of_range(
                "minimum",
                "a finite non-negative number",
                self.minimum,
            ));
        }
        if let Rounding::Unit(unit) = self.rounding
            && !(unit.is_finite() && unit.is_positive())
        {
            return Err(NotationError::out_of_range(
                "rounding",
                "a finite positive unit",
                unit,
            ));
        }
        if self.max_rollovers == 0 {
            return Err(NotationError::out_of_range("max_rollovers", "at least 1", 0));
        }
        let permutation = HyperLevel::iter().all(|level| self.order.contains(&level));
        if !permutation {
            return Err(NotationError::InvalidOrder {
                order: format!("{:?}", self.order),
            });
        }
        Ok(())
    }

    fn thresholds(&self) -> Thresholds {
        let relaxed = self.original_maximums.unwrap_or_else(|| {
            [
                self.maximums[0],
                self.base.pow(self.maximums[1]),
                self.base.pow(self.maximums[2]),
            ]
        });
        Thresholds {
            normal: self.maximums,
            relaxed,
        }
    }
}

/// Rollover thresholds, rebuilt whenever the configuration changes.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
    normal: [Decimal; 3],
    relaxed: [Decimal; 3],
}

impl Thresholds {
    /// Threshold of `level`, relaxed while the level above it is still zero.
    fn at(&self, level: HyperLevel, above: &Decimal) -> Decimal {
        if above.is_zero() {
            self.relaxed[level.index()]
        } else {
            self.normal[level.index()]
        }
    }
}

/// The four components of a decomposed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperSplit {
    pub mantissa: Decimal,
    pub exponent: Decimal,
    pub tetration: Decimal,
    pub pentation: Decimal,
}

impl HyperSplit {
    fn unsplit(value: Decimal) -> Self {
        Self {
            mantissa: value,
            exponent: Decimal::ZERO,
            tetration: Decimal::ZERO,
            pentation: Decimal::ZERO,
        }
    }

    pub fn get(&self, level: HyperLevel) -> Decimal {
        match level {
            HyperLevel::Mantissa => self.mantissa,
            HyperLevel::Exponent => self.exponent,
            HyperLevel::Tetration => self.tetration,
            HyperLevel::Pentation => self.pentation,
        }
    }

    /// Rebuild the value the components stand for.
    pub fn recombine(&self, base: Decimal) -> Decimal {
        let times = |count: Decimal| count.to_f64().min(u64::MAX as f64) as u64;
        (self.mantissa * base.pow(self.exponent))
            .iterated_exp(base, times(self.tetration))
            .iterated_tetrate(base, times(self.pentation))
    }
}

/// Positional notation extended up the hyperoperator hierarchy.
///
/// ```
/// use tower_decimal::Decimal;
/// use tower_notation::prelude::*;
///
/// let hyper = HypersplitNotation::default();
/// assert_eq!(hyper.format(1e15), "1e15");
/// assert_eq!(hyper.format(Decimal::from_parts(1, 2, 11.0)), "2T 1.1e1");
/// ```
#[derive(Debug, Clone)]
pub struct HypersplitNotation {
    common: CommonConfig,
    config: HypersplitConfig,
    thresholds: Thresholds,
}

impl Default for HypersplitNotation {
    fn default() -> Self {
        let config = HypersplitConfig::default();
        Self {
            common: CommonConfig::default(),
            thresholds: config.thresholds(),
            config,
        }
    }
}

impl HypersplitNotation {
    pub fn new(config: HypersplitConfig) -> NotationResult<Self> {
        config.validate()?;
        Ok(Self {
            common: CommonConfig::default(),
            thresholds: config.thresholds(),
            config,
        })
    }

    /// Split the mantissa so that it drops below `threshold`, moving whole
    /// multiples of the exponent step into the exponent.
    fn carry_mantissa(&self, split: &mut HyperSplit, threshold: Decimal) {
        let base = self.config.base;
        let step = Decimal::from(self.config.steps[0]);
        let log = split.mantissa.log(base);
        let mut units = (log - threshold.log(base)).floor() + Decimal::ONE;
        units = (units / step).ceil() * step;
        split.mantissa = base.pow(log - units);
        split.exponent = split.exponent + units;
    }

    /// Decompose a non-negative finite value.
    pub fn split(&self, value: &Decimal) -> HyperSplit {
        if *value < self.config.minimum {
            return HyperSplit::unsplit(*value);
        }
        let base = self.config.base;
        let [_, tetration_step, pentation_step] = self.config.steps;
        let thresholds = &self.thresholds;
        let mut split = HyperSplit::unsplit(*value);

        let mut rollovers = 0;
        loop {
            if rollovers >= self.config.max_rollovers {
                debug!(
                    "hypersplit of {value} stopped after {rollovers} rollovers at {:?}",
                    split
                );
                break;
            }
            rollovers += 1;

            // Tall towers give up whole layers to the tetration at once.
            if split.exponent.is_zero() && split.mantissa.layer() > 3 {
                let jump = (split.mantissa.layer() - 3) / tetration_step * tetration_step;
                if jump > 0 {
                    split.mantissa = split.mantissa.iterated_log(base, jump);
                    split.tetration = split.tetration + Decimal::from(jump);
                    trace!("hypersplit jumped {jump} layers: {split:?}");
                    continue;
                }
            }

            let mantissa_limit = thresholds.at(HyperLevel::Mantissa, &split.exponent);
            if split.mantissa >= mantissa_limit {
                self.carry_mantissa(&mut split, mantissa_limit);
                trace!("mantissa rollover: {split:?}");
                continue;
            }

            let exponent_limit = thresholds.at(HyperLevel::Exponent, &split.tetration);
            if split.exponent >= exponent_limit {
                let lowered = (split.exponent + split.mantissa.log(base))
                    .iterated_log(base, tetration_step - 1);
                split.mantissa = lowered;
                split.exponent = Decimal::ZERO;
                split.tetration = split.tetration + Decimal::from(tetration_step);
                trace!("exponent rollover: {split:?}");
                continue;
            }

            let tetration_limit = thresholds.at(HyperLevel::Tetration, &split.pentation);
            if split.tetration >= tetration_limit {
                let residual = split.mantissa * base.pow(split.exponent);
                let mut height = split.tetration + residual.slog(base);
                for _ in 1..pentation_step {
                    height = height.slog(base);
                }
                split = HyperSplit {
                    pentation: split.pentation + Decimal::from(pentation_step),
                    ..HyperSplit::unsplit(height)
                };
                trace!("tetration rollover: {split:?}");
                continue;
            }
            break;
        }

        self.round(&mut split);
        split
    }

    fn round(&self, split: &mut HyperSplit) {
        let unit = match &self.config.rounding {
            Rounding::None => return,
            Rounding::Unit(unit) => *unit,
            Rounding::Rule(rule) => rule(&split.mantissa),
        };
        if !(unit.is_finite() && unit.is_positive()) {
            return;
        }
        split.mantissa = (split.mantissa / unit).round() * unit;

        let limit = self.thresholds.at(HyperLevel::Mantissa, &split.exponent);
        if split.mantissa >= limit {
            self.carry_mantissa(split, limit);
        }
    }

    fn visible(&self, split: &HyperSplit, level: HyperLevel) -> bool {
        let value = split.get(level);
        match self.config.show[level.index()] {
            ShowPolicy::Always => true,
            ShowPolicy::HideZero => !value.is_zero(),
            ShowPolicy::WhenHigherNonZero => HyperLevel::iter()
                .filter(|higher| higher.index() > level.index())
                .any(|higher| !split.get(higher).is_zero()),
        }
    }
}

impl Notation for HypersplitNotation {
    fn name(&self) -> &str {
        "Hypersplit"
    }

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonConfig {
        &mut self.common
    }

    fn format_decimal(&self, value: &Decimal) -> String {
        let split = self.split(value);
        let mut out = String::new();
        for level in self.config.order {
            if !self.visible(&split, level) {
                continue;
            }
            let text = self.config.notations[level.index()].format(split.get(level));
            push_wrapped(&mut out, &self.config.delimiters[level.index()], &text);
        }
        out
    }
}

impl Configurable for HypersplitNotation {
    type Config = HypersplitConfig;

    fn config(&self) -> &HypersplitConfig {
        &self.config
    }

    fn install(&mut self, config: HypersplitConfig) -> NotationResult<()> {
        config.validate()?;
        let thresholds = config.thresholds();
        debug!("hypersplit notation reconfigured: {thresholds:?}");
        self.thresholds = thresholds;
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(split: HyperSplit) -> [f64; 4] {
        [
            split.mantissa.to_f64(),
            split.exponent.to_f64(),
            split.tetration.to_f64(),
            split.pentation.to_f64(),
        ]
    }

    #[test]
    fn relaxed_thresholds_keep_exponents_plain() {
        let hyper = HypersplitNotation::default();
        assert_eq!(parts(hyper.split(&Decimal::from(1e15))), [1.0, 15.0, 0.0, 0.0]);
        assert_eq!(parts(hyper.split(&Decimal::from(7))), [7.0, 0.0, 0.0, 0.0]);
        assert_eq!(parts(hyper.split(&Decimal::from(0.5))), [0.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn climbs_to_tetration() {
        let hyper = HypersplitNotation::default();
        let split = hyper.split(&Decimal::from_parts(1, 2, 11.0));
        let [m, e, t, p] = parts(split);
        assert!((m - 1.1).abs() < 1e-9);
        assert_eq!([e, t, p], [1.0, 2.0, 0.0]);
    }

    #[test]
    fn climbs_to_pentation() {
        let hyper = HypersplitNotation::default();
        let value = Decimal::TEN.tetrate(Decimal::from(2e10));
        let split = hyper.split(&value);
        assert_eq!(split.pentation, Decimal::ONE);
        assert!(split.tetration < Decimal::from(1e10));
        let back = split.recombine(Decimal::TEN);
        assert_eq!(back.layer(), value.layer());
    }

    #[test]
    fn tetration_without_relaxing() {
        let mut hyper = HypersplitNotation::default();
        hyper
            .reconfigure(|cfg| {
                cfg.original_maximums = Some([Decimal::TEN; 3]);
            })
            .unwrap();
        // 1e15 = 10^(1.5e1)
        let [m, e, t, p] = parts(hyper.split(&Decimal::from(1e15)));
        assert!((m - 1.5).abs() < 1e-9);
        assert_eq!([e, t, p], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn engineering_steps() {
        let mut hyper = HypersplitNotation::default();
        hyper
            .reconfigure(|cfg| {
                cfg.maximums[0] = Decimal::from(1000);
                cfg.steps = [3, 1, 1];
            })
            .unwrap();
        let [m, e, _, _] = parts(hyper.split(&Decimal::from(12345.0)));
        assert!((m - 12.345).abs() < 1e-9);
        assert_eq!(e, 3.0);
    }

    #[test]
    fn rounding_carries_into_exponent() {
        let mut hyper = HypersplitNotation::default();
        hyper
            .reconfigure(|cfg| cfg.rounding = Rounding::Unit(Decimal::from(0.01)))
            .unwrap();
        let split = hyper.split(&Decimal::from(9.9999e20));
        assert_eq!(split.exponent, Decimal::from(21));
        assert!((split.mantissa.to_f64() - 1.0).abs() < 1e-9);

        // Same carry without an exponent to start from.
        let split = hyper.split(&Decimal::from(9.999));
        assert_eq!(split.exponent, Decimal::ONE);
        assert!((split.mantissa.to_f64() - 1.0).abs() < 1e-9);
        assert_eq!(hyper.format(9.999), "1e1");
        assert_eq!(hyper.format(9.999), hyper.format(10));
        assert_eq!(hyper.format(9.5), "9.5");

        hyper
            .reconfigure(|cfg| {
                cfg.rounding = Rounding::Rule(Arc::new(|m: &Decimal| {
                    if *m < Decimal::from(5) {
                        Decimal::ONE
                    } else {
                        Decimal::from(5)
                    }
                }))
            })
            .unwrap();
        assert_eq!(hyper.format(3.4e20), "3e20");
        assert_eq!(hyper.format(8.0e20), "1e21");
    }

    #[test]
    fn show_policies() {
        let mut hyper = HypersplitNotation::default();
        assert_eq!(hyper.format(5), "5");
        hyper
            .reconfigure(|cfg| {
                cfg.show = [ShowPolicy::Always; 4];
                cfg.delimiters[3] = pair("", "P ");
            })
            .unwrap();
        assert_eq!(hyper.format(5), "0P 0T 5e0");
        hyper
            .reconfigure(|cfg| cfg.show[HyperLevel::Exponent.index()] = ShowPolicy::WhenHigherNonZero)
            .unwrap();
        assert_eq!(hyper.format(5), "0P 0T 5");
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut hyper = HypersplitNotation::default();
        assert!(matches!(
            hyper.reconfigure(|cfg| cfg.base = Decimal::ONE),
            Err(NotationError::InvalidBase { .. })
        ));
        assert!(matches!(
            hyper.reconfigure(|cfg| cfg.order[0] = HyperLevel::Mantissa),
            Err(NotationError::InvalidOrder { .. })
        ));
        assert!(hyper.reconfigure(|cfg| cfg.steps = [1, 0, 1]).is_err());
        assert_eq!(hyper.format(1e15), "1e15");
    }
}
