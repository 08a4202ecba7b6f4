//! Prestige layers: an endless ladder of currencies.
//!
//! Layer `L + 1` costs `requirement` of layer `L`, and the amount on layer
//! `L + 1` is the `root`-th root of what that purchase leaves over:
//! `a_{L+1} = (a_L / R_L)^(1 / r_L)`. A value is written as the amount left on
//! its natural layer followed by the layer index, e.g. `2.371 [3]`.
//!
//! In recursive mode the layer index is itself written with the same notation
//! once it exceeds the requirement. The nesting depth is threaded through
//! every call; past `max_depth` the remaining tower is collapsed into a
//! bounded payload and a hyperlayer count, e.g. `1 [1 {2}]`.
mod layer;
mod schedule;

use log::debug;
use tower_decimal::Decimal;

use crate::{
    error::{NotationError, NotationResult},
    notation::{CommonConfig, Configurable, Notation, NotationExt, SharedNotation, pair, push_wrapped},
    plain::plain,
};

pub use schedule::{Ramping, RampingSchedule};

/// Side of the amount on which the layer markup is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayerPosition {
    Before,
    #[default]
    After,
}

#[derive(Debug, Clone)]
pub struct PrestigeLayerConfig {
    /// At least 1; 1 makes every layer cost the same number of decades.
    pub root: Decimal,
    /// Must exceed 1.
    pub requirement: Decimal,
    pub rampings: Vec<Ramping>,
    /// Write the layer markup for values that stay on layer 0.
    pub show_zero_layer: bool,
    pub layer_delimiters: (String, String),
    pub layer_position: LayerPosition,
    /// Write layer indices that exceed the requirement with this notation.
    pub recursive: bool,
    /// Nesting depth after which recursive output switches to the hyperlayer form.
    pub max_depth: usize,
    /// Number of `x -> (x / requirement)^(1 / root)` transforms applied to the
    /// hyperlayer payload. 0 leaves it in `[1, requirement)`.
    pub hyperlayer_power: u32,
    pub hyperlayer_delimiters: (String, String),
    pub max_hyperlayer_steps: u64,
    pub amount_notation: SharedNotation,
    pub layer_notation: SharedNotation,
}

impl Default for PrestigeLayerConfig {
    fn default() -> Self {
        Self {
            root: Decimal::TWO,
            requirement: Decimal::TEN,
            rampings: Vec::new(),
            show_zero_layer: false,
            layer_delimiters: pair(" [", "]"),
            layer_position: LayerPosition::After,
            recursive: false,
            max_depth: 3,
            hyperlayer_power: 0,
            hyperlayer_delimiters: pair(" {", "}"),
            max_hyperlayer_steps: 10_000,
            amount_notation: plain(),
            layer_notation: plain(),
        }
    }
}

impl PrestigeLayerConfig {
    /// Validate everything and build the ramping schedule in one go.
    fn schedule(&self) -> NotationResult<RampingSchedule> {
        if self.max_hyperlayer_steps == 0 {
            return Err(NotationError::out_of_range(
                "max_hyperlayer_steps",
                "at least 1",
                0,
            ));
        }
        RampingSchedule::build(self.root, self.requirement, &self.rampings)
    }
}

/// Value written as an amount on its natural prestige layer.
///
/// ```
/// use tower_notation::prelude::*;
///
/// let prestige = PrestigeLayerNotation::default();
/// assert_eq!(prestige.format(5), "5");
/// assert_eq!(prestige.format(1e10), "2.371 [3]");
/// ```
#[derive(Debug, Clone)]
pub struct PrestigeLayerNotation {
    common: CommonConfig,
    config: PrestigeLayerConfig,
    schedule: RampingSchedule,
}

impl Default for PrestigeLayerNotation {
    fn default() -> Self {
        let config = PrestigeLayerConfig::default();
        let schedule = RampingSchedule::constant(config.root, config.requirement);
        Self {
            common: CommonConfig::default(),
            config,
            schedule,
        }
    }
}

impl PrestigeLayerNotation {
    pub fn new(config: PrestigeLayerConfig) -> NotationResult<Self> {
        let schedule = config.schedule()?;
        Ok(Self {
            common: CommonConfig::default(),
            config,
            schedule,
        })
    }

    pub fn schedule(&self) -> &RampingSchedule {
        &self.schedule
    }

    /// Layer reached by `value`: the natural layer when `rounded`, otherwise
    /// the natural layer plus the logarithmic progress towards the next one.
    pub fn get_layer(&self, value: impl Into<Decimal>, rounded: bool) -> Decimal {
        let value = value.into().abs();
        if rounded {
            self.schedule.climb(&value).layer
        } else {
            self.schedule.continuous_layer(&value)
        }
    }

    /// `(amount, layer)`: the amount left on the natural layer, always below
    /// the requirement of that layer.
    pub fn layer_and_currency(&self, value: impl Into<Decimal>) -> (Decimal, Decimal) {
        let value = value.into().abs();
        if value.is_zero() {
            return (Decimal::ZERO, Decimal::ZERO);
        }
        let rung = self.schedule.climb(&value);
        (rung.amount, rung.layer)
    }

    /// [`Self::get_layer`] (unrounded) applied `times` times.
    pub fn iterated_layer(&self, value: impl Into<Decimal>, times: u64) -> Decimal {
        let mut value = value.into().abs();
        for _ in 0..times {
            if value.is_zero() {
                break;
            }
            value = self.schedule.continuous_layer(&value);
        }
        value
    }

    /// Number of unrounded layer steps that bring `value` down to at most 1.
    pub fn get_hyperlayer(&self, value: impl Into<Decimal>) -> u64 {
        let value = value.into().abs();
        self.schedule
            .collapse(value, |v| *v > Decimal::ONE, self.config.max_hyperlayer_steps)
            .1
    }

    fn render(&self, value: &Decimal, depth: usize) -> String {
        let config = &self.config;
        let (amount, layer) = self.layer_and_currency(*value);
        let amount_text = config.amount_notation.format(amount);
        if layer.is_zero() && !config.show_zero_layer {
            return amount_text;
        }

        let layer_text = if config.recursive && layer > config.requirement {
            if depth + 1 > config.max_depth {
                self.render_hyperlayer(&layer, depth + 1)
            } else {
                self.render(&layer, depth + 1)
            }
        } else {
            config.layer_notation.format(layer)
        };

        let mut out = String::new();
        if config.layer_position == LayerPosition::Before {
            push_wrapped(&mut out, &config.layer_delimiters, &layer_text);
            out.push_str(&amount_text);
        } else {
            out.push_str(&amount_text);
            push_wrapped(&mut out, &config.layer_delimiters, &layer_text);
        }
        out
    }

    /// Flattened form of a layer index too deep to nest further.
    fn render_hyperlayer(&self, value: &Decimal, depth: usize) -> String {
        let config = &self.config;
        let requirement = config.requirement;
        let (mut payload, collapsed) = self.schedule.collapse(
            *value,
            |v| *v >= requirement,
            config.max_hyperlayer_steps,
        );
        for _ in 0..config.hyperlayer_power {
            payload = (payload / requirement).root(config.root);
        }
        let count = Decimal::from(depth as u64) + Decimal::from(collapsed);
        debug!("prestige output flattened at depth {depth}, {collapsed} layers collapsed");

        let mut out = config.amount_notation.format(payload);
        let count_text = config.layer_notation.format(count);
        push_wrapped(&mut out, &config.hyperlayer_delimiters, &count_text);
        out
    }
}

impl Notation for PrestigeLayerNotation {
    fn name(&self) -> &str {
        "PrestigeLayer"
    }

    fn common(&self) -> &CommonConfig {
        &self.common
    }

    fn common_mut(&mut self) -> &mut CommonConfig {
        &mut self.common
    }

    fn format_decimal(&self, value: &Decimal) -> String {
        self.render(value, 0)
    }
}

impl Configurable for PrestigeLayerNotation {
    type Config = PrestigeLayerConfig;

    fn config(&self) -> &PrestigeLayerConfig {
        &self.config
    }

    fn install(&mut self, config: PrestigeLayerConfig) -> NotationResult<()> {
        let schedule = config.schedule()?;
        debug!(
            "prestige notation reconfigured: root {}, requirement {}, {} rampings",
            config.root,
            config.requirement,
            config.rampings.len()
        );
        self.schedule = schedule;
        self.config = config;
        Ok(())
    }
}
