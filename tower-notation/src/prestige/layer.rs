//! Climbing the prestige ladder.
//!
//! Writing an amount as `u = log_R(a)`, one prestige maps `u` to
//! `(u - 1) / r`. Within an interval of constant `(r, R)` this is an affine
//! recurrence with fixed point `u* = -1 / (r - 1)`, so the number of layers
//! climbed is found in closed form instead of one prestige at a time:
//!
//! ```text
//! u_n = u* + (u_0 - u*) / r^n          (r > 1)
//! u_n = u_0 - n                        (r = 1)
//! ```
//!
//! A layer is reachable while `u_n >= 0`.
use log::debug;
use tower_decimal::Decimal;

use super::schedule::RampingSchedule;

/// Slack for float error when deciding whether one more layer is reached.
const TOLERANCE: f64 = 1e-9;

/// Layers above which one collapse step only strips logarithms.
const COLLAPSE_FROM_LAYER: u64 = 5;

/// Where a value sits on the ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rung {
    /// Highest layer with an amount of at least 1.
    pub layer: Decimal,
    /// `log_R(amount)` on that layer, in `[0, 1)` once `layer > 0`.
    pub progress: Decimal,
    pub amount: Decimal,
}

/// `u` after `n` prestiges at a constant root.
fn advance(root: Decimal, u: Decimal, n: Decimal) -> Decimal {
    if root == Decimal::ONE {
        return u - n;
    }
    let fixed = -(root - Decimal::ONE).recip();
    fixed + (u - fixed) / root.pow(n)
}

/// Number of prestiges available from `u` before the amount drops below 1.
fn natural_steps(root: Decimal, u: Decimal) -> Decimal {
    if u < Decimal::ONE {
        return Decimal::ZERO;
    }
    if root == Decimal::ONE {
        return u.floor();
    }
    (u * (root - Decimal::ONE) + Decimal::ONE).log(root).floor()
}

/// Closed-form step count, capped at `limit` and corrected for float error.
fn climb_interval(root: Decimal, u: Decimal, limit: Option<u64>) -> (Decimal, Decimal) {
    let tolerance = -Decimal::from(TOLERANCE);
    let limit = limit.map(Decimal::from);
    let mut steps = natural_steps(root, u);
    if let Some(limit) = limit {
        steps = steps.min(limit);
    }

    let next = steps + Decimal::ONE;
    if steps.is_positive() && advance(root, u, steps) < tolerance {
        steps = steps - Decimal::ONE;
    } else if limit.is_none_or(|limit| next <= limit) && advance(root, u, next) >= tolerance {
        steps = next;
    }
    (steps, advance(root, u, steps))
}

impl RampingSchedule {
    /// Natural layer of a non-negative value and the amount left on it.
    pub(crate) fn climb(&self, value: &Decimal) -> Rung {
        let checkpoints = self.checkpoints();
        let base = &checkpoints[0];
        if *value < Decimal::ONE {
            return Rung {
                layer: Decimal::ZERO,
                progress: value.log10() / base.log_requirement,
                amount: *value,
            };
        }

        let mut index = 0;
        let mut u = value.log10() / base.log_requirement;
        loop {
            let checkpoint = &checkpoints[index];
            let next = checkpoints.get(index + 1);
            let limit = next.map(|next| next.start - checkpoint.start);
            let (steps, climbed) = climb_interval(checkpoint.root, u, limit);

            if let Some(next) = next
                && steps == Decimal::from(next.start - checkpoint.start)
            {
                u = climbed * checkpoint.log_requirement / next.log_requirement;
                index += 1;
                continue;
            }

            let progress = climbed.clamp(Decimal::ZERO, Decimal::ONE);
            let layer = Decimal::from(checkpoint.start) + steps;
            let amount = if layer.is_zero() {
                *value
            } else {
                checkpoint.requirement.pow(progress)
            };
            return Rung {
                layer,
                progress,
                amount,
            };
        }
    }

    /// Continuous layer: the natural layer plus the progress towards the next.
    pub(crate) fn continuous_layer(&self, value: &Decimal) -> Decimal {
        let rung = self.climb(value);
        rung.layer + rung.progress.clamp(Decimal::ZERO, Decimal::ONE)
    }

    /// Replace the value by its continuous layer while `keep_going` holds,
    /// returning the final value and the number of replacements.
    ///
    /// Tall towers lose whole layers per replacement: the climb takes two
    /// logarithms when the open-ended interval has a root above 1 and one
    /// otherwise, so those are stripped directly.
    pub(crate) fn collapse(
        &self,
        value: Decimal,
        keep_going: impl Fn(&Decimal) -> bool,
        max_steps: u64,
    ) -> (Decimal, u64) {
        let per_step = if self.tail_root_above_one() { 2 } else { 1 };
        let mut value = value;
        let mut count: u64 = 0;
        for _ in 0..max_steps {
            if !keep_going(&value) {
                return (value, count);
            }
            if value.layer() > COLLAPSE_FROM_LAYER {
                let steps = (value.layer() - COLLAPSE_FROM_LAYER + 1) / per_step;
                if steps > 0 {
                    value = Decimal::from_parts(1, value.layer() - steps * per_step, value.mag());
                    count = count.saturating_add(steps);
                    continue;
                }
            }
            value = self.continuous_layer(&value);
            count += 1;
        }
        if keep_going(&value) {
            debug!("prestige collapse stopped after {max_steps} steps at {value}");
        }
        (value, count)
    }
}
