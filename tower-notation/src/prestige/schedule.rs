use tower_decimal::Decimal;

use crate::error::{NotationError, NotationResult, ensure_above_one};

/// A change of growth rate from `layer` onwards.
///
/// The effective root is multiplied by `root_multiplier` and the effective
/// requirement raised to `requirement_exponent`. Effects accumulate: a later
/// ramping applies on top of every earlier one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramping {
    pub layer: u64,
    pub root_multiplier: Decimal,
    pub requirement_exponent: Decimal,
}

impl Ramping {
    pub fn new(layer: u64, root_multiplier: impl Into<Decimal>, requirement_exponent: impl Into<Decimal>) -> Self {
        Self {
            layer,
            root_multiplier: root_multiplier.into(),
            requirement_exponent: requirement_exponent.into(),
        }
    }
}

/// Parameters in force from `start` up to the next checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Checkpoint {
    pub start: u64,
    pub root: Decimal,
    pub requirement: Decimal,
    /// `log10(requirement)`, used to move amounts between requirements.
    pub log_requirement: Decimal,
}

/// Effective root and requirement of every layer, rebuilt from the
/// configuration on each change.
#[derive(Debug, Clone, PartialEq)]
pub struct RampingSchedule {
    checkpoints: Vec<Checkpoint>,
}

impl RampingSchedule {
    pub fn build(root: Decimal, requirement: Decimal, rampings: &[Ramping]) -> NotationResult<Self> {
        ensure_root(root)?;
        ensure_above_one("requirement", requirement)?;

        let mut rampings = rampings.to_vec();
        rampings.sort_by_key(|ramping| ramping.layer);
        if let Some(pair) = rampings.windows(2).find(|pair| pair[0].layer == pair[1].layer) {
            return Err(NotationError::DuplicateRamping {
                layer: pair[0].layer,
            });
        }

        let mut checkpoints = vec![Checkpoint {
            start: 0,
            root,
            requirement,
            log_requirement: requirement.log10(),
        }];
        for ramping in &rampings {
            for (parameter, factor) in [
                ("root_multiplier", ramping.root_multiplier),
                ("requirement_exponent", ramping.requirement_exponent),
            ] {
                if !(factor.is_finite() && factor.is_positive()) {
                    return Err(NotationError::out_of_range(
                        parameter,
                        "a finite positive number",
                        factor,
                    ));
                }
            }
            let last = checkpoints[checkpoints.len() - 1];
            let root = last.root * ramping.root_multiplier;
            let requirement = last.requirement.pow(ramping.requirement_exponent);
            ensure_root(root)?;
            ensure_above_one("requirement", requirement)?;

            let checkpoint = Checkpoint {
                start: ramping.layer,
                root,
                requirement,
                log_requirement: requirement.log10(),
            };
            // A ramping on layer 0 replaces the base parameters.
            if ramping.layer == 0 {
                checkpoints[0] = checkpoint;
            } else {
                checkpoints.push(checkpoint);
            }
        }
        Ok(Self { checkpoints })
    }

    /// Single interval schedule, for parameters already known to be valid.
    pub(crate) fn constant(root: Decimal, requirement: Decimal) -> Self {
        Self {
            checkpoints: vec![Checkpoint {
                start: 0,
                root,
                requirement,
                log_requirement: requirement.log10(),
            }],
        }
    }

    pub(crate) fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    fn checkpoint(&self, layer: u64) -> &Checkpoint {
        let index = self
            .checkpoints
            .partition_point(|checkpoint| checkpoint.start <= layer);
        &self.checkpoints[index.saturating_sub(1)]
    }

    /// Effective `(root, requirement)` of `layer`.
    pub fn at(&self, layer: u64) -> (Decimal, Decimal) {
        let checkpoint = self.checkpoint(layer);
        (checkpoint.root, checkpoint.requirement)
    }

    /// Whether the root of the last (open ended) interval exceeds 1.
    pub(crate) fn tail_root_above_one(&self) -> bool {
        self.checkpoints
            .last()
            .is_some_and(|checkpoint| checkpoint.root > Decimal::ONE)
    }
}

fn ensure_root(root: Decimal) -> NotationResult<()> {
    if root.is_finite() && root >= Decimal::ONE {
        Ok(())
    } else {
        Err(NotationError::out_of_range("root", "a finite number of at least 1", root))
    }
}
