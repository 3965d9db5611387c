use crate::generator::{BuildError, rng::ReversibleRng};

/// An atomic rule for picking an index from the visited-active list.
/// Only `Random` consumes a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Random,
    First,
    Last,
    Middle,
}

impl Policy {
    fn select(self, size: usize, rng: &mut ReversibleRng) -> usize {
        match self {
            Policy::Random => rng.next_index(size),
            Policy::First => 0,
            Policy::Last => size - 1,
            Policy::Middle => size / 2,
        }
    }
}

/// The selection strategy parameterizing the growing-tree algorithm family.
/// Which cell gets grown from next decides the maze's structural bias:
/// `Last` gives long winding corridors, `Random` gives short dead ends, and
/// the compound variants blend the two.
#[derive(Debug, Clone)]
pub enum Selector {
    Single(Policy),
    /// Delegates to `primary` with probability `primary_chance`, else to
    /// `secondary`. The branch decision costs one draw.
    Double {
        primary: Policy,
        secondary: Policy,
        primary_chance: f64,
    },
    /// Weighted choice among several policies. One draw in
    /// `[0, total_weight)` picks the branch.
    Multi {
        policies: Vec<Policy>,
        weights: Vec<f64>,
        total_weight: f64,
    },
}

impl Selector {
    pub fn single(policy: Policy) -> Selector {
        Selector::Single(policy)
    }

    pub fn double(
        primary: Policy,
        secondary: Policy,
        primary_chance: f64,
    ) -> Result<Selector, BuildError> {
        if !(0.0..=1.0).contains(&primary_chance) {
            return Err(BuildError::ProbabilityOutOfRange {
                value: primary_chance,
            });
        }
        Ok(Selector::Double {
            primary,
            secondary,
            primary_chance,
        })
    }

    pub fn multi(policies: Vec<Policy>, weights: Vec<f64>) -> Result<Selector, BuildError> {
        if policies.is_empty() {
            return Err(BuildError::EmptyWeights);
        }
        if policies.len() != weights.len() {
            return Err(BuildError::MismatchedWeights {
                policies: policies.len(),
                weights: weights.len(),
            });
        }
        if let Some(&value) = weights.iter().find(|w| !(0.0..=1.0).contains(*w)) {
            return Err(BuildError::WeightOutOfRange { value });
        }
        let total_weight: f64 = weights.iter().sum();
        if total_weight <= 0.0 {
            return Err(BuildError::ZeroTotalWeight);
        }
        Ok(Selector::Multi {
            policies,
            weights,
            total_weight,
        })
    }

    /// Always grows from the most recently visited cell.
    pub fn recursive_backtracker() -> Selector {
        Selector::Single(Policy::Last)
    }

    /// Behaviorally identical to [`Selector::recursive_backtracker`] in this
    /// formulation; kept as a distinct name because the two algorithms
    /// diverge only in how they are blended.
    pub fn prim() -> Selector {
        Selector::Single(Policy::Last)
    }

    /// Picks an index in `[0, size)`. `size` must be at least 1; the engine
    /// never selects from an empty list.
    pub fn select(&self, size: usize, rng: &mut ReversibleRng) -> usize {
        match self {
            Selector::Single(policy) => policy.select(size, rng),
            Selector::Double {
                primary,
                secondary,
                primary_chance,
            } => {
                if rng.next_f64() < *primary_chance {
                    primary.select(size, rng)
                } else {
                    secondary.select(size, rng)
                }
            }
            Selector::Multi {
                policies,
                weights,
                total_weight,
            } => {
                let draw = rng.next_f64_below(*total_weight);
                policies[weighted_bucket(weights, draw)].select(size, rng)
            }
        }
    }
}

/// A 50/50 blend of uniform-random and most-recent selection.
impl Default for Selector {
    fn default() -> Self {
        Selector::Double {
            primary: Policy::Random,
            secondary: Policy::Last,
            primary_chance: 0.5,
        }
    }
}

/// Cumulative-weight lookup: bucket `i` is chosen iff
/// `cum[i-1] <= draw < cum[i]`. A draw landing exactly on a bucket boundary
/// falls into the *next* bucket, never the one whose cumulative sum it
/// equals.
fn weighted_bucket(weights: &[f64], draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (bucket, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        if draw < cumulative {
            return bucket;
        }
    }
    // Only reachable when rounding pushes the summed total below the draw.
    weights.len() - 1
}
