//! Parameter grid construction and trial expansion
//!
//! A power study crosses a sequence of per-group sample sizes with a sequence
//! of effect sizes. Every unique pairing becomes a [`Combination`] with a
//! stable id, and every combination is replicated across the requested number
//! of iterations to form the [`Trial`]s the evaluator runs.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Unique identifier for a (sample size, effect size) combination.
///
/// Ids are 1-based and assigned in row-major order over the cartesian product
/// of the input sequences: sample sizes outer, effect sizes inner. Given
/// identical inputs the assignment is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombinationId(pub u32);

/// One (sample_size, effect_size) pairing under study
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub id: CombinationId,
    pub sample_size: usize,
    pub effect_size: f64,
}

/// One simulated run of an evaluator for a given combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub combination: Combination,
    /// 1-based repetition index within the combination
    pub iteration: usize,
}

/// The sample-size × effect-size parameter space for one power study.
///
/// Inputs are deduplicated on construction, preserving first-occurrence
/// order, so combination ids remain a bijection onto the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGrid {
    sample_sizes: Vec<usize>,
    effect_sizes: Vec<f64>,
}

impl ParameterGrid {
    pub fn new(sample_sizes: Vec<usize>, effect_sizes: Vec<f64>) -> Result<Self, ConfigError> {
        if sample_sizes.is_empty() {
            return Err(ConfigError::EmptySampleSizes);
        }
        if effect_sizes.is_empty() {
            return Err(ConfigError::EmptyEffectSizes);
        }
        for (index, &value) in sample_sizes.iter().enumerate() {
            if value == 0 {
                return Err(ConfigError::ZeroSampleSize { index });
            }
        }
        for (index, &value) in effect_sizes.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteEffectSize { index, value });
            }
        }

        let mut seen_sizes = FxHashSet::default();
        let sample_sizes: Vec<usize> = sample_sizes
            .into_iter()
            .filter(|v| seen_sizes.insert(*v))
            .collect();

        let mut seen_effects = FxHashSet::default();
        let effect_sizes: Vec<f64> = effect_sizes
            .into_iter()
            .filter(|v| seen_effects.insert(v.to_bits()))
            .collect();

        Ok(Self {
            sample_sizes,
            effect_sizes,
        })
    }

    #[must_use]
    pub fn sample_sizes(&self) -> &[usize] {
        &self.sample_sizes
    }

    #[must_use]
    pub fn effect_sizes(&self) -> &[f64] {
        &self.effect_sizes
    }

    /// Grid shape as (sample size count, effect size count)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.sample_sizes.len(), self.effect_sizes.len())
    }

    #[must_use]
    pub fn total_combinations(&self) -> usize {
        self.sample_sizes.len() * self.effect_sizes.len()
    }

    #[must_use]
    pub fn total_trials(&self, iterations: usize) -> usize {
        self.total_combinations() * iterations
    }

    /// All combinations in id order
    #[must_use]
    pub fn combinations(&self) -> Vec<Combination> {
        let mut out = Vec::with_capacity(self.total_combinations());
        let mut next_id = 1u32;
        for &sample_size in &self.sample_sizes {
            for &effect_size in &self.effect_sizes {
                out.push(Combination {
                    id: CombinationId(next_id),
                    sample_size,
                    effect_size,
                });
                next_id += 1;
            }
        }
        out
    }

    /// Look up the combination an id maps to, if the id was assigned by this grid
    #[must_use]
    pub fn combination(&self, id: CombinationId) -> Option<Combination> {
        let index = (id.0 as usize).checked_sub(1)?;
        if index >= self.total_combinations() {
            return None;
        }
        let inner = self.effect_sizes.len();
        Some(Combination {
            id,
            sample_size: self.sample_sizes[index / inner],
            effect_size: self.effect_sizes[index % inner],
        })
    }
}

/// Expand every combination into `iterations` trials.
///
/// Trials come out grouped by combination, not interleaved; callers must not
/// rely on this grouping since execution order is unspecified anyway.
#[must_use]
pub fn expand_trials(combinations: &[Combination], iterations: usize) -> Vec<Trial> {
    let mut trials = Vec::with_capacity(combinations.len() * iterations);
    for combination in combinations {
        for iteration in 1..=iterations {
            trials.push(Trial {
                combination: *combination,
                iteration,
            });
        }
    }
    trials
}
