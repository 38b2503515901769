//! Power aggregation
//!
//! Groups a result set by combination and computes the empirical rejection
//! proportion per cell. Grouping is hash-based, so the aggregate never
//! depends on row order; the result set makes no ordering promise.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::PowerError;
use crate::grid::{CombinationId, ParameterGrid};
use crate::result::ResultSet;

/// One cell of the power surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCell {
    pub combination_id: CombinationId,
    pub sample_size: usize,
    pub effect_size: f64,
    /// Trials observed for this combination
    pub trials: usize,
    /// Trials whose outcome fell below the significance threshold
    pub rejections: usize,
    /// Empirical rejection proportion
    pub power: f64,
}

/// Empirical rejection proportions over a sample-size × effect-size grid.
///
/// Cells are stored row-major, sample sizes outer and effect sizes inner,
/// the same order combination ids are assigned in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSurface {
    sample_sizes: Vec<usize>,
    effect_sizes: Vec<f64>,
    cells: Vec<PowerCell>,
}

impl PowerSurface {
    #[must_use]
    pub fn sample_sizes(&self) -> &[usize] {
        &self.sample_sizes
    }

    #[must_use]
    pub fn effect_sizes(&self) -> &[f64] {
        &self.effect_sizes
    }

    /// All cells in combination-id order
    #[must_use]
    pub fn cells(&self) -> &[PowerCell] {
        &self.cells
    }

    /// Surface shape as (sample size count, effect size count)
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.sample_sizes.len(), self.effect_sizes.len())
    }

    /// The cell at (sample index, effect index)
    #[must_use]
    pub fn cell(&self, sample_index: usize, effect_index: usize) -> Option<&PowerCell> {
        if sample_index >= self.sample_sizes.len() || effect_index >= self.effect_sizes.len() {
            return None;
        }
        self.cells
            .get(sample_index * self.effect_sizes.len() + effect_index)
    }

    /// Power as a function of sample size at a fixed effect size:
    /// (sample_size, power) pairs in ascending grid order
    #[must_use]
    pub fn curve(&self, effect_index: usize) -> Option<Vec<(usize, f64)>> {
        if effect_index >= self.effect_sizes.len() {
            return None;
        }
        Some(
            self.sample_sizes
                .iter()
                .enumerate()
                .map(|(i, &n)| {
                    let cell = &self.cells[i * self.effect_sizes.len() + effect_index];
                    (n, cell.power)
                })
                .collect(),
        )
    }

    /// Row-major power values plus (rows, cols) shape, for heatmap rendering
    #[must_use]
    pub fn heatmap(&self) -> (Vec<f64>, usize, usize) {
        let values = self.cells.iter().map(|c| c.power).collect();
        (values, self.sample_sizes.len(), self.effect_sizes.len())
    }
}

/// Group the result set by combination and compute the empirical rejection
/// proportion `mean(outcome < alpha)` per cell.
pub fn power_summary(
    grid: &ParameterGrid,
    results: &ResultSet,
    outcome_field: &str,
    alpha: f64,
) -> Result<PowerSurface, PowerError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(PowerError::InvalidAlpha(alpha));
    }
    let outcomes = results
        .outcome_column(outcome_field)
        .ok_or_else(|| PowerError::UnknownOutcomeField(outcome_field.to_string()))?;

    let mut counts: FxHashMap<CombinationId, (usize, usize)> = FxHashMap::default();
    for (id, value) in results.combination_ids().iter().zip(outcomes) {
        let entry = counts.entry(*id).or_insert((0, 0));
        entry.0 += 1;
        if *value < alpha {
            entry.1 += 1;
        }
    }

    for id in counts.keys() {
        if grid.combination(*id).is_none() {
            return Err(PowerError::UnknownCombination(*id));
        }
    }

    let mut cells = Vec::with_capacity(grid.total_combinations());
    for combination in grid.combinations() {
        let (trials, rejections) = counts.get(&combination.id).copied().unwrap_or((0, 0));
        let power = if trials == 0 {
            0.0
        } else {
            rejections as f64 / trials as f64
        };
        cells.push(PowerCell {
            combination_id: combination.id,
            sample_size: combination.sample_size,
            effect_size: combination.effect_size,
            trials,
            rejections,
            power,
        });
    }

    Ok(PowerSurface {
        sample_sizes: grid.sample_sizes().to_vec(),
        effect_sizes: grid.effect_sizes().to_vec(),
        cells,
    })
}
