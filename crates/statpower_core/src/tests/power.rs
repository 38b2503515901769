//! Tests for power aggregation
//!
//! These tests verify that:
//! - The empirical rejection proportion converges on a known Bernoulli rate
//! - Grouping is independent of row order
//! - Surface lookups, curves, and heatmap views line up with the grid
//! - Aggregation input errors are reported as their own kinds

use std::hash::{Hash, Hasher};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;

use crate::error::{EvaluationFailure, PowerError};
use crate::evaluate::{EvaluateConfig, TrialEvaluator, evaluate_grid};
use crate::grid::{Combination, CombinationId, ParameterGrid, Trial};
use crate::power::power_summary;
use crate::result::ResultSet;
use crate::ttest::PValueOutcome;

/// Stub with a known analytic rejection rate: the outcome clears the
/// threshold with probability `rejection_rate`, independently per trial
struct BernoulliEvaluator {
    base_seed: u64,
    rejection_rate: f64,
}

impl TrialEvaluator for BernoulliEvaluator {
    type Outcome = PValueOutcome;

    fn evaluate(&self, trial: &Trial) -> Result<PValueOutcome, EvaluationFailure> {
        let mut hasher = FxHasher::default();
        self.base_seed.hash(&mut hasher);
        trial.combination.id.0.hash(&mut hasher);
        (trial.iteration as u64).hash(&mut hasher);

        let mut rng = SmallRng::seed_from_u64(hasher.finish());
        let draw: f64 = rng.random();
        let p_value = if draw < self.rejection_rate { 0.0 } else { 1.0 };
        Ok(PValueOutcome { p_value })
    }
}

#[test]
fn test_rejection_proportion_converges_on_bernoulli_rate() {
    let grid = ParameterGrid::new(vec![10, 20], vec![0.5]).unwrap();
    let evaluator = BernoulliEvaluator {
        base_seed: 3,
        rejection_rate: 0.3,
    };
    let results = evaluate_grid(
        &grid,
        &evaluator,
        &EvaluateConfig {
            iterations: 5_000,
            workers: 1,
        },
    )
    .unwrap();

    let surface = power_summary(&grid, &results, "p_value", 0.05).unwrap();
    for cell in surface.cells() {
        assert_eq!(cell.trials, 5_000);
        assert!(
            (0.27..=0.33).contains(&cell.power),
            "cell {:?}: proportion {} outside the band around 0.3",
            cell.combination_id,
            cell.power
        );
    }
}

#[test]
fn test_grouping_is_order_independent() {
    let grid = ParameterGrid::new(vec![10, 20], vec![0.5]).unwrap();
    let combos = grid.combinations();

    let trials: Vec<Trial> = combos
        .iter()
        .flat_map(|c| {
            (1..=4).map(|iteration| Trial {
                combination: *c,
                iteration,
            })
        })
        .collect();
    // Alternate rejections so both cells end up at 0.5
    let outcomes: Vec<PValueOutcome> = (0..trials.len())
        .map(|i| PValueOutcome {
            p_value: if i % 2 == 0 { 0.01 } else { 0.9 },
        })
        .collect();

    let mut forward = ResultSet::with_fields(&["p_value"], trials.len());
    for (trial, outcome) in trials.iter().zip(&outcomes) {
        forward.push_row(trial, outcome).unwrap();
    }

    let mut reversed = ResultSet::with_fields(&["p_value"], trials.len());
    for (trial, outcome) in trials.iter().zip(&outcomes).rev() {
        reversed.push_row(trial, outcome).unwrap();
    }

    let a = power_summary(&grid, &forward, "p_value", 0.05).unwrap();
    let b = power_summary(&grid, &reversed, "p_value", 0.05).unwrap();
    assert_eq!(a, b);
    assert!(a.cells().iter().all(|c| c.power == 0.5));
}

#[test]
fn test_surface_layout_matches_grid() {
    let grid = ParameterGrid::new(vec![10, 20, 30], vec![0.2, 0.8]).unwrap();
    let evaluator = BernoulliEvaluator {
        base_seed: 8,
        rejection_rate: 0.5,
    };
    let results = evaluate_grid(
        &grid,
        &evaluator,
        &EvaluateConfig {
            iterations: 50,
            workers: 1,
        },
    )
    .unwrap();

    let surface = power_summary(&grid, &results, "p_value", 0.05).unwrap();
    assert_eq!(surface.shape(), (3, 2));

    for (i, &n) in grid.sample_sizes().iter().enumerate() {
        for (j, &d) in grid.effect_sizes().iter().enumerate() {
            let cell = surface.cell(i, j).unwrap();
            assert_eq!(cell.sample_size, n);
            assert_eq!(cell.effect_size, d);
            assert_eq!(cell.trials, 50);
        }
    }
    assert!(surface.cell(3, 0).is_none());
    assert!(surface.cell(0, 2).is_none());

    let (values, rows, cols) = surface.heatmap();
    assert_eq!((rows, cols), (3, 2));
    assert_eq!(values.len(), 6);

    let curve = surface.curve(1).unwrap();
    assert_eq!(
        curve.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
        vec![10, 20, 30]
    );
    assert!(surface.curve(2).is_none());
}

#[test]
fn test_aggregation_input_errors() {
    let grid = ParameterGrid::new(vec![10], vec![0.5]).unwrap();
    let evaluator = BernoulliEvaluator {
        base_seed: 1,
        rejection_rate: 0.5,
    };
    let results = evaluate_grid(
        &grid,
        &evaluator,
        &EvaluateConfig {
            iterations: 10,
            workers: 1,
        },
    )
    .unwrap();

    assert!(matches!(
        power_summary(&grid, &results, "statistic", 0.05),
        Err(PowerError::UnknownOutcomeField(_))
    ));
    assert!(matches!(
        power_summary(&grid, &results, "p_value", 0.0),
        Err(PowerError::InvalidAlpha(_))
    ));
    assert!(matches!(
        power_summary(&grid, &results, "p_value", 1.5),
        Err(PowerError::InvalidAlpha(_))
    ));
}

#[test]
fn test_foreign_combination_rejected() {
    let grid = ParameterGrid::new(vec![10], vec![0.5]).unwrap();

    let foreign = Trial {
        combination: Combination {
            id: CombinationId(99),
            sample_size: 10,
            effect_size: 0.5,
        },
        iteration: 1,
    };
    let mut results = ResultSet::with_fields(&["p_value"], 1);
    results
        .push_row(&foreign, &PValueOutcome { p_value: 0.01 })
        .unwrap();

    assert!(matches!(
        power_summary(&grid, &results, "p_value", 0.05),
        Err(PowerError::UnknownCombination(CombinationId(99)))
    ));
}
