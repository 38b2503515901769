//! Tests for combination construction and trial expansion
//!
//! These tests verify that:
//! - Combination ids form a bijection onto the cartesian product
//! - Trial expansion produces exactly m·k·t trials, grouped by combination
//! - Invalid input sequences are rejected before any work happens

use crate::error::ConfigError;
use crate::grid::{CombinationId, ParameterGrid, expand_trials};

#[test]
fn test_ids_cover_product_exactly_once() {
    let grid = ParameterGrid::new(vec![10, 20, 30], vec![0.1, 0.2, 0.5, 0.8]).unwrap();
    let combos = grid.combinations();

    assert_eq!(combos.len(), 12);
    for (index, combo) in combos.iter().enumerate() {
        assert_eq!(combo.id, CombinationId(index as u32 + 1));
    }
}

#[test]
fn test_trial_expansion_counts() {
    let grid = ParameterGrid::new(vec![10, 20], vec![0.5, 1.0, 1.5]).unwrap();
    let iterations = 7;
    let trials = expand_trials(&grid.combinations(), iterations);

    assert_eq!(trials.len(), grid.total_trials(iterations));
    assert_eq!(trials.len(), 2 * 3 * 7);

    // Every combination appears exactly `iterations` times, with the full
    // 1..=iterations index range
    for combo in grid.combinations() {
        let indices: Vec<usize> = trials
            .iter()
            .filter(|t| t.combination.id == combo.id)
            .map(|t| t.iteration)
            .collect();
        assert_eq!(indices, (1..=iterations).collect::<Vec<_>>());
    }
}

#[test]
fn test_trials_match_their_grid_entry() {
    let grid = ParameterGrid::new(vec![5, 15], vec![0.25, 0.75]).unwrap();
    for trial in expand_trials(&grid.combinations(), 3) {
        assert_eq!(grid.combination(trial.combination.id), Some(trial.combination));
    }
}

#[test]
fn test_empty_sequences_rejected() {
    assert!(matches!(
        ParameterGrid::new(vec![], vec![0.5]),
        Err(ConfigError::EmptySampleSizes)
    ));
    assert!(matches!(
        ParameterGrid::new(vec![10], vec![]),
        Err(ConfigError::EmptyEffectSizes)
    ));
}

#[test]
fn test_invalid_values_rejected() {
    assert!(matches!(
        ParameterGrid::new(vec![10, 0], vec![0.5]),
        Err(ConfigError::ZeroSampleSize { index: 1 })
    ));
    assert!(matches!(
        ParameterGrid::new(vec![10], vec![f64::NAN]),
        Err(ConfigError::NonFiniteEffectSize { index: 0, .. })
    ));
    assert!(matches!(
        ParameterGrid::new(vec![10], vec![0.5, f64::INFINITY]),
        Err(ConfigError::NonFiniteEffectSize { index: 1, .. })
    ));
}
