//! Empirical statistical power simulation engine
//!
//! This crate provides a grid evaluator for Monte Carlo power studies: it
//! crosses per-group sample sizes with effect sizes, assigns each combination
//! a stable id, replicates every combination across the requested number of
//! iterations, and dispatches each trial to a caller-supplied evaluator,
//! sequentially or on a worker pool scoped to the call. Outcomes are
//! column-bound into a single result set, which `power_summary` folds into
//! rejection proportions per grid cell.
//!
//! # Example
//!
//! ```ignore
//! use statpower_core::{
//!     EvaluateConfig, ParameterGrid, TTestEvaluator, evaluate_grid, power_summary,
//! };
//!
//! let grid = ParameterGrid::new(vec![10, 20, 50], vec![0.2, 0.5, 0.8])?;
//! let evaluator = TTestEvaluator::new(42);
//! let config = EvaluateConfig { iterations: 2_000, workers: 4 };
//!
//! let results = evaluate_grid(&grid, &evaluator, &config)?;
//! let surface = power_summary(&grid, &results, "p_value", 0.05)?;
//!
//! for (n, power) in surface.curve(1).unwrap() {
//!     println!("n={n}: power={power:.3}");
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod evaluate;
pub mod grid;
pub mod power;
pub mod result;
pub mod ttest;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ConfigError, EvaluateError, EvaluationFailure, PowerError, SchemaError};
pub use evaluate::{EvaluateConfig, TrialEvaluator, evaluate_grid};
pub use grid::{Combination, CombinationId, ParameterGrid, Trial, expand_trials};
pub use power::{PowerCell, PowerSurface, power_summary};
pub use result::{OutcomeRecord, ResultRow, ResultSet};
pub use ttest::{PValueOutcome, TTestEvaluator, two_sample_p_value};
