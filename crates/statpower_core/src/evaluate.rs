//! The grid evaluator
//!
//! Expands a parameter grid into trials, dispatches each trial to a
//! caller-supplied evaluator (sequentially or on a worker pool scoped to the
//! call), and column-binds the outcomes into a [`ResultSet`]. The two
//! execution paths have identical result semantics; the first evaluator
//! failure aborts the whole batch.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EvaluateError, EvaluationFailure};
use crate::grid::{ParameterGrid, Trial, expand_trials};
use crate::result::{OutcomeRecord, ResultSet};

/// A user-supplied stochastic experiment, invoked once per trial.
///
/// Implementations may draw on internal randomness but must not depend on
/// shared mutable state across trials: trials run in unspecified order and,
/// under parallel dispatch, concurrently. Parameters beyond the trial itself
/// belong on the implementing value as fields, so both execution paths see
/// the same configuration for every invocation.
pub trait TrialEvaluator: Send + Sync {
    /// The flat outcome record contributed by each trial
    type Outcome: OutcomeRecord + Send;

    /// Run the experiment for one trial
    fn evaluate(&self, trial: &Trial) -> Result<Self::Outcome, EvaluationFailure>;
}

/// Execution settings for one `evaluate_grid` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateConfig {
    /// Trials per combination
    pub iterations: usize,
    /// Worker threads; 1 selects the sequential path
    pub workers: usize,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            workers: 1,
        }
    }
}

/// Run every trial of the grid through the evaluator and collect a result set.
///
/// The call blocks until all trials complete or one fails. With
/// `config.workers > 1` trials run on a rayon pool of exactly that many
/// threads, created for this call and torn down when it returns, success or
/// failure. Without the `parallel` feature the sequential path is always used.
pub fn evaluate_grid<E: TrialEvaluator>(
    grid: &ParameterGrid,
    evaluator: &E,
    config: &EvaluateConfig,
) -> Result<ResultSet, EvaluateError> {
    if config.iterations == 0 {
        return Err(ConfigError::ZeroIterations.into());
    }
    if config.workers == 0 {
        return Err(ConfigError::ZeroWorkers.into());
    }

    let trials = expand_trials(&grid.combinations(), config.iterations);

    let outcomes = if config.workers > 1 {
        evaluate_parallel(evaluator, &trials, config.workers)?
    } else {
        evaluate_sequential(evaluator, &trials)?
    };

    collect_rows(&trials, &outcomes)
}

fn evaluate_sequential<E: TrialEvaluator>(
    evaluator: &E,
    trials: &[Trial],
) -> Result<Vec<E::Outcome>, EvaluateError> {
    trials
        .iter()
        .map(|trial| run_trial(evaluator, trial))
        .collect()
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<E: TrialEvaluator>(
    evaluator: &E,
    trials: &[Trial],
    workers: usize,
) -> Result<Vec<E::Outcome>, EvaluateError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| ConfigError::WorkerPool(e.to_string()))?;

    // Pool lives for this call only; dropped on return whether or not a
    // trial failed. collect() on Result short-circuits at the first error.
    pool.install(|| {
        trials
            .par_iter()
            .map(|trial| run_trial(evaluator, trial))
            .collect()
    })
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<E: TrialEvaluator>(
    evaluator: &E,
    trials: &[Trial],
    _workers: usize,
) -> Result<Vec<E::Outcome>, EvaluateError> {
    evaluate_sequential(evaluator, trials)
}

fn run_trial<E: TrialEvaluator>(evaluator: &E, trial: &Trial) -> Result<E::Outcome, EvaluateError> {
    evaluator
        .evaluate(trial)
        .map_err(|failure| EvaluateError::Evaluation {
            combination_id: trial.combination.id,
            sample_size: trial.combination.sample_size,
            effect_size: trial.combination.effect_size,
            iteration: trial.iteration,
            source: failure,
        })
}

fn collect_rows<R: OutcomeRecord>(
    trials: &[Trial],
    outcomes: &[R],
) -> Result<ResultSet, EvaluateError> {
    let Some(first) = outcomes.first() else {
        return Ok(ResultSet::default());
    };

    let mut set = ResultSet::with_fields(first.field_names(), trials.len());
    for (trial, outcome) in trials.iter().zip(outcomes) {
        set.push_row(trial, outcome)?;
    }
    Ok(set)
}
