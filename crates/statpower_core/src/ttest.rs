//! Example evaluator: two-sample t-test power simulation
//!
//! Draws a control group from N(0, 1) and a treatment group from
//! N(effect_size, 1), both of the trial's per-group sample size, and reports
//! the two-sided p-value for the difference in means. Any evaluator with the
//! same outcome contract is substitutable for this one.

use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::EvaluationFailure;
use crate::evaluate::TrialEvaluator;
use crate::grid::Trial;
use crate::result::OutcomeRecord;

/// Outcome of a single significance test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PValueOutcome {
    pub p_value: f64,
}

impl OutcomeRecord for PValueOutcome {
    fn field_names(&self) -> &'static [&'static str] {
        &["p_value"]
    }

    fn field_values(&self) -> Vec<f64> {
        vec![self.p_value]
    }
}

/// Two-sample t-test experiment over normally distributed groups
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TTestEvaluator {
    /// Base seed; each trial derives its own seed from this, so a study is
    /// reproducible and identical between sequential and parallel runs
    pub base_seed: u64,
    /// Pooled-variance (Student) test instead of Welch
    pub equal_variance: bool,
}

impl TTestEvaluator {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        Self {
            base_seed,
            equal_variance: false,
        }
    }

    /// Derive the RNG seed for one trial. Depends only on the base seed and
    /// the trial's coordinates, never on execution order.
    fn trial_seed(&self, trial: &Trial) -> u64 {
        let mut hasher = FxHasher::default();
        self.base_seed.hash(&mut hasher);
        trial.combination.id.0.hash(&mut hasher);
        (trial.iteration as u64).hash(&mut hasher);
        hasher.finish()
    }
}

impl TrialEvaluator for TTestEvaluator {
    type Outcome = PValueOutcome;

    fn evaluate(&self, trial: &Trial) -> Result<PValueOutcome, EvaluationFailure> {
        let n = trial.combination.sample_size;
        if n < 2 {
            return Err(EvaluationFailure::new(format!(
                "sample size {n} is too small for a t-test (need at least 2 per group)"
            )));
        }

        let mut rng = SmallRng::seed_from_u64(self.trial_seed(trial));

        let control_dist = Normal::new(0.0, 1.0).map_err(|e| {
            EvaluationFailure::with_source("invalid control group distribution", Box::new(e))
        })?;
        let treatment_dist = Normal::new(trial.combination.effect_size, 1.0).map_err(|e| {
            EvaluationFailure::with_source("invalid treatment group distribution", Box::new(e))
        })?;

        let control: Vec<f64> = (0..n).map(|_| control_dist.sample(&mut rng)).collect();
        let treatment: Vec<f64> = (0..n).map(|_| treatment_dist.sample(&mut rng)).collect();

        let p_value = two_sample_p_value(&control, &treatment, self.equal_variance)?;
        Ok(PValueOutcome { p_value })
    }
}

/// Two-sided p-value for the difference in means of two samples.
///
/// Welch's statistic with Satterthwaite degrees of freedom by default; the
/// pooled-variance form assumes equal group variances.
pub fn two_sample_p_value(
    a: &[f64],
    b: &[f64],
    equal_variance: bool,
) -> Result<f64, EvaluationFailure> {
    if a.len() < 2 || b.len() < 2 {
        return Err(EvaluationFailure::new(
            "each group needs at least 2 observations",
        ));
    }

    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (mean_a, mean_b) = (mean(a), mean(b));
    let (var_a, var_b) = (sample_variance(a, mean_a), sample_variance(b, mean_b));

    let (t, df) = if equal_variance {
        let pooled = ((na - 1.0) * var_a + (nb - 1.0) * var_b) / (na + nb - 2.0);
        let se = (pooled * (1.0 / na + 1.0 / nb)).sqrt();
        ((mean_a - mean_b) / se, na + nb - 2.0)
    } else {
        let (sa, sb) = (var_a / na, var_b / nb);
        let se = (sa + sb).sqrt();
        let df = (sa + sb).powi(2) / (sa.powi(2) / (na - 1.0) + sb.powi(2) / (nb - 1.0));
        ((mean_a - mean_b) / se, df)
    };

    if !t.is_finite() || !df.is_finite() || df <= 0.0 {
        return Err(EvaluationFailure::new(
            "degenerate samples: both groups have zero variance",
        ));
    }

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| EvaluationFailure::with_source("invalid t distribution", Box::new(e)))?;
    Ok(2.0 * dist.cdf(-t.abs()))
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance (ddof = 1)
fn sample_variance(xs: &[f64], mean: f64) -> f64 {
    xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64
}
