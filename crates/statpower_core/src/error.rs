use std::fmt;

use crate::grid::CombinationId;

/// Errors detected while validating a study request, before any trial runs
#[derive(Debug, Clone)]
pub enum ConfigError {
    EmptySampleSizes,
    EmptyEffectSizes,
    ZeroSampleSize { index: usize },
    NonFiniteEffectSize { index: usize, value: f64 },
    ZeroIterations,
    ZeroWorkers,
    /// The worker pool for a parallel run could not be constructed
    WorkerPool(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptySampleSizes => write!(f, "sample size sequence is empty"),
            ConfigError::EmptyEffectSizes => write!(f, "effect size sequence is empty"),
            ConfigError::ZeroSampleSize { index } => {
                write!(f, "sample size at index {index} is zero")
            }
            ConfigError::NonFiniteEffectSize { index, value } => {
                write!(f, "effect size at index {index} is not finite ({value})")
            }
            ConfigError::ZeroIterations => write!(f, "iteration count must be positive"),
            ConfigError::ZeroWorkers => write!(f, "worker count must be positive"),
            ConfigError::WorkerPool(msg) => write!(f, "worker pool construction failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure raised by an evaluator for a single trial
#[derive(Debug)]
pub struct EvaluationFailure {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl EvaluationFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }
}

impl fmt::Display for EvaluationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvaluationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Outcome records from one batch disagreed on their field set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "outcome schema mismatch: expected [{}], found [{}]",
            self.expected.join(", "),
            self.found.join(", ")
        )
    }
}

impl std::error::Error for SchemaError {}

/// Errors from running a study through the grid evaluator
#[derive(Debug)]
pub enum EvaluateError {
    Config(ConfigError),
    /// An evaluator invocation failed; the batch is aborted at the first
    /// failure and the offending trial's coordinates are carried along
    Evaluation {
        combination_id: CombinationId,
        sample_size: usize,
        effect_size: f64,
        iteration: usize,
        source: EvaluationFailure,
    },
    Schema(SchemaError),
}

impl fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluateError::Config(e) => write!(f, "{e}"),
            EvaluateError::Evaluation {
                combination_id,
                sample_size,
                effect_size,
                iteration,
                source,
            } => {
                write!(
                    f,
                    "evaluator failed for {combination_id:?} \
                     (sample_size={sample_size}, effect_size={effect_size}) \
                     at iteration {iteration}: {source}"
                )
            }
            EvaluateError::Schema(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EvaluateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluateError::Config(e) => Some(e),
            EvaluateError::Evaluation { source, .. } => Some(source),
            EvaluateError::Schema(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EvaluateError {
    fn from(e: ConfigError) -> Self {
        EvaluateError::Config(e)
    }
}

impl From<SchemaError> for EvaluateError {
    fn from(e: SchemaError) -> Self {
        EvaluateError::Schema(e)
    }
}

/// Errors from aggregating a result set into a power surface
#[derive(Debug, Clone)]
pub enum PowerError {
    UnknownOutcomeField(String),
    InvalidAlpha(f64),
    /// The result set reports a combination the grid never produced
    UnknownCombination(CombinationId),
}

impl fmt::Display for PowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerError::UnknownOutcomeField(field) => {
                write!(f, "result set has no outcome field named {field:?}")
            }
            PowerError::InvalidAlpha(alpha) => {
                write!(f, "alpha must lie strictly between 0 and 1 (got {alpha})")
            }
            PowerError::UnknownCombination(id) => {
                write!(f, "{id:?} does not belong to the grid")
            }
        }
    }
}

impl std::error::Error for PowerError {}
