//! Columnar result sets
//!
//! Trial outcomes are column-bound into a single table: identity columns
//! carried by the harness plus one `f64` column per outcome field. All
//! records of one batch must report the same field set; the first record
//! fixes the schema and later rows are validated against it.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::grid::{CombinationId, Trial};

/// A flat record of named outcome values produced by one trial evaluation.
///
/// Identity fields (sample size, effect size, combination id, iteration) are
/// carried by the harness; implementations contribute only the outcome
/// columns, in a fixed order matching `field_names`.
pub trait OutcomeRecord {
    /// Column names for this record's values, in column order
    fn field_names(&self) -> &'static [&'static str];

    /// Values in the same order as `field_names`
    fn field_values(&self) -> Vec<f64>;
}

/// One row per trial: identity columns plus the evaluator's outcome columns.
///
/// Row order is an artifact of dispatch and carries no meaning; consumers
/// must aggregate by grouping, never by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    sample_sizes: Vec<usize>,
    effect_sizes: Vec<f64>,
    combination_ids: Vec<CombinationId>,
    iterations: Vec<usize>,
    outcome_fields: Vec<String>,
    outcome_columns: Vec<Vec<f64>>,
}

impl ResultSet {
    pub(crate) fn with_fields(fields: &[&str], capacity: usize) -> Self {
        Self {
            sample_sizes: Vec::with_capacity(capacity),
            effect_sizes: Vec::with_capacity(capacity),
            combination_ids: Vec::with_capacity(capacity),
            iterations: Vec::with_capacity(capacity),
            outcome_fields: fields.iter().map(|f| (*f).to_string()).collect(),
            outcome_columns: fields.iter().map(|_| Vec::with_capacity(capacity)).collect(),
        }
    }

    pub(crate) fn push_row(
        &mut self,
        trial: &Trial,
        record: &impl OutcomeRecord,
    ) -> Result<(), SchemaError> {
        let names = record.field_names();
        let values = record.field_values();

        let conforms = names.len() == self.outcome_fields.len()
            && values.len() == names.len()
            && names
                .iter()
                .zip(&self.outcome_fields)
                .all(|(name, field)| *name == field.as_str());
        if !conforms {
            return Err(SchemaError {
                expected: self.outcome_fields.clone(),
                found: names.iter().map(|n| (*n).to_string()).collect(),
            });
        }

        self.sample_sizes.push(trial.combination.sample_size);
        self.effect_sizes.push(trial.combination.effect_size);
        self.combination_ids.push(trial.combination.id);
        self.iterations.push(trial.iteration);
        for (column, value) in self.outcome_columns.iter_mut().zip(values) {
            column.push(value);
        }
        Ok(())
    }

    /// Number of rows (one per trial)
    #[must_use]
    pub fn len(&self) -> usize {
        self.sample_sizes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sample_sizes.is_empty()
    }

    /// Names of the outcome columns, in column order
    #[must_use]
    pub fn outcome_fields(&self) -> &[String] {
        &self.outcome_fields
    }

    /// The outcome column with the given name
    #[must_use]
    pub fn outcome_column(&self, field: &str) -> Option<&[f64]> {
        let index = self.outcome_fields.iter().position(|f| f == field)?;
        Some(&self.outcome_columns[index])
    }

    #[must_use]
    pub fn sample_sizes(&self) -> &[usize] {
        &self.sample_sizes
    }

    #[must_use]
    pub fn effect_sizes(&self) -> &[f64] {
        &self.effect_sizes
    }

    #[must_use]
    pub fn combination_ids(&self) -> &[CombinationId] {
        &self.combination_ids
    }

    /// Iteration indices, 1-based within each combination
    #[must_use]
    pub fn iterations(&self) -> &[usize] {
        &self.iterations
    }

    /// Iterate over rows as borrowed views
    pub fn rows(&self) -> impl Iterator<Item = ResultRow<'_>> + '_ {
        (0..self.len()).map(move |index| ResultRow { set: self, index })
    }
}

/// Borrowed view of a single result row
#[derive(Debug, Clone, Copy)]
pub struct ResultRow<'a> {
    set: &'a ResultSet,
    index: usize,
}

impl ResultRow<'_> {
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.set.sample_sizes[self.index]
    }

    #[must_use]
    pub fn effect_size(&self) -> f64 {
        self.set.effect_sizes[self.index]
    }

    #[must_use]
    pub fn combination_id(&self) -> CombinationId {
        self.set.combination_ids[self.index]
    }

    #[must_use]
    pub fn iteration(&self) -> usize {
        self.set.iterations[self.index]
    }

    /// The named outcome value for this row
    #[must_use]
    pub fn outcome(&self, field: &str) -> Option<f64> {
        self.set.outcome_column(field).map(|col| col[self.index])
    }
}
