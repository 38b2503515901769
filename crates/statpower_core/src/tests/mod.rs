//! Integration tests for the power simulation engine
//!
//! Tests are organized by topic:
//! - `grid` - Combination construction and trial expansion
//! - `evaluate` - Grid evaluator dispatch and the result-set contract
//! - `ttest` - The example two-sample t-test evaluator
//! - `power` - Power aggregation and convergence properties

mod grid;
mod power;

use crate::result::ResultSet;

/// Collapse a result set into sorted, bit-exact row keys so two sets can be
/// compared as multisets of rows regardless of row order.
pub(crate) fn sorted_row_keys(
    results: &ResultSet,
    field: &str,
) -> Vec<(usize, u64, u32, usize, u64)> {
    let mut keys: Vec<_> = results
        .rows()
        .map(|row| {
            (
                row.sample_size(),
                row.effect_size().to_bits(),
                row.combination_id().0,
                row.iteration(),
                row.outcome(field).expect("field present in result set").to_bits(),
            )
        })
        .collect();
    keys.sort_unstable();
    keys
}
