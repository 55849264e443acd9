//! Monthly averaging and the year × month reshape.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::{CleanRecord, MonthlyAggregate, YearMatrix};

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Groups clean records by (year, month) and averages turbidity in each group.
///
/// Output is ordered by year, then month.
pub fn monthly_means(records: &[CleanRecord]) -> Vec<MonthlyAggregate> {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();

    for record in records {
        groups
            .entry((record.year, record.month))
            .or_default()
            .push(record.turbidity);
    }

    groups
        .into_iter()
        .map(|((year, month), values)| MonthlyAggregate {
            year,
            month,
            turbidity: mean(&values),
            sample_count: values.len(),
        })
        .collect()
}

/// Reshapes monthly aggregates into one 12-slot row per observed year.
pub fn to_year_matrix(aggregates: &[MonthlyAggregate]) -> YearMatrix {
    let mut matrix = YearMatrix::new();
    for agg in aggregates {
        matrix.set(agg.year, agg.month, agg.turbidity);
    }
    debug!(years = matrix.len(), months = aggregates.len(), "Built year matrix");
    matrix
}
