//! Completeness test and per-year gap filling.
//!
//! Each year row of the [`YearMatrix`] is judged on its own: too many empty
//! months and the year is dropped, otherwise its gaps are interpolated and all
//! twelve months are emitted.

use tracing::{debug, warn};

use crate::interpolate::fill_gaps;
use crate::types::{DroppedYear, MONTHS_PER_YEAR, OutputRecord, YearMatrix, month_name};

/// Result of gap filling every year in a matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapFillOutcome {
    /// Twelve records per retained year, ordered by year then month.
    pub records: Vec<OutputRecord>,
    /// Ascending.
    pub retained_years: Vec<i32>,
    pub dropped_years: Vec<DroppedYear>,
}

impl GapFillOutcome {
    pub fn interpolated_count(&self) -> usize {
        self.records.iter().filter(|r| r.interpolated).count()
    }
}

/// Fills one year row, or explains why it cannot be kept.
///
/// Returns the twelve output records when at most `max_missing_months`
/// cells are empty.
pub fn fill_year(
    year: i32,
    row: &[Option<f64>; MONTHS_PER_YEAR],
    max_missing_months: usize,
) -> Result<Vec<OutputRecord>, DroppedYear> {
    let missing_months = row.iter().filter(|cell| cell.is_none()).count();
    let dropped = DroppedYear {
        year,
        missing_months,
    };

    if missing_months > max_missing_months {
        return Err(dropped);
    }

    let filled = fill_gaps(row).ok_or(dropped)?;

    Ok(row
        .iter()
        .zip(filled)
        .zip(1u32..)
        .map(|((original, turbidity), month)| OutputRecord {
            year,
            month,
            turbidity,
            interpolated: original.is_none(),
            month_name: month_name(month).unwrap_or_default(),
        })
        .collect())
}

/// Applies [`fill_year`] to every year of the matrix.
///
/// Dropped years are logged with their missing-month count; the run carries on.
pub fn fill_years(matrix: &YearMatrix, max_missing_months: usize) -> GapFillOutcome {
    let mut outcome = GapFillOutcome::default();

    for (year, row) in matrix.rows() {
        match fill_year(year, row, max_missing_months) {
            Ok(records) => {
                debug!(
                    year,
                    interpolated = records.iter().filter(|r| r.interpolated).count(),
                    "Year retained"
                );
                outcome.retained_years.push(year);
                outcome.records.extend(records);
            }
            Err(dropped) => {
                warn!(
                    year = dropped.year,
                    missing_months = dropped.missing_months,
                    "Dropping year {} with {} missing months",
                    dropped.year,
                    dropped.missing_months
                );
                outcome.dropped_years.push(dropped);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn full_row(value: f64) -> [Option<f64>; MONTHS_PER_YEAR] {
        [Some(value); MONTHS_PER_YEAR]
    }

    fn matrix_from(rows: &[(i32, [Option<f64>; MONTHS_PER_YEAR])]) -> YearMatrix {
        let mut matrix = YearMatrix::new();
        for (year, row) in rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(v) = cell {
                    matrix.set(*year, i as u32 + 1, *v);
                }
            }
        }
        matrix
    }

    #[test]
    fn test_interior_gap_interpolates_linearly() {
        let mut row = full_row(50.0);
        row[0] = Some(10.0);
        row[1] = None;
        row[2] = None;
        row[3] = Some(40.0);

        let records = fill_year(2020, &row, 3).unwrap();

        assert_eq!(records.len(), 12);
        assert!((records[1].turbidity - 20.0).abs() < EPS);
        assert!((records[2].turbidity - 30.0).abs() < EPS);
        assert!(records[1].interpolated);
        assert!(records[2].interpolated);
        assert!(!records[0].interpolated);
        assert!(!records[3].interpolated);
    }

    #[test]
    fn test_leading_gap_takes_nearest_value() {
        let mut row = full_row(12.0);
        row[0] = None;
        row[1] = Some(5.0);
        row[2] = Some(10.0);

        let records = fill_year(2020, &row, 3).unwrap();

        assert!((records[0].turbidity - 5.0).abs() < EPS);
        assert!(records[0].interpolated);
        assert_eq!(records[0].month, 1);
        assert_eq!(records[0].month_name, "Jan");
    }

    #[test]
    fn test_trailing_gap_takes_nearest_value() {
        let mut row = full_row(2.0);
        row[10] = None;
        row[11] = None;
        row[9] = Some(7.5);

        let records = fill_year(2020, &row, 3).unwrap();

        assert!((records[10].turbidity - 7.5).abs() < EPS);
        assert!((records[11].turbidity - 7.5).abs() < EPS);
        assert_eq!(records[11].month_name, "Dec");
    }

    #[test]
    fn test_exactly_max_missing_is_kept() {
        let mut row = full_row(1.0);
        row[4] = None;
        row[5] = None;
        row[6] = None;

        let records = fill_year(2020, &row, 3).unwrap();
        assert_eq!(records.iter().filter(|r| r.interpolated).count(), 3);
    }

    #[test]
    fn test_one_over_max_missing_is_dropped() {
        let mut row = full_row(1.0);
        for cell in row.iter_mut().take(4) {
            *cell = None;
        }

        let dropped = fill_year(2020, &row, 3).unwrap_err();
        assert_eq!(
            dropped,
            DroppedYear {
                year: 2020,
                missing_months: 4
            }
        );
    }

    #[test]
    fn test_all_empty_row_is_dropped_even_with_lenient_limit() {
        let row = [None; MONTHS_PER_YEAR];
        let dropped = fill_year(2020, &row, 12).unwrap_err();
        assert_eq!(dropped.missing_months, 12);
    }

    #[test]
    fn test_fill_years_keeps_and_drops_independently() {
        let mut kept = full_row(3.0);
        kept[6] = None;
        kept[7] = None;
        let mut sparse = [None; MONTHS_PER_YEAR];
        sparse[0] = Some(1.0);
        sparse[1] = Some(1.0);

        let matrix = matrix_from(&[(2019, sparse), (2018, kept), (2021, full_row(0.5))]);
        let outcome = fill_years(&matrix, 3);

        assert_eq!(outcome.retained_years, vec![2018, 2021]);
        assert_eq!(
            outcome.dropped_years,
            vec![DroppedYear {
                year: 2019,
                missing_months: 10
            }]
        );
        assert_eq!(outcome.records.len(), 24);
        assert_eq!(outcome.interpolated_count(), 2);

        let order: Vec<(i32, u32)> = outcome.records.iter().map(|r| (r.year, r.month)).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_fill_years_empty_matrix() {
        let outcome = fill_years(&YearMatrix::new(), 3);
        assert!(outcome.records.is_empty());
        assert!(outcome.retained_years.is_empty());
        assert!(outcome.dropped_years.is_empty());
    }
}
