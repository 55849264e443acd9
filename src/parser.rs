//! Row filtering and tolerant parsing of sample dates and turbidity readings.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::loader::RawTable;
use crate::types::CleanRecord;

/// Cell texts treated as "no value", the same set common dataframe CSV
/// readers recognise.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

// Slash dates are month-first when ambiguous.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%Y%m%d",
];

// Representable range of the dataframe timestamps the exports were built with;
// anything outside it is treated as unparseable.
const MIN_YEAR: i32 = 1677;
const MAX_YEAR: i32 = 2262;

/// Per-row accounting for the cleaning stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub total_rows: usize,
    /// Date or turbidity cell empty, absent, or an NA marker.
    pub missing_fields: usize,
    pub invalid_dates: usize,
    pub invalid_turbidity: usize,
    pub clean_rows: usize,
}

impl CleanReport {
    pub fn dropped_rows(&self) -> usize {
        self.total_rows - self.clean_rows
    }
}

fn is_missing(cell: Option<&str>) -> bool {
    match cell.map(str::trim) {
        None => true,
        Some(s) => s.is_empty() || NA_MARKERS.contains(&s),
    }
}

fn in_range(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// Parses a free-text sample date, trying a fixed list of common layouts.
///
/// Returns `None` for empty, malformed, or out-of-range input.
pub fn parse_sample_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        let date = dt.date_naive();
        if in_range(date) {
            return Some(date);
        }
    }

    DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .chain(
            DATE_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok()),
        )
        .find(|date| in_range(*date))
}

/// Keeps only ASCII digits and `.` from `raw` and parses the remainder.
///
/// Qualifiers and units are discarded, so `"< 5.2 NTU"` reads as `5.2`. A
/// result that still does not parse (empty, or more than one `.`) is `None`.
pub fn parse_turbidity(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turns raw rows into [`CleanRecord`]s, dropping any row whose date or
/// turbidity cannot be used.
///
/// Fails only when one of the named columns is absent from the header.
pub fn clean_records(
    table: &RawTable,
    date_column: &str,
    turbidity_column: &str,
) -> Result<(Vec<CleanRecord>, CleanReport)> {
    let date_idx = table.column_index(date_column)?;
    let turbidity_idx = table.column_index(turbidity_column)?;

    let mut report = CleanReport {
        total_rows: table.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        let date_cell = table.cell(row, date_idx);
        let turbidity_cell = table.cell(row, turbidity_idx);

        if is_missing(date_cell) || is_missing(turbidity_cell) {
            report.missing_fields += 1;
            continue;
        }

        let Some(date) = date_cell.and_then(parse_sample_date) else {
            report.invalid_dates += 1;
            continue;
        };

        let Some(turbidity) = turbidity_cell.and_then(parse_turbidity) else {
            report.invalid_turbidity += 1;
            continue;
        };

        records.push(CleanRecord {
            year: date.year(),
            month: date.month(),
            turbidity,
        });
    }

    report.clean_rows = records.len();
    debug!(?report, "Row cleaning finished");

    Ok((records, report))
}
