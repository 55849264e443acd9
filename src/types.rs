//! Data types shared by the pipeline stages.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

pub const MONTHS_PER_YEAR: usize = 12;

const MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter abbreviation for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// A sample that survived date and turbidity parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanRecord {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub turbidity: f64,
}

/// Mean turbidity of all clean samples sharing a (year, month).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyAggregate {
    pub year: i32,
    pub month: u32,
    pub turbidity: f64,
    pub sample_count: usize,
}

/// One row per observed year, one slot per calendar month. `None` marks a
/// month with no samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearMatrix {
    rows: BTreeMap<i32, [Option<f64>; MONTHS_PER_YEAR]>,
}

impl YearMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cell for `(year, month)`, creating the year row if needed.
    /// Months outside 1..=12 are ignored.
    pub fn set(&mut self, year: i32, month: u32, value: f64) {
        let Some(idx) = month_index(month) else {
            return;
        };
        self.rows.entry(year).or_insert([None; MONTHS_PER_YEAR])[idx] = Some(value);
    }

    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        let idx = month_index(month)?;
        self.rows.get(&year).and_then(|row| row[idx])
    }

    pub fn row(&self, year: i32) -> Option<&[Option<f64>; MONTHS_PER_YEAR]> {
        self.rows.get(&year)
    }

    /// Year rows in ascending year order.
    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Option<f64>; MONTHS_PER_YEAR])> {
        self.rows.iter().map(|(year, row)| (*year, row))
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn month_index(month: u32) -> Option<usize> {
    if (1..=MONTHS_PER_YEAR as u32).contains(&month) {
        Some(month as usize - 1)
    } else {
        None
    }
}

/// A single row of the output file.
///
/// Field order here is the column order of the written CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Turbidity")]
    pub turbidity: f64,
    #[serde(rename = "Interpolated", serialize_with = "serialize_title_bool")]
    pub interpolated: bool,
    #[serde(rename = "MonthName")]
    pub month_name: &'static str,
}

// Downstream consumers of the processed file expect `True` / `False`.
fn serialize_title_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

/// A year that failed the completeness test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedYear {
    pub year: i32,
    pub missing_months: usize,
}
