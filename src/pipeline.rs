//! End-to-end run: load, clean, aggregate, gap-fill, write.

use std::io::{Read, Write};

use serde::Serialize;
use tracing::info;

use crate::aggregate::{monthly_means, to_year_matrix};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::gapfill::fill_years;
use crate::loader::{self, RawTable};
use crate::output::{write_records, write_records_to};
use crate::parser::{CleanReport, clean_records};
use crate::types::{DroppedYear, OutputRecord};

/// What happened during a run, suitable for logging or writing as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub input_path: String,
    pub output_path: String,
    pub max_missing_months: usize,
    pub rows: CleanReport,
    pub monthly_aggregates: usize,
    pub retained_years: Vec<i32>,
    pub dropped_years: Vec<DroppedYear>,
    pub output_records: usize,
    pub interpolated_records: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub records: Vec<OutputRecord>,
    pub summary: PipelineSummary,
}

/// Runs the transformation on an already loaded table. No I/O.
pub fn process_table(table: &RawTable, config: &PipelineConfig) -> Result<PipelineOutput> {
    info!("Cleaning and parsing data...");
    let (clean, rows) = clean_records(table, &config.date_column, &config.turbidity_column)?;
    info!(
        total = rows.total_rows,
        clean = rows.clean_rows,
        dropped = rows.dropped_rows(),
        "Rows cleaned"
    );

    info!("Aggregating turbidity by year and month...");
    let aggregates = monthly_means(&clean);
    let matrix = to_year_matrix(&aggregates);

    info!(
        "Interpolating missing months (if {} or fewer are missing)...",
        config.max_missing_months
    );
    let outcome = fill_years(&matrix, config.max_missing_months);

    let summary = PipelineSummary {
        input_path: config.input_path.display().to_string(),
        output_path: config.output_path.display().to_string(),
        max_missing_months: config.max_missing_months,
        rows,
        monthly_aggregates: aggregates.len(),
        output_records: outcome.records.len(),
        interpolated_records: outcome.interpolated_count(),
        retained_years: outcome.retained_years,
        dropped_years: outcome.dropped_years,
    };

    info!(
        years = summary.retained_years.len(),
        "Processing complete. Found data for {} complete years.",
        summary.retained_years.len()
    );

    Ok(PipelineOutput {
        records: outcome.records,
        summary,
    })
}

/// Runs the pipeline over an arbitrary reader and writer, ignoring the paths
/// in `config` except for reporting.
pub fn run_with<R: Read, W: Write>(
    config: &PipelineConfig,
    input: R,
    output: W,
) -> Result<PipelineOutput> {
    config.validate()?;

    info!("Reading data...");
    let table = loader::load_reader(input)?;
    let result = process_table(&table, config)?;

    write_records_to(output, &result.records)?;
    Ok(result)
}

/// Reads `config.input_path`, writes `config.output_path`.
///
/// # Errors
///
/// Fails if the input cannot be read or is not valid CSV, a required column
/// is missing, or the output cannot be written. Unusable rows and incomplete
/// years are not errors.
#[tracing::instrument(skip(config), fields(input = %config.input_path.display()))]
pub fn run(config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    info!("Reading data from {}...", config.input_path.display());
    let table = loader::load_path(&config.input_path)?;
    let result = process_table(&table, config)?;

    write_records(&config.output_path, &result.records)?;
    info!("Saved processed data to {}", config.output_path.display());

    Ok(result)
}
