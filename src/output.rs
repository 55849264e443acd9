//! Output formatting and persistence for the processed monthly series.
//!
//! Supports CSV output of the records, and JSON rendering of the run summary.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::pipeline::PipelineSummary;
use crate::types::OutputRecord;

/// Column order of the output file; matches the field order of [`OutputRecord`].
pub const OUTPUT_HEADER: [&str; 5] = ["Year", "Month", "Turbidity", "Interpolated", "MonthName"];

/// Writes `records` as CSV to any writer. The header row is written even
/// when there are no records.
pub fn write_records_to<W: Write>(writer: W, records: &[OutputRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(OUTPUT_HEADER)?;

    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| PipelineError::io("<output>", e))?;

    Ok(())
}

/// Writes `records` to `path`, replacing any existing file.
pub fn write_records(path: &Path, records: &[OutputRecord]) -> Result<()> {
    debug!(path = %path.display(), rows = records.len(), "Writing output CSV");
    let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    write_records_to(file, records)
}

/// Logs the run summary as pretty-printed JSON.
pub fn print_json(summary: &PipelineSummary) -> Result<()> {
    info!("{}", summary_json(summary)?);
    Ok(())
}

/// Writes the run summary as pretty-printed JSON to `path`.
pub fn write_summary_json(path: &Path, summary: &PipelineSummary) -> Result<()> {
    let body = summary_json(summary)?;
    std::fs::write(path, body).map_err(|e| PipelineError::io(path, e))
}

fn summary_json(summary: &PipelineSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Renders years as a bracketed, comma-separated list: `[2018, 2021]`.
pub fn format_years(years: &[i32]) -> String {
    let joined = years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
