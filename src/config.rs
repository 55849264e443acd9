//! Run configuration.
//!
//! Stored on disk (optionally) as a JSON object; every field may be omitted:
//! ```json
//! {
//!   "input_path": "samples.csv",
//!   "output_path": "processed_turbidity_data.csv",
//!   "max_missing_months": 3,
//!   "date_column": "Sample Date",
//!   "turbidity_column": "Turbidity (NTU)"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::types::MONTHS_PER_YEAR;

pub const DEFAULT_INPUT_PATH: &str = "Drinking_Water_Quality_Distribution_Monitoring_Data_20250313.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "processed_turbidity_data.csv";
pub const DEFAULT_MAX_MISSING_MONTHS: usize = 3;
pub const DEFAULT_DATE_COLUMN: &str = "Sample Date";
pub const DEFAULT_TURBIDITY_COLUMN: &str = "Turbidity (NTU)";

/// Everything a pipeline run needs; passed explicitly into [`crate::pipeline::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// A year is kept only if at most this many of its months have no samples.
    pub max_missing_months: usize,
    pub date_column: String,
    pub turbidity_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            max_missing_months: DEFAULT_MAX_MISSING_MONTHS,
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            turbidity_column: DEFAULT_TURBIDITY_COLUMN.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(content)
            .map_err(|e| PipelineError::Config(format!("config file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_missing_months > MONTHS_PER_YEAR {
            return Err(PipelineError::Config(format!(
                "max_missing_months must be at most {MONTHS_PER_YEAR}, got {}",
                self.max_missing_months
            )));
        }
        if self.date_column.trim().is_empty() {
            return Err(PipelineError::Config("date_column is empty".to_string()));
        }
        if self.turbidity_column.trim().is_empty() {
            return Err(PipelineError::Config("turbidity_column is empty".to_string()));
        }
        Ok(())
    }
}
