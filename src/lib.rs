pub mod aggregate;
pub mod config;
pub mod error;
pub mod gapfill;
pub mod interpolate;
pub mod loader;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{PipelineOutput, PipelineSummary, run, run_with};
