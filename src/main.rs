//! CLI entry point for the monthly turbidity processor.
//!
//! Reads a water-quality sampling export, averages turbidity per month,
//! fills short gaps and writes one row per month for every year complete
//! enough to keep.

use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use turbidity_monthly::PipelineConfig;
use turbidity_monthly::output::{format_years, print_json, write_summary_json};

#[derive(Parser)]
#[command(name = "turbidity_monthly")]
#[command(
    about = "Build a gap-limited monthly turbidity series from a sampling CSV",
    long_about = None
)]
struct Cli {
    /// Sampling CSV to read
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// CSV file to write the monthly series to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON config file; flags given here override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drop any year with more than this many months lacking samples
    #[arg(short = 'm', long)]
    max_missing_months: Option<usize>,

    /// Name of the sample date column
    #[arg(long)]
    date_column: Option<String>,

    /// Name of the turbidity column
    #[arg(long)]
    turbidity_column: Option<String>,

    /// Optional: also write the run summary as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(max) = self.max_missing_months {
            config.max_missing_months = max;
        }
        if let Some(col) = &self.date_column {
            config.date_column = col.clone();
        }
        if let Some(col) = &self.turbidity_column {
            config.turbidity_column = col.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/turbidity_monthly.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("turbidity_monthly.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let result = turbidity_monthly::run(&config)
        .with_context(|| format!("processing {}", config.input_path.display()))?;

    print_json(&result.summary)?;
    if let Some(path) = &cli.summary_json {
        write_summary_json(path, &result.summary)
            .with_context(|| format!("writing summary {}", path.display()))?;
        info!(path = %path.display(), "Summary written");
    }

    println!("\nYears with complete data (including interpolated months):");
    println!("{}", format_years(&result.summary.retained_years));

    Ok(())
}
