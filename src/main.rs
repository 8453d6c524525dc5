//! CLI entry point for the survey report tool.
//!
//! Provides subcommands for computing survey metrics from a response CSV and
//! for rendering static HTML pages from pre-aggregated metadata tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use survey_report::{
    dataset::SurveyDataset,
    metrics::MetricsCalculator,
    output::{print_json, print_pretty},
    pages::{PageConfig, PageGenerator},
};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "survey_report")]
#[command(about = "Computes survey metrics and renders report pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics from a survey-response CSV
    Metrics {
        /// Survey-response CSV to read
        #[arg(short, long, default_value = "ProcessedData500-sample-anon.csv")]
        input: PathBuf,

        /// Directory the metric files are written to
        #[arg(short, long, default_value = "computed_metrics")]
        output_dir: PathBuf,

        /// Also log every metric category as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render HTML pages from pre-aggregated metadata CSVs
    Pages {
        /// Directory holding the metadata CSVs
        #[arg(short, long, default_value = "output_metadata")]
        metadata_dir: PathBuf,

        /// Directory holding the page templates
        #[arg(short, long, default_value = "templates")]
        templates_dir: PathBuf,

        /// Directory the pages are written to
        #[arg(short, long, default_value = "output_pages")]
        output_dir: PathBuf,

        /// Optional: JSON page list replacing the built-in pages
        #[arg(long)]
        pages: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/survey_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("survey_report.log"));

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

    match cli.command {
        Commands::Metrics {
            input,
            output_dir,
            json,
        } => {
            let dataset = SurveyDataset::load(&input)?;
            let calculator = MetricsCalculator::new(dataset);

            if json {
                print_json("evaluation", &calculator.evaluation())?;
                print_json("performance", &calculator.performance())?;
                print_json("demographic", &calculator.demographic())?;
                print_json("additional", &calculator.additional())?;
            }

            let written = calculator.write_all(&output_dir)?;
            info!(
                files = written.len(),
                output_dir = %output_dir.display(),
                "Metrics written"
            );
        }
        Commands::Pages {
            metadata_dir,
            templates_dir,
            output_dir,
            pages,
        } => {
            let config = match pages {
                Some(path) => PageConfig::load(&path)?,
                None => PageConfig::default(),
            };

            let generator = PageGenerator::new(metadata_dir, templates_dir, output_dir, config);
            let report = generator.run()?;
            print_pretty(&report);

            if !report.failed.is_empty() {
                warn!(failed = ?report.failed, "Some metadata tables could not be loaded");
            }
        }
    }

    Ok(())
}
