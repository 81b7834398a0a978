//! CLI entry point for the Transjakarta transaction explorer.
//!
//! Loads the transaction table once, applies the sidebar-style filters given
//! on the command line and hands the chart datasets to renderers as JSON or
//! CSV.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Weekday;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transjakarta_insights::{
    config::DisplayConfig,
    dashboard::DashboardReport,
    dataset::{DatasetCache, Table, source_for},
    filter::{ALL_CORRIDORS, CorridorSelector, FilterCriteria, SelectionOptions},
    output::{export_tables, print_pretty, to_json, write_json},
};

const DEFAULT_SOURCE: &str = "data/dfTransjakarta.csv";

#[derive(Parser)]
#[command(name = "transjakarta_insights")]
#[command(about = "Explore Transjakarta tap-in/tap-out transactions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DatasetArgs {
    /// Path or URL of the transaction CSV (default: $DATASET_SOURCE)
    #[arg(short, long, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// JSON file overriding display labels, colors and limits
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    /// Only tap-ins on this weekday (e.g. "Monday")
    #[arg(long)]
    day: Option<Weekday>,

    /// Only this corridor name; "All" disables the filter
    #[arg(long, default_value = ALL_CORRIDORS)]
    corridor: CorridorSelector,

    /// Only these payment banks (raw codes); repeat for several
    #[arg(long = "bank", value_name = "CODE")]
    banks: Vec<String>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            day: self.day,
            corridor: self.corridor.clone(),
            banks: self.banks.iter().cloned().collect(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the weekdays, corridors and banks available for filtering
    Options {
        #[command(flatten)]
        dataset: DatasetArgs,
    },
    /// Compute every chart dataset and print or save it as JSON
    Report {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the chart annotations and the narrative conclusion
    Summary {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write each chart dataset as a CSV file
    Export {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Directory to write the CSV files into
        #[arg(short = 'd', long, default_value = "charts")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Options { dataset } => {
            let (table, _) = open_dataset(&dataset).await?;
            let options = SelectionOptions::from_table(&table);
            info!(
                days = options.days.len(),
                corridors = options.corridors.len() - 1,
                banks = options.banks.len(),
                "Selection options collected"
            );
            println!("{}", to_json(&options)?);
        }
        Commands::Report {
            dataset,
            filters,
            output,
        } => {
            let report = run_pass(&dataset, &filters).await?;
            print_pretty(&report);
            match output {
                Some(path) => write_json(&path, &report)?,
                None => println!("{}", to_json(&report)?),
            }
        }
        Commands::Summary { dataset, filters } => {
            let report = run_pass(&dataset, &filters).await?;
            if let Some(hourly) = &report.annotations.hourly {
                println!("[hourly chart @ {}:00] {}", hourly.x, hourly.text);
            }
            if let Some(corridor) = &report.annotations.corridor {
                println!("[corridor chart @ {}] {}", corridor.x, corridor.text);
            }
            println!("{}", report.narrative);
        }
        Commands::Export {
            dataset,
            filters,
            output_dir,
        } => {
            let report = run_pass(&dataset, &filters).await?;
            for path in export_tables(&output_dir, &report)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Colored stderr output plus a JSON daily-rolling log file.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/transjakarta_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transjakarta_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(guard)
}

/// Resolves the dataset location and display config, then loads the table.
#[tracing::instrument(skip_all)]
async fn open_dataset(args: &DatasetArgs) -> Result<(Arc<Table>, DisplayConfig)> {
    let config = match &args.config {
        Some(path) => DisplayConfig::load(path)
            .with_context(|| format!("failed to load display config '{}'", path.display()))?,
        None => DisplayConfig::default(),
    };

    let location = args
        .source
        .clone()
        .or_else(|| std::env::var("DATASET_SOURCE").ok())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    let token = std::env::var("DATASET_TOKEN").ok();

    let cache = DatasetCache::new(source_for(&location, token.as_deref())?);
    let table = cache
        .load()
        .await
        .with_context(|| format!("failed to load dataset from '{location}'"))?;

    Ok((table, config))
}

async fn run_pass(dataset: &DatasetArgs, filters: &FilterArgs) -> Result<DashboardReport> {
    let (table, config) = open_dataset(dataset).await?;
    Ok(DashboardReport::build(&table, &filters.criteria(), &config))
}
