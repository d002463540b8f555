//! Dashboard export tool
//!
//! Loads a page the same way the dashboard does, applies the requested filter
//! and writes the export file, or prints the page counters.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_core::types::{
    AccessType, ClientStatus, IdeaCategory, IdeaStatus, LogLevel, LogStatus,
};
use dashboard_core::{Config, Error, Result, init_logging};
use dashboard_pages::{Dashboard, DashboardSummary, Notifier, Stores, TracingNotifier};
use dashboard_protocol::{ExportFormat, ExportRange, IdeaSort, Selector};
use tracing::{error, info};

/// Command line interface for the dashboard export tool
#[derive(Parser)]
#[command(
    name = "dashboard-export",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export access logs, clients and feedback from the dashboard",
    long_about = "Loads a dashboard page from the configured store, applies the same filters the page offers and writes a CSV or JSON export named <entity>-export-<date>.<ext>."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Output directory (overrides config)
    #[arg(short, long, value_name = "DIRECTORY", global = true)]
    output: Option<PathBuf>,

    /// Export format
    #[arg(short, long, default_value = "csv", global = true)]
    format: ExportFormat,

    /// Free-text search
    #[arg(short, long, default_value = "", global = true)]
    query: String,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Export access log entries
    AccessLogs {
        /// Time window (24h, 7d, 30d, 90d, all)
        #[arg(short, long, default_value = "7d")]
        range: ExportRange,

        /// Outcome status, or "all"
        #[arg(long, default_value = "all")]
        status: Selector<LogStatus>,

        /// Severity, or "all"; only narrows the page view, never the export
        #[arg(long, default_value = "all")]
        level: Selector<LogLevel>,

        /// Access type, or "all"
        #[arg(long = "type", default_value = "all")]
        access_type: Selector<AccessType>,

        /// Ignore the status and type filters
        #[arg(long)]
        no_filters: bool,
    },

    /// Export CRM clients
    Clients {
        /// Lifecycle status, or "all"
        #[arg(long, default_value = "all")]
        status: Selector<ClientStatus>,
    },

    /// Export feedback ideas
    Feedback {
        /// Triage status, or "all"
        #[arg(long, default_value = "all")]
        status: Selector<IdeaStatus>,

        /// Category, or "all"
        #[arg(long, default_value = "all")]
        category: Selector<IdeaCategory>,

        /// Ordering (votes, recent, trending)
        #[arg(long)]
        sort: Option<IdeaSort>,
    },

    /// Print the header counters of every page
    Summary {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        style: SummaryStyle,
    },
}

/// Rendering of the summary command
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SummaryStyle {
    /// One pretty JSON document
    Json,
    /// One line per page
    Text,
}

/// Main entry point for the export tool
///
/// # Errors
///
/// Returns error if configuration, the store or the export fails
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    let _guard = init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.store.backend,
        "Dashboard export starting"
    );

    let result = run(cli, &config).await;
    if let Err(e) = &result {
        error!(error = %e, "Dashboard export failed");
    }
    result
}

async fn run(cli: Cli, config: &Config) -> Result<()> {
    let stores = Stores::from_config(config).await?;
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let mut dashboard = Dashboard::new(&stores, &notifier, &config.pages);
    let directory = cli.output.unwrap_or_else(|| config.export.directory.clone());
    let now = Utc::now();

    let path = match cli.command {
        Commands::AccessLogs {
            range,
            status,
            level,
            access_type,
            no_filters,
        } => {
            let page = &mut dashboard.access_logs;
            page.load().await?;
            page.filter.query = cli.query;
            page.filter.status = status;
            page.filter.level = level;
            page.filter.access_type = access_type;
            page.export.range = range;
            page.export.format = cli.format;
            page.export.include_filters = !no_filters;
            page.export_to(&directory, now).await?
        }
        Commands::Clients { status } => {
            let page = &mut dashboard.clients;
            page.load().await?;
            page.filter.query = cli.query;
            page.filter.status = status;
            page.export_to(&directory, cli.format, now).await?
        }
        Commands::Feedback {
            status,
            category,
            sort,
        } => {
            let page = &mut dashboard.feedback;
            page.load().await?;
            page.filter.query = cli.query;
            page.filter.status = status;
            page.filter.category = category;
            if let Some(sort) = sort {
                page.sort = sort;
            }
            page.export_to(&directory, cli.format, now).await?
        }
        Commands::Summary { style } => {
            dashboard.load_all().await;
            print_summary(&dashboard, style)?;
            return Ok(());
        }
    };

    println!("{}", path.display());
    Ok(())
}

fn print_summary(dashboard: &Dashboard, style: SummaryStyle) -> Result<()> {
    let summary = DashboardSummary::collect(dashboard);
    match style {
        SummaryStyle::Json => {
            let rendered = serde_json::to_string_pretty(&summary).map_err(Error::Serialization)?;
            println!("{rendered}");
        }
        SummaryStyle::Text => println!("{}", summary.render_text(Utc::now())),
    }
    Ok(())
}
