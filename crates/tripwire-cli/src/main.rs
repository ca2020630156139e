//! Tripwire - trigger-file deployment poller
//!
//! Usage:
//!   tripwire                  # Deploy every triggered project (same as `run`)
//!   tripwire run --project x  # Deploy only the named projects
//!   tripwire status           # Show pending triggers without deploying

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tripwire_core::commands::{RunOptions, collect_status, run_deployments};
use tripwire_core::config::{ConfigStore, LoggingConfig};
use tripwire_core::report::{DeployOutcome, ProjectStatus, RunSummary};

#[derive(Parser)]
#[command(name = "tripwire")]
#[command(about = "Trigger-file deployment poller", long_about = None)]
struct Cli {
    /// Config file (defaults to $TRIPWIRE_CONFIG, then the user config dir)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy every project with a pending trigger file
    Run(RunArgs),

    /// Show projects and pending triggers without deploying
    Status {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Only consider these projects
    #[arg(long = "project", value_name = "NAME")]
    projects: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = ConfigStore::locate(cli.config)?;
    let config = store.load()?;
    init_logging(&config.logging, cli.verbose)?;
    tracing::debug!(path = %store.config_path().display(), "Loaded configuration");

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            let options = RunOptions::new().with_projects(&args.projects);
            let summary = run_deployments(&config, &options)?;
            match args.format {
                OutputFormat::Table => print_run_table(&summary),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
            if summary.has_failures() {
                std::process::exit(1);
            }
        }
        Commands::Status { format } => {
            let statuses = collect_status(&config)?;
            match format {
                OutputFormat::Table => print_status_table(&statuses),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&statuses)?),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let directive = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .with_context(|| format!("Invalid log level: {}", directive))?;

    let registry = tracing_subscriber::registry().with(filter);
    match &logging.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            registry
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init();
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(logging.ansi),
                )
                .init();
        }
    }
    Ok(())
}

fn print_run_table(summary: &RunSummary) {
    if summary.reports.is_empty() {
        println!("No projects configured.");
        return;
    }

    println!("{:<24} {:<12} Finished", "Project", "Outcome");
    println!("{}", "-".repeat(60));
    for report in &summary.reports {
        println!(
            "{:<24} {:<12} {}",
            report.project,
            outcome_label(&report.outcome),
            report.finished_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!();
    println!(
        "Summary: {} deployed, {} failed, {} idle",
        summary.succeeded, summary.failed, summary.idle
    );
}

fn outcome_label(outcome: &DeployOutcome) -> String {
    match outcome {
        DeployOutcome::Idle => "idle".to_string(),
        DeployOutcome::Succeeded => "✓ deployed".to_string(),
        DeployOutcome::Failed { stage } => format!("✗ {}", stage),
    }
}

fn print_status_table(statuses: &[ProjectStatus]) {
    if statuses.is_empty() {
        println!("No projects configured.");
        return;
    }

    println!(
        "{:<24} {:<8} {:<16} {:<6} {:<8} Directory",
        "Project", "Lang", "Branch", "Build", "Trigger"
    );
    println!("{}", "-".repeat(90));
    for status in statuses {
        println!(
            "{:<24} {:<8} {:<16} {:<6} {:<8} {}",
            status.name,
            status.language.as_str(),
            status.branch,
            if status.do_build { "yes" } else { "no" },
            if status.trigger_pending { "pending" } else { "-" },
            status.directory.display()
        );
    }
}
