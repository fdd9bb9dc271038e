//! Operational entry point for the task board.
//!
//! Usage:
//!
//! ```text
//! taskboard [--config PATH] deadlines [--today YYYY-MM-DD]
//! taskboard [--config PATH] export [--output PATH]
//! ```
//!
//! `deadlines` runs one deadline-proximity sweep and is meant to be invoked
//! daily by a scheduler. `--today` simulates another calendar day.
//! `export` writes every project with its tasks as pretty JSON.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::WrapErr;
use mockable::DefaultClock;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskboard::board::adapters::postgres::{
    BoardPgPool, PostgresProjectRepository, PostgresTaskRepository,
};
use taskboard::board::services::ProjectService;
use taskboard::config::{TaskboardConfig, load_config};
use taskboard::notification::adapters::WebhookDispatcher;
use taskboard::notification::services::DeadlineScanService;
use taskboard::telemetry::init_tracing;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Project task board maintenance")]
struct Cli {
    /// Configuration file (defaults to `taskboard.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Notify owners of tasks due today or soon.
    Deadlines {
        /// Run the sweep as if this were the current date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Dump all projects with their tasks as JSON.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.log_level).map_err(eyre::Report::msg)?;

    let pool = connect(&config).await?;
    let tasks = Arc::new(PostgresTaskRepository::new(pool.clone()));
    let projects = Arc::new(PostgresProjectRepository::new(pool));

    match cli.command {
        Command::Deadlines { today } => run_deadlines(&config, tasks, projects, today).await,
        Command::Export { output } => run_export(tasks, projects, output.as_deref()).await,
    }
}

async fn connect(config: &TaskboardConfig) -> eyre::Result<BoardPgPool> {
    let url = config.database.require_url()?.to_owned();
    let max_connections = config.database.max_connections;
    tokio::task::spawn_blocking(move || {
        Pool::builder()
            .max_size(max_connections)
            .build(ConnectionManager::<PgConnection>::new(url))
    })
    .await?
    .wrap_err("failed to open the database pool")
}

async fn run_deadlines(
    config: &TaskboardConfig,
    tasks: Arc<PostgresTaskRepository>,
    projects: Arc<PostgresProjectRepository>,
    today: Option<NaiveDate>,
) -> eyre::Result<()> {
    let notification = &config.notification;
    let dispatcher = Arc::new(WebhookDispatcher::new(notification.dispatch_timeout()?)?);
    let orchestrator = Arc::new(notification.orchestrator(dispatcher)?);
    if orchestrator.resolver().directory().is_empty() {
        warn!("no notification channels configured, reminders will be skipped");
    }

    let service = DeadlineScanService::new(tasks, projects, orchestrator, Arc::new(DefaultClock))
        .with_utc_offset(notification.utc_offset()?);
    let day = today.unwrap_or_else(|| service.today());
    let report = service.scan_on(day).await?;

    if report.failed_count() > 0 {
        warn!(
            failed = report.failed_count(),
            "some deadline reminders could not be delivered"
        );
    }
    Ok(())
}

async fn run_export(
    tasks: Arc<PostgresTaskRepository>,
    projects: Arc<PostgresProjectRepository>,
    output: Option<&Path>,
) -> eyre::Result<()> {
    let service = ProjectService::new(projects, tasks, Arc::new(DefaultClock));
    let export = service.export_board().await?;
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), projects = export.len(), "board exported");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
