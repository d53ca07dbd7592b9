//! Gitartha Ingest - loads the verse corpus from CSV into PostgreSQL

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gitartha_common::logging::{init_logging, LogConfig, LogLevel};
use gitartha_server::db::{self, DbConfig};
use gitartha_server::VerseLoader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "gitartha-ingest")]
#[command(author, version, about = "Load Bhagavad Gita verses from a CSV file")]
struct Cli {
    /// Source CSV with chapter,verse,sanskrit,transliteration,english,hindi columns
    #[arg(long, default_value = "bg.csv")]
    csv: PathBuf,

    /// Upper bound for the whole pass, in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Skip applying pending migrations before loading
    #[arg(long)]
    skip_migrations: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("gitartha-ingest")
        .filter_directives("sqlx=warn")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            return ExitCode::FAILURE;
        },
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Ingestion failed: {:#}", e);
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    dotenvy::dotenv().ok();

    let db_config = DbConfig::from_env()?;
    let pool = db::create_pool(&db_config).await?;

    if !cli.skip_migrations {
        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling ingestion");
            on_interrupt.cancel();
        }
    });

    info!(source = %cli.csv.display(), timeout_secs = cli.timeout, "Starting ingestion");

    let result = VerseLoader::new(pool.clone())
        .load_csv_with_cancel(&cli.csv, Duration::from_secs(cli.timeout), cancel)
        .await;

    pool.close().await;

    let stats = result.with_context(|| format!("Loading {}", cli.csv.display()))?;
    info!(
        rows = stats.rows,
        inserted = stats.inserted,
        updated = stats.updated,
        chapters = stats.chapters,
        "Ingestion complete"
    );

    Ok(())
}
