//! Gitartha Server - Main entry point

use anyhow::Result;
use gitartha_common::logging::{init_logging, LogConfig};
use tracing::info;

use gitartha_server::{api, config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("gitartha-server")
        .filter_directives("gitartha_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .with_env_overrides()?;

    // Held for the life of the process so buffered file logs are flushed on exit.
    let _log_guard = init_logging(&log_config)?;

    info!("Starting Gitartha server");

    let config = Config::load()?;
    info!(
        environment = %config.environment,
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database).await?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Database migrations completed");

    api::serve(config, pool.clone()).await?;

    pool.close().await;
    info!("Server shut down gracefully");

    Ok(())
}
