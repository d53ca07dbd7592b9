//! Router assembly and serving
//!
//! ```text
//! GET /healthz                                   liveness (store ping, 2s bound)
//! GET /api/v1/chapters                           {chapters}
//! GET /api/v1/chapters/:chapter                  {chapter, verses}
//! GET /api/v1/chapters/:chapter/verses           {chapter, verses}
//! GET /api/v1/chapters/:chapter/verses/:verse    verse
//! GET /api/v1/search?query=&lang=&limit=         {results}
//! GET /api/v1/random                             verse
//! ```

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::{db, features, middleware};

/// Build the full application router
pub fn create_router(pool: PgPool, config: &Config) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .with_state(pool.clone())
        .nest("/api/v1", features::router(pool))
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(pool): State<PgPool>) -> Response {
    match db::ping(&pool, db::DEFAULT_PING_TIMEOUT).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": Utc::now(),
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        },
    }
}

/// Serve until SIGINT/SIGTERM, then give in-flight requests up to the
/// configured shutdown timeout before returning.
pub async fn serve(config: Config, pool: PgPool) -> anyhow::Result<()> {
    let app = create_router(pool, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let shutdown = CancellationToken::new();
    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map_err(Into::into),
        _ = shutdown_signal() => shutdown.cancel(),
    }

    info!("Waiting up to {} seconds for connections to close", grace.as_secs());
    match tokio::time::timeout(grace, server).await {
        Ok(result) => result?,
        Err(_) => warn!("Shutdown timeout elapsed with connections still open"),
    }

    info!("Server shut down");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
