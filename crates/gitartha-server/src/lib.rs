//! Gitartha Server Library
//!
//! Serves the Bhagavad Gita's chapters and verses, in English and Hindi, over
//! a small read-only HTTP API backed by PostgreSQL, and hosts the ingestion
//! core that loads the corpus from CSV.
//!
//! # Overview
//!
//! - **ingest**: transactional CSV loader (parser, per-pass verse counts,
//!   upserting writer, bounded and cancellable orchestrator)
//! - **db**: connection pool and the read-side query store
//! - **features**: CQRS query slices and their HTTP routes
//! - **api**: router assembly, health check and graceful shutdown
//! - **config** / **middleware**: environment configuration, CORS and tracing
//!
//! # Consistency
//!
//! Every ingestion pass runs in one transaction whose last statement sets each
//! chapter's `verse_count`. Readers only ever see committed state, so a
//! chapter's count always matches its stored verses.
//!
//! # Example
//!
//! ```no_run
//! use gitartha_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     api::serve(config, pool).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use db::{DbError, DbResult};
pub use error::{AppError, AppResult};
pub use ingest::{IngestError, LoadStats, VerseLoader};
