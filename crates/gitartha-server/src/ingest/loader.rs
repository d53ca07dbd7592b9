//! Ingestion orchestrator
//!
//! Drives parser → writer → tracker for one source file inside one
//! transaction, then reconciles chapter verse counts and commits. The pass is
//! bounded by a deadline and can be cancelled; both are checked before every
//! row, and the database enforces the remaining deadline per statement through
//! `SET LOCAL statement_timeout`.
//!
//! # Example
//!
//! ```rust,ignore
//! use gitartha_server::ingest::VerseLoader;
//! use std::time::Duration;
//!
//! let stats = VerseLoader::new(pool).load_csv("bg.csv", Duration::from_secs(120)).await?;
//! println!("{} rows across {} chapters", stats.rows, stats.chapters);
//! ```

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::parser::VerseCsvParser;
use super::storage::{ensure_chapter, reconcile_verse_counts, upsert_verse, UpsertOutcome};
use super::tracker::VerseCountTracker;
use super::IngestError;
use crate::features::shared::error_helpers::is_query_canceled;
use crate::models::Chapter;

/// Summary of a committed ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Data rows processed
    pub rows: u64,
    /// Verses created
    pub inserted: u64,
    /// Existing verses overwritten
    pub updated: u64,
    /// Distinct chapters touched
    pub chapters: usize,
}

/// Loads verse sources into the store
#[derive(Clone)]
pub struct VerseLoader {
    pool: PgPool,
}

impl VerseLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run one ingestion pass over `path`, bounded by `timeout`.
    pub async fn load_csv(&self, path: impl AsRef<Path>, timeout: Duration) -> Result<LoadStats, IngestError> {
        self.load_csv_with_cancel(path, timeout, CancellationToken::new())
            .await
    }

    /// Run one ingestion pass that also stops when `cancel` fires.
    ///
    /// On any error the transaction is rolled back and the store is left as it
    /// was before the pass.
    #[tracing::instrument(skip(self, path, cancel), fields(source = %path.as_ref().display()))]
    pub async fn load_csv_with_cancel(
        &self,
        path: impl AsRef<Path>,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<LoadStats, IngestError> {
        let deadline = Instant::now() + timeout;

        // Header problems surface before any transaction exists.
        let parser = VerseCsvParser::open(path.as_ref())?;

        self.load_parsed(parser, deadline, &cancel).await
    }

    async fn load_parsed<R: Read>(
        &self,
        parser: VerseCsvParser<R>,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<LoadStats, IngestError> {
        let mut tx = match tokio::time::timeout_at(deadline, self.pool.begin()).await {
            Ok(tx) => tx?,
            Err(_) => return Err(IngestError::DeadlineExceeded { rows: 0 }),
        };

        let mut stats = LoadStats::default();
        let outcome = run_pass(&mut tx, parser, &mut stats, deadline, cancel).await;

        match outcome {
            Ok(()) => {
                tx.commit().await?;
                info!(
                    rows = stats.rows,
                    inserted = stats.inserted,
                    updated = stats.updated,
                    chapters = stats.chapters,
                    "Ingestion pass committed"
                );
                Ok(stats)
            },
            Err(e) => {
                let e = match e {
                    IngestError::Database(ref db_err)
                        if is_query_canceled(db_err) || Instant::now() >= deadline =>
                    {
                        IngestError::DeadlineExceeded { rows: stats.rows }
                    },
                    other => other,
                };
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed after ingestion error");
                }
                warn!(error = %e, rows = stats.rows, "Ingestion pass rolled back");
                Err(e)
            },
        }
    }
}

async fn run_pass<R: Read>(
    tx: &mut Transaction<'_, Postgres>,
    parser: VerseCsvParser<R>,
    stats: &mut LoadStats,
    deadline: Instant,
    cancel: &CancellationToken,
) -> Result<(), IngestError> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(IngestError::DeadlineExceeded { rows: 0 });
    }

    // statement_timeout of 0 disables the limit, so never go below 1ms.
    let millis = remaining.as_millis().max(1);
    sqlx::query(&format!("SET LOCAL statement_timeout = {}", millis))
        .execute(&mut **tx)
        .await?;

    let mut tracker = VerseCountTracker::new();

    for item in parser {
        check_bounds(stats.rows, deadline, cancel)?;

        let row = item?;

        if !tracker.contains_chapter(row.chapter) {
            ensure_chapter(tx, row.chapter, &Chapter::default_name(row.chapter)).await?;
        }

        match upsert_verse(tx, &row).await? {
            UpsertOutcome::Inserted => stats.inserted += 1,
            UpsertOutcome::Updated => stats.updated += 1,
        }

        tracker.increment(row.key());
        stats.rows += 1;
    }

    check_bounds(stats.rows, deadline, cancel)?;
    reconcile_verse_counts(tx, &tracker).await?;
    stats.chapters = tracker.chapters();

    check_bounds(stats.rows, deadline, cancel)
}

fn check_bounds(rows: u64, deadline: Instant, cancel: &CancellationToken) -> Result<(), IngestError> {
    if cancel.is_cancelled() {
        return Err(IngestError::Cancelled { rows });
    }
    if Instant::now() >= deadline {
        return Err(IngestError::DeadlineExceeded { rows });
    }
    Ok(())
}
