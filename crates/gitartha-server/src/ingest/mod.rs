//! Verse ingestion core
//!
//! One ingestion pass reads a CSV source and loads it into the store inside a
//! single transaction:
//!
//! - **parser**: header-driven CSV reader yielding one [`VerseRow`] per record
//! - **tracker**: per-pass verse counts keyed by chapter
//! - **storage**: the transactional writer (chapter create-or-skip, verse
//!   upsert, final `verse_count` reconciliation)
//! - **loader**: composes the three into one bounded, cancellable operation
//!
//! Any failure rolls the whole pass back. Re-running a pass on the same source
//! is idempotent.

use std::path::PathBuf;

use thiserror::Error;

pub mod loader;
pub mod parser;
pub mod storage;
pub mod tracker;

pub use loader::{LoadStats, VerseLoader};
pub use parser::{VerseCsvParser, VerseRow, REQUIRED_COLUMNS};
pub use storage::UpsertOutcome;
pub use tracker::VerseCountTracker;

/// Errors that abort an ingestion pass
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open source {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    #[error("Failed to read source: {0}")]
    Read(#[from] csv::Error),

    #[error("Constraint violation writing verse {chapter}.{verse}: {message}")]
    ConstraintViolation {
        chapter: i32,
        verse: i32,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Ingestion deadline exceeded after {rows} rows")]
    DeadlineExceeded { rows: u64 },

    #[error("Ingestion cancelled after {rows} rows")]
    Cancelled { rows: u64 },
}

impl IngestError {
    pub fn malformed(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }

    /// Line number for input errors, if the failure is tied to one
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::MalformedInput { line, .. } => Some(*line),
            _ => None,
        }
    }
}
