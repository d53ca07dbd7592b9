//! Database error classification
//!
//! Distinguishes unique and foreign key violations from other database
//! failures so writers can report the offending key instead of a raw driver
//! error.
//!
//! # Examples
//!
//! ```rust,ignore
//! use gitartha_server::features::shared::error_helpers::{check_constraint_violation, ConstraintViolation};
//!
//! match check_constraint_violation(err) {
//!     ConstraintViolation::ForeignKeyViolation => { /* missing parent chapter */ },
//!     ConstraintViolation::UniqueViolation => { /* duplicate natural key */ },
//!     ConstraintViolation::Other(e) => return Err(e.into()),
//! }
//! ```

use sqlx::Error as SqlxError;

/// Result of checking for a database constraint violation
#[derive(Debug)]
pub enum ConstraintViolation {
    /// A unique constraint was violated
    UniqueViolation,
    /// A foreign key constraint was violated
    ForeignKeyViolation,
    /// No constraint violation - some other error occurred
    Other(SqlxError),
}

/// Check the type of database constraint violation
pub fn check_constraint_violation(error: SqlxError) -> ConstraintViolation {
    if let SqlxError::Database(ref db_err) = error {
        if db_err.is_unique_violation() {
            return ConstraintViolation::UniqueViolation;
        }
        if db_err.is_foreign_key_violation() {
            return ConstraintViolation::ForeignKeyViolation;
        }
    }
    ConstraintViolation::Other(error)
}

/// Whether the statement was cancelled by the server (e.g. `statement_timeout`)
pub fn is_query_canceled(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.code().as_deref() == Some("57014");
    }
    false
}
