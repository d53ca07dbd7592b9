//! Gitartha Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the Gitartha workspace.
//!
//! - **Error Handling**: [`GitarthaError`] and the crate [`Result`] alias
//! - **Logging**: one `tracing` subscriber setup for every binary
//! - **Types**: language codes and the verse natural key

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{GitarthaError, Result};
pub use types::{Language, VerseKey};
