//! Feature modules implementing the Gitartha API
//!
//! Each feature is a vertical slice of CQRS queries plus the routes that expose
//! them. The API is read-only; writes happen only through ingestion.
//!
//! # Features
//!
//! - **chapters**: chapter listing, chapter with verses, verse lookup
//! - **verses**: verse queries and random sampling
//! - **search**: translation substring search
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `queries/` - Read operations, one file per query with its `handle` fn
//! - `routes.rs` - HTTP route definitions
//!
//! Queries implement `mediator::Request` and are registered in
//! [`crate::cqrs::build_mediator`].

pub mod chapters;
pub mod search;
pub mod shared;
pub mod verses;

use axum::Router;
use sqlx::PgPool;

/// Creates the `/api/v1` router with all feature routes mounted
///
/// - `/chapters` - Chapters and their verses
/// - `/search` - Translation search
/// - `/random` - Random verse
pub fn router(pool: PgPool) -> Router<()> {
    Router::new()
        .nest("/chapters", chapters::chapters_routes().with_state(pool.clone()))
        .nest("/search", search::search_routes().with_state(pool.clone()))
        .nest("/random", verses::random_routes().with_state(pool))
}
