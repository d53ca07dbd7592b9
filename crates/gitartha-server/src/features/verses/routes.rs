//! Verse API routes
//!
//! - `GET /api/v1/random` - One verse chosen uniformly at random; 404 when the
//!   store is empty
//!
//! Lookup by `(chapter, verse)` is mounted under the chapter routes.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::queries::{RandomVerseError, RandomVerseQuery};
use crate::error::AppError;
use crate::models::Verse;

pub fn random_routes() -> Router<PgPool> {
    Router::new().route("/", get(random_verse))
}

#[tracing::instrument(skip(pool))]
async fn random_verse(State(pool): State<PgPool>) -> Result<Json<Verse>, RandomVerseError> {
    let verse = super::queries::random::handle(pool, RandomVerseQuery).await?;

    tracing::debug!(verse = %verse.key(), "Random verse served");

    Ok(Json(verse))
}

impl IntoResponse for RandomVerseError {
    fn into_response(self) -> Response {
        let error = match self {
            RandomVerseError::Empty => AppError::NotFound,
            RandomVerseError::Database(e) => AppError::Database(e),
        };
        error.into_response()
    }
}
