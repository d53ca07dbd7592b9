use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::{self, DbError};
use crate::models::Verse;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomVerseQuery;

#[derive(Debug, thiserror::Error)]
pub enum RandomVerseError {
    #[error("No verses available")]
    Empty,
    #[error("Database error: {0}")]
    Database(DbError),
}

impl Request<Result<Verse, RandomVerseError>> for RandomVerseQuery {}

impl crate::cqrs::middleware::Query for RandomVerseQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, _query: RandomVerseQuery) -> Result<Verse, RandomVerseError> {
    db::verses::random_verse(&pool).await.map_err(|e| match e {
        DbError::NotFound(_) => RandomVerseError::Empty,
        other => RandomVerseError::Database(other),
    })
}
