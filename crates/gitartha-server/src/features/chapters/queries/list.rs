use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::{self, DbError};
use crate::models::Chapter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListChaptersQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChaptersResponse {
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListChaptersError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl Request<Result<ListChaptersResponse, ListChaptersError>> for ListChaptersQuery {}

impl crate::cqrs::middleware::Query for ListChaptersQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: ListChaptersQuery,
) -> Result<ListChaptersResponse, ListChaptersError> {
    let chapters = db::chapters::list_chapters(&pool).await?;
    Ok(ListChaptersResponse { chapters })
}
