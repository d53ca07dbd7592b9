use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::get::{fetch, GetChapterError};
use crate::models::Verse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChapterVersesQuery {
    pub chapter: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListChapterVersesResponse {
    pub chapter: i32,
    pub verses: Vec<Verse>,
}

/// Same failure modes as a chapter lookup
pub type ListChapterVersesError = GetChapterError;

impl Request<Result<ListChapterVersesResponse, ListChapterVersesError>> for ListChapterVersesQuery {}

impl crate::cqrs::middleware::Query for ListChapterVersesQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListChapterVersesQuery,
) -> Result<ListChapterVersesResponse, ListChapterVersesError> {
    super::get::GetChapterQuery {
        chapter: query.chapter,
    }
    .validate()?;

    let found = fetch(&pool, query.chapter).await?;
    Ok(ListChapterVersesResponse {
        chapter: found.chapter.id,
        verses: found.verses,
    })
}
