use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::{self, DbError};
use crate::features::shared::ParamValidationError;
use crate::models::{Chapter, ChapterWithVerses, Verse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetChapterQuery {
    pub chapter: i32,
}

/// A chapter with its verses in verse-number order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetChapterResponse {
    pub chapter: Chapter,
    pub verses: Vec<Verse>,
}

impl From<ChapterWithVerses> for GetChapterResponse {
    fn from(value: ChapterWithVerses) -> Self {
        Self {
            chapter: value.chapter,
            verses: value.verses,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetChapterError {
    #[error(transparent)]
    Validation(#[from] ParamValidationError),
    #[error("Chapter {0} not found")]
    NotFound(i32),
    #[error("Database error: {0}")]
    Database(DbError),
}

impl Request<Result<GetChapterResponse, GetChapterError>> for GetChapterQuery {}

impl crate::cqrs::middleware::Query for GetChapterQuery {}

impl GetChapterQuery {
    pub fn validate(&self) -> Result<(), GetChapterError> {
        if self.chapter <= 0 {
            return Err(ParamValidationError::InvalidNumber("chapter").into());
        }
        Ok(())
    }
}

/// Shared lookup for the chapter and chapter-verses endpoints
pub(crate) async fn fetch(pool: &PgPool, chapter: i32) -> Result<ChapterWithVerses, GetChapterError> {
    db::chapters::get_chapter_with_verses(pool, chapter)
        .await
        .map_err(|e| match e {
            DbError::NotFound(_) => GetChapterError::NotFound(chapter),
            other => GetChapterError::Database(other),
        })
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetChapterQuery) -> Result<GetChapterResponse, GetChapterError> {
    query.validate()?;
    Ok(fetch(&pool, query.chapter).await?.into())
}
