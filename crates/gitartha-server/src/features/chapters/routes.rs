//! Chapter API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/chapters` - All chapters in order
//! - `GET /api/v1/chapters/:chapter` - One chapter with its verses
//! - `GET /api/v1/chapters/:chapter/verses` - Only the verses of a chapter
//! - `GET /api/v1/chapters/:chapter/verses/:verse` - A single verse
//!
//! Path numbers must be positive integers; anything else is a 400.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::queries::{
    GetChapterError, GetChapterQuery, GetChapterResponse, ListChapterVersesQuery,
    ListChapterVersesResponse, ListChaptersError, ListChaptersQuery, ListChaptersResponse,
};
use crate::error::AppError;
use crate::features::shared::{parse_number_param, ParamValidationError};
use crate::features::verses::queries::{GetVerseError, GetVerseQuery};
use crate::models::Verse;

pub fn chapters_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_chapters))
        .route("/:chapter", get(get_chapter))
        .route("/:chapter/verses", get(list_chapter_verses))
        .route("/:chapter/verses/:verse", get(get_verse))
}

#[tracing::instrument(skip(pool))]
async fn list_chapters(State(pool): State<PgPool>) -> Result<Json<ListChaptersResponse>, ChaptersApiError> {
    let response = super::queries::list::handle(pool, ListChaptersQuery).await?;

    tracing::debug!(count = response.chapters.len(), "Chapters listed via API");

    Ok(Json(response))
}

#[tracing::instrument(skip(pool))]
async fn get_chapter(
    State(pool): State<PgPool>,
    Path(chapter): Path<String>,
) -> Result<Json<GetChapterResponse>, ChaptersApiError> {
    let query = GetChapterQuery {
        chapter: parse_number_param("chapter", &chapter)?,
    };

    Ok(Json(super::queries::get::handle(pool, query).await?))
}

#[tracing::instrument(skip(pool))]
async fn list_chapter_verses(
    State(pool): State<PgPool>,
    Path(chapter): Path<String>,
) -> Result<Json<ListChapterVersesResponse>, ChaptersApiError> {
    let query = ListChapterVersesQuery {
        chapter: parse_number_param("chapter", &chapter)?,
    };

    Ok(Json(super::queries::list_verses::handle(pool, query).await?))
}

#[tracing::instrument(skip(pool))]
async fn get_verse(
    State(pool): State<PgPool>,
    Path((chapter, verse)): Path<(String, String)>,
) -> Result<Json<Verse>, ChaptersApiError> {
    let query = GetVerseQuery {
        chapter: parse_number_param("chapter", &chapter)?,
        verse: parse_number_param("verse", &verse)?,
    };

    Ok(Json(crate::features::verses::queries::get::handle(pool, query).await?))
}

#[derive(Debug)]
enum ChaptersApiError {
    Params(ParamValidationError),
    List(ListChaptersError),
    Get(GetChapterError),
    Verse(GetVerseError),
}

impl From<ParamValidationError> for ChaptersApiError {
    fn from(err: ParamValidationError) -> Self {
        Self::Params(err)
    }
}

impl From<ListChaptersError> for ChaptersApiError {
    fn from(err: ListChaptersError) -> Self {
        Self::List(err)
    }
}

impl From<GetChapterError> for ChaptersApiError {
    fn from(err: GetChapterError) -> Self {
        Self::Get(err)
    }
}

impl From<GetVerseError> for ChaptersApiError {
    fn from(err: GetVerseError) -> Self {
        Self::Verse(err)
    }
}

impl IntoResponse for ChaptersApiError {
    fn into_response(self) -> Response {
        let error = match self {
            ChaptersApiError::Params(e)
            | ChaptersApiError::Get(GetChapterError::Validation(e))
            | ChaptersApiError::Verse(GetVerseError::Validation(e)) => AppError::from(e),
            ChaptersApiError::Get(GetChapterError::NotFound(_))
            | ChaptersApiError::Verse(GetVerseError::NotFound(_)) => AppError::NotFound,
            ChaptersApiError::List(ListChaptersError::Database(e))
            | ChaptersApiError::Get(GetChapterError::Database(e))
            | ChaptersApiError::Verse(GetVerseError::Database(e)) => AppError::Database(e),
        };
        error.into_response()
    }
}
