//! Translation substring search
//!
//! Matches the query case-insensitively against the English or Hindi text of
//! each verse. There is no ranking: results come back in canonical
//! `(chapter, verse)` order.

use gitartha_common::Language;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::{self, DbError};
use crate::features::shared::{validate_search_text, ParamValidationError};
use crate::models::Verse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchVersesQuery {
    pub query: String,
    #[serde(default)]
    pub lang: Language,
    /// Requested result count; clamped to `1..=100`, default 20
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchVersesResponse {
    pub results: Vec<Verse>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchVersesError {
    #[error(transparent)]
    Validation(#[from] ParamValidationError),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl Request<Result<SearchVersesResponse, SearchVersesError>> for SearchVersesQuery {}

impl crate::cqrs::middleware::Query for SearchVersesQuery {}

impl SearchVersesQuery {
    pub fn validate(&self) -> Result<(), SearchVersesError> {
        validate_search_text(Some(&self.query))?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool), fields(lang = %query.lang))]
pub async fn handle(
    pool: PgPool,
    query: SearchVersesQuery,
) -> Result<SearchVersesResponse, SearchVersesError> {
    query.validate()?;

    let results = db::verses::search_verses(&pool, &query.query, query.lang, query.limit).await?;
    Ok(SearchVersesResponse { results })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(pool: &PgPool, verses: i32) -> sqlx::Result<()> {
        sqlx::query("INSERT INTO chapters (id, name_en, verse_count) VALUES (1, 'Chapter 1', $1)")
            .bind(verses)
            .execute(pool)
            .await?;
        for n in 1..=verses {
            sqlx::query(
                "INSERT INTO verses (id, chapter_id, verse_number, english, hindi) VALUES ($1, 1, $2, 'act without attachment', 'कर्म')",
            )
            .bind(uuid::Uuid::new_v4())
            .bind(n)
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    fn query(text: &str, limit: Option<i64>) -> SearchVersesQuery {
        SearchVersesQuery {
            query: text.to_string(),
            lang: Language::English,
            limit,
        }
    }

    #[test]
    fn test_validation_requires_two_characters() {
        assert!(query("a", None).validate().is_err());
        assert!(query("ab", None).validate().is_ok());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_limit_clamping(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool, 120).await?;

        let zero = handle(pool.clone(), query("attachment", Some(0))).await.unwrap();
        assert_eq!(zero.results.len(), 20);

        let large = handle(pool.clone(), query("attachment", Some(500))).await.unwrap();
        assert_eq!(large.results.len(), 100);

        let negative = handle(pool.clone(), query("attachment", Some(-3))).await.unwrap();
        assert_eq!(negative.results.len(), 20);

        let unspecified = handle(pool.clone(), query("ATTACHMENT", None)).await.unwrap();
        assert_eq!(unspecified.results.len(), 20);
        assert_eq!(unspecified.results[0].verse_number, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_hindi_search(pool: PgPool) -> sqlx::Result<()> {
        seed(&pool, 3).await?;

        let hindi = SearchVersesQuery {
            query: "कर्म".to_string(),
            lang: Language::Hindi,
            limit: None,
        };
        let response = handle(pool.clone(), hindi).await.unwrap();
        assert_eq!(response.results.len(), 3);
        Ok(())
    }
}
