use gitartha_common::VerseKey;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::{self, DbError};
use crate::features::shared::ParamValidationError;
use crate::models::Verse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVerseQuery {
    pub chapter: i32,
    pub verse: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum GetVerseError {
    #[error(transparent)]
    Validation(#[from] ParamValidationError),
    #[error("Verse {0} not found")]
    NotFound(VerseKey),
    #[error("Database error: {0}")]
    Database(DbError),
}

impl Request<Result<Verse, GetVerseError>> for GetVerseQuery {}

impl crate::cqrs::middleware::Query for GetVerseQuery {}

impl GetVerseQuery {
    pub fn validate(&self) -> Result<(), GetVerseError> {
        if self.chapter <= 0 {
            return Err(ParamValidationError::InvalidNumber("chapter").into());
        }
        if self.verse <= 0 {
            return Err(ParamValidationError::InvalidNumber("verse").into());
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetVerseQuery) -> Result<Verse, GetVerseError> {
    query.validate()?;

    db::verses::get_verse(&pool, query.chapter, query.verse)
        .await
        .map_err(|e| match e {
            DbError::NotFound(_) => GetVerseError::NotFound(VerseKey::new(query.chapter, query.verse)),
            other => GetVerseError::Database(other),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(GetVerseQuery { chapter: 2, verse: 47 }.validate().is_ok());
        assert!(matches!(
            GetVerseQuery { chapter: 2, verse: 0 }.validate(),
            Err(GetVerseError::Validation(ParamValidationError::InvalidNumber("verse")))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_not_found(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool.clone(), GetVerseQuery { chapter: 1, verse: 3 }).await;
        assert!(matches!(result, Err(GetVerseError::NotFound(key)) if key == VerseKey::new(1, 3)));
        Ok(())
    }
}
