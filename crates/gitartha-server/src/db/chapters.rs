//! Chapter queries.
//!
//! # Examples
//!
//! ```rust,ignore
//! use gitartha_server::db::{chapters, create_pool, DbConfig};
//!
//! let pool = create_pool(&DbConfig::from_env()?).await?;
//! let all = chapters::list_chapters(&pool).await?;
//! let second = chapters::get_chapter_with_verses(&pool, 2).await?;
//! assert_eq!(second.chapter.verse_count as usize, second.verses.len());
//! ```

use sqlx::PgPool;

use super::{DbError, DbResult};
use crate::models::{Chapter, ChapterWithVerses};

const CHAPTER_COLUMNS: &str =
    "id, name_en, name_hi, summary_en, summary_hi, verse_count";

/// Lists all chapters ordered by chapter number.
#[tracing::instrument(skip(pool))]
pub async fn list_chapters(pool: &PgPool) -> DbResult<Vec<Chapter>> {
    let chapters = sqlx::query_as::<_, Chapter>(&format!(
        "SELECT {} FROM chapters ORDER BY id",
        CHAPTER_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(chapters)
}

/// Retrieves one chapter and its verses ordered by verse number.
///
/// Both reads run in a single read-only, repeatable-read transaction so the
/// returned `verse_count` and verse list come from the same committed pass.
///
/// # Errors
///
/// Returns `DbError::NotFound` if the chapter doesn't exist.
#[tracing::instrument(skip(pool))]
pub async fn get_chapter_with_verses(pool: &PgPool, chapter_id: i32) -> DbResult<ChapterWithVerses> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let chapter = sqlx::query_as::<_, Chapter>(&format!(
        "SELECT {} FROM chapters WHERE id = $1",
        CHAPTER_COLUMNS
    ))
    .bind(chapter_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DbError::not_found("Chapter", chapter_id))?;

    let verses = super::verses::list_verses_by_chapter(&mut *tx, chapter_id).await?;

    tx.commit().await?;

    Ok(ChapterWithVerses { chapter, verses })
}
