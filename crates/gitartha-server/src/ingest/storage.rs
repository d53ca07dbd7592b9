//! Transactional writer for ingestion passes
//!
//! Every function takes the pass's open transaction; none of them commits.

use sqlx::{Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use super::parser::VerseRow;
use super::tracker::VerseCountTracker;
use super::IngestError;
use crate::features::shared::error_helpers::{check_constraint_violation, ConstraintViolation};

/// Whether an upsert created the verse or overwrote an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Insert the chapter with placeholder metadata unless it already exists.
///
/// Existing chapters are left untouched. Returns `true` if a row was created.
pub async fn ensure_chapter(
    tx: &mut Transaction<'_, Postgres>,
    chapter_id: i32,
    name: &str,
) -> Result<bool, IngestError> {
    let result = sqlx::query(
        r#"
        INSERT INTO chapters (id, name_en, name_hi, summary_en, summary_hi, verse_count, created_at, updated_at)
        VALUES ($1, $2, '', '', '', 0, NOW(), NOW())
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(chapter_id)
    .bind(name)
    .execute(&mut **tx)
    .await
    .map_err(|e| classify_write_error(e, chapter_id, 0))?;

    let created = result.rows_affected() == 1;
    if created {
        debug!(chapter_id, "Created chapter");
    }
    Ok(created)
}

/// Insert a verse by natural key, or overwrite the text fields of the existing
/// row while keeping its id.
pub async fn upsert_verse(
    tx: &mut Transaction<'_, Postgres>,
    row: &VerseRow,
) -> Result<UpsertOutcome, IngestError> {
    let inserted: bool = sqlx::query_scalar(
        r#"
        INSERT INTO verses (id, chapter_id, verse_number, sanskrit, transliteration, english, hindi, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
        ON CONFLICT (chapter_id, verse_number) DO UPDATE SET
            sanskrit = EXCLUDED.sanskrit,
            transliteration = EXCLUDED.transliteration,
            english = EXCLUDED.english,
            hindi = EXCLUDED.hindi,
            updated_at = NOW()
        RETURNING (xmax = 0) AS inserted
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(row.chapter)
    .bind(row.verse)
    .bind(&row.sanskrit)
    .bind(&row.transliteration)
    .bind(&row.english)
    .bind(&row.hindi)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| classify_write_error(e, row.chapter, row.verse))?;

    Ok(if inserted {
        UpsertOutcome::Inserted
    } else {
        UpsertOutcome::Updated
    })
}

/// Set `verse_count` for every chapter counted in this pass.
///
/// The stored count is taken from the verse rows themselves, so verses kept
/// from earlier passes but absent from this source are still counted. A
/// difference from the tracker's count is logged. Must be the last write
/// before commit.
pub async fn reconcile_verse_counts(
    tx: &mut Transaction<'_, Postgres>,
    tracker: &VerseCountTracker,
) -> Result<usize, IngestError> {
    let mut updated = 0;

    for (chapter_id, seen) in tracker.counts() {
        let stored: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE chapters
            SET verse_count = (SELECT COUNT(*) FROM verses WHERE chapter_id = $1)::INTEGER,
                updated_at = NOW()
            WHERE id = $1
            RETURNING verse_count
            "#,
        )
        .bind(chapter_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| classify_write_error(e, chapter_id, 0))?;

        if let Some(stored) = stored {
            if stored != seen {
                warn!(
                    chapter_id,
                    in_source = seen,
                    stored,
                    "Chapter has verses not present in this source"
                );
            }
            updated += 1;
        }
    }

    debug!(chapters = updated, "Reconciled verse counts");
    Ok(updated)
}

fn classify_write_error(error: sqlx::Error, chapter: i32, verse: i32) -> IngestError {
    let message = match check_constraint_violation(error) {
        ConstraintViolation::UniqueViolation => "unique constraint violated",
        ConstraintViolation::ForeignKeyViolation => "foreign key constraint violated",
        ConstraintViolation::Other(e) => return IngestError::Database(e),
    };
    IngestError::ConstraintViolation {
        chapter,
        verse,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitartha_common::VerseKey;
    use sqlx::PgPool;

    fn row(chapter: i32, verse: i32, text: &str) -> VerseRow {
        VerseRow {
            line: 2,
            chapter,
            verse,
            sanskrit: format!("S {}", text),
            transliteration: format!("T {}", text),
            english: format!("E {}", text),
            hindi: format!("H {}", text),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_ensure_chapter_is_create_or_skip(pool: PgPool) -> sqlx::Result<()> {
        sqlx::query("INSERT INTO chapters (id, name_en, summary_en) VALUES (1, 'Arjuna Vishada Yoga', 'Despair')")
            .execute(&pool)
            .await?;

        let mut tx = pool.begin().await?;
        assert!(!ensure_chapter(&mut tx, 1, "Chapter 1").await.unwrap());
        assert!(ensure_chapter(&mut tx, 2, "Chapter 2").await.unwrap());
        tx.commit().await?;

        let (name, summary): (String, String) =
            sqlx::query_as("SELECT name_en, summary_en FROM chapters WHERE id = 1")
                .fetch_one(&pool)
                .await?;
        assert_eq!(name, "Arjuna Vishada Yoga");
        assert_eq!(summary, "Despair");

        let name: String = sqlx::query_scalar("SELECT name_en FROM chapters WHERE id = 2")
            .fetch_one(&pool)
            .await?;
        assert_eq!(name, "Chapter 2");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_upsert_verse_preserves_identity(pool: PgPool) -> sqlx::Result<()> {
        let mut tx = pool.begin().await?;
        ensure_chapter(&mut tx, 2, "Chapter 2").await.unwrap();
        assert_eq!(upsert_verse(&mut tx, &row(2, 5, "old")).await.unwrap(), UpsertOutcome::Inserted);
        tx.commit().await?;

        let original_id: Uuid =
            sqlx::query_scalar("SELECT id FROM verses WHERE chapter_id = 2 AND verse_number = 5")
                .fetch_one(&pool)
                .await?;

        let mut tx = pool.begin().await?;
        assert_eq!(upsert_verse(&mut tx, &row(2, 5, "new")).await.unwrap(), UpsertOutcome::Updated);
        tx.commit().await?;

        let (id, sanskrit, hindi): (Uuid, String, String) = sqlx::query_as(
            "SELECT id, sanskrit, hindi FROM verses WHERE chapter_id = 2 AND verse_number = 5",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(id, original_id);
        assert_eq!(sanskrit, "S new");
        assert_eq!(hindi, "H new");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_upsert_without_chapter_is_constraint_violation(pool: PgPool) -> sqlx::Result<()> {
        let mut tx = pool.begin().await?;
        let err = upsert_verse(&mut tx, &row(9, 1, "orphan")).await.unwrap_err();
        assert!(matches!(
            err,
            IngestError::ConstraintViolation { chapter: 9, verse: 1, .. }
        ));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_reconcile_sets_counts(pool: PgPool) -> sqlx::Result<()> {
        let mut tracker = VerseCountTracker::new();
        let mut tx = pool.begin().await?;
        for (chapter, verse) in [(1, 1), (2, 1), (1, 2)] {
            ensure_chapter(&mut tx, chapter, "c").await.unwrap();
            upsert_verse(&mut tx, &row(chapter, verse, "x")).await.unwrap();
            tracker.increment(VerseKey::new(chapter, verse));
        }
        assert_eq!(reconcile_verse_counts(&mut tx, &tracker).await.unwrap(), 2);
        tx.commit().await?;

        let counts: Vec<(i32, i32)> = sqlx::query_as("SELECT id, verse_count FROM chapters ORDER BY id")
            .fetch_all(&pool)
            .await?;
        assert_eq!(counts, vec![(1, 2), (2, 1)]);
        Ok(())
    }
}
