//! Verse queries: natural-key lookup, translation search and random sampling.

use sqlx::{PgExecutor, PgPool};

use super::{DbError, DbResult};
use crate::models::Verse;
use gitartha_common::{Language, VerseKey};

/// Result count used when a search doesn't ask for one (or asks for <= 0).
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Upper bound on search results.
pub const MAX_SEARCH_LIMIT: i64 = 100;

const VERSE_COLUMNS: &str =
    "id, chapter_id, verse_number, sanskrit, transliteration, english, hindi";

/// Normalize a requested search limit into `1..=MAX_SEARCH_LIMIT`.
pub fn clamp_search_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(n) if n > MAX_SEARCH_LIMIT => MAX_SEARCH_LIMIT,
        Some(n) if n > 0 => n,
        _ => DEFAULT_SEARCH_LIMIT,
    }
}

/// Escape LIKE metacharacters so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) async fn list_verses_by_chapter<'e, E>(executor: E, chapter_id: i32) -> DbResult<Vec<Verse>>
where
    E: PgExecutor<'e>,
{
    let verses = sqlx::query_as::<_, Verse>(&format!(
        "SELECT {} FROM verses WHERE chapter_id = $1 ORDER BY verse_number",
        VERSE_COLUMNS
    ))
    .bind(chapter_id)
    .fetch_all(executor)
    .await?;

    Ok(verses)
}

/// Retrieves a single verse by its natural key.
///
/// # Errors
///
/// Returns `DbError::NotFound` if no verse exists at `chapter.verse`.
#[tracing::instrument(skip(pool))]
pub async fn get_verse(pool: &PgPool, chapter_id: i32, verse_number: i32) -> DbResult<Verse> {
    sqlx::query_as::<_, Verse>(&format!(
        "SELECT {} FROM verses WHERE chapter_id = $1 AND verse_number = $2",
        VERSE_COLUMNS
    ))
    .bind(chapter_id)
    .bind(verse_number)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DbError::not_found("Verse", VerseKey::new(chapter_id, verse_number)))
}

/// Case-insensitive substring search over one translation.
///
/// Results are ordered by `(chapter_id, verse_number)` and capped by
/// [`clamp_search_limit`]. The query is matched as given, surrounding
/// whitespace included; an empty query matches nothing.
#[tracing::instrument(skip(pool))]
pub async fn search_verses(
    pool: &PgPool,
    query: &str,
    language: Language,
    limit: Option<i64>,
) -> DbResult<Vec<Verse>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    // Column name comes from a closed enum, never from input.
    let column = match language {
        Language::English => "english",
        Language::Hindi => "hindi",
    };
    let pattern = format!("%{}%", escape_like(query));
    let limit = clamp_search_limit(limit);

    let verses = sqlx::query_as::<_, Verse>(&format!(
        "SELECT {} FROM verses WHERE {} ILIKE $1 ESCAPE '\\' ORDER BY chapter_id, verse_number LIMIT $2",
        VERSE_COLUMNS, column
    ))
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    tracing::debug!(results = verses.len(), limit, "Verse search complete");

    Ok(verses)
}

/// Returns one verse chosen uniformly at random.
///
/// # Errors
///
/// Returns `DbError::NotFound` when the store holds no verses.
#[tracing::instrument(skip(pool))]
pub async fn random_verse(pool: &PgPool) -> DbResult<Verse> {
    sqlx::query_as::<_, Verse>(&format!(
        "SELECT {} FROM verses ORDER BY random() LIMIT 1",
        VERSE_COLUMNS
    ))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DbError::NotFound("No verses available".to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn insert_chapter(pool: &PgPool, id: i32, verse_count: i32) -> sqlx::Result<()> {
        sqlx::query("INSERT INTO chapters (id, name_en, verse_count) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(format!("Chapter {}", id))
            .bind(verse_count)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub(crate) async fn insert_verse(
        pool: &PgPool,
        chapter_id: i32,
        verse_number: i32,
        english: &str,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO verses (id, chapter_id, verse_number, sanskrit, transliteration, english, hindi)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(chapter_id)
        .bind(verse_number)
        .bind(format!("S{}.{}", chapter_id, verse_number))
        .bind(format!("T{}.{}", chapter_id, verse_number))
        .bind(english)
        .bind(format!("हिंदी {}", english))
        .execute(pool)
        .await?;
        Ok(())
    }

    #[test]
    fn test_clamp_search_limit() {
        assert_eq!(clamp_search_limit(None), 20);
        assert_eq!(clamp_search_limit(Some(0)), 20);
        assert_eq!(clamp_search_limit(Some(-3)), 20);
        assert_eq!(clamp_search_limit(Some(1)), 1);
        assert_eq!(clamp_search_limit(Some(100)), 100);
        assert_eq!(clamp_search_limit(Some(500)), 100);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("duty"), "duty");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_verse(pool: PgPool) -> sqlx::Result<()> {
        insert_chapter(&pool, 2, 1).await?;
        insert_verse(&pool, 2, 47, "You have a right to action").await?;

        let verse = get_verse(&pool, 2, 47).await.unwrap();
        assert_eq!(verse.chapter_id, 2);
        assert_eq!(verse.verse_number, 47);
        assert_eq!(verse.english, "You have a right to action");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_verse_not_found(pool: PgPool) -> sqlx::Result<()> {
        insert_chapter(&pool, 1, 0).await?;
        let err = get_verse(&pool, 1, 3).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Verse '1.3' not found");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_search_is_case_insensitive_and_ordered(pool: PgPool) -> sqlx::Result<()> {
        insert_chapter(&pool, 1, 1).await?;
        insert_chapter(&pool, 2, 2).await?;
        insert_verse(&pool, 2, 5, "Perform your DUTY").await?;
        insert_verse(&pool, 2, 1, "duty bound").await?;
        insert_verse(&pool, 1, 9, "about duty").await?;

        let results = search_verses(&pool, "Duty", Language::English, None).await.unwrap();
        let keys: Vec<(i32, i32)> = results.iter().map(|v| (v.chapter_id, v.verse_number)).collect();
        assert_eq!(keys, vec![(1, 9), (2, 1), (2, 5)]);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_search_respects_language_and_limit(pool: PgPool) -> sqlx::Result<()> {
        insert_chapter(&pool, 1, 3).await?;
        for n in 1..=3 {
            insert_verse(&pool, 1, n, "yoga").await?;
        }

        let hindi = search_verses(&pool, "हिंदी", Language::Hindi, Some(2)).await.unwrap();
        assert_eq!(hindi.len(), 2);

        let english = search_verses(&pool, "हिंदी", Language::English, None).await.unwrap();
        assert!(english.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_search_treats_wildcards_literally(pool: PgPool) -> sqlx::Result<()> {
        insert_chapter(&pool, 1, 2).await?;
        insert_verse(&pool, 1, 1, "fully 100% devoted").await?;
        insert_verse(&pool, 1, 2, "100 paths").await?;

        let results = search_verses(&pool, "100%", Language::English, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].verse_number, 1);

        assert!(search_verses(&pool, "", Language::English, None).await.unwrap().is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_search_keeps_surrounding_whitespace(pool: PgPool) -> sqlx::Result<()> {
        insert_chapter(&pool, 1, 2).await?;
        insert_verse(&pool, 1, 1, "on the field").await?;
        insert_verse(&pool, 1, 2, "another path").await?;

        let leading = search_verses(&pool, " the", Language::English, None).await.unwrap();
        let keys: Vec<i32> = leading.iter().map(|v| v.verse_number).collect();
        assert_eq!(keys, vec![1]);

        let trailing = search_verses(&pool, "the ", Language::English, None).await.unwrap();
        let keys: Vec<i32> = trailing.iter().map(|v| v.verse_number).collect();
        assert_eq!(keys, vec![1]);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_random_verse(pool: PgPool) -> sqlx::Result<()> {
        assert!(random_verse(&pool).await.unwrap_err().is_not_found());

        insert_chapter(&pool, 1, 1).await?;
        insert_verse(&pool, 1, 1, "only").await?;
        let verse = random_verse(&pool).await.unwrap();
        assert_eq!(verse.key(), VerseKey::new(1, 1));
        Ok(())
    }
}
