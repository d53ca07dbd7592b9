//! Domain models shared by the query store, the ingestion core and the API
//!
//! Optional text columns are stored as `''` rather than NULL, so every field
//! here is a plain `String`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gitartha_common::{Language, VerseKey};

/// Chapter metadata.
///
/// `verse_count` is derived and equals the number of verses stored for the
/// chapter after every committed ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chapter {
    pub id: i32,
    pub name_en: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name_hi: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub summary_en: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub summary_hi: String,
    pub verse_count: i32,
}

impl Chapter {
    /// Placeholder display name given to chapters first seen during ingestion
    pub fn default_name(id: i32) -> String {
        format!("Chapter {}", id)
    }
}

/// A verse with its original text, transliteration and both translations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Verse {
    pub id: Uuid,
    pub chapter_id: i32,
    pub verse_number: i32,
    pub sanskrit: String,
    pub transliteration: String,
    pub english: String,
    pub hindi: String,
}

impl Verse {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter_id, self.verse_number)
    }

    /// Translation text in the given language
    pub fn translation(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Hindi => &self.hindi,
        }
    }
}

/// A chapter together with its verses ordered by verse number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterWithVerses {
    pub chapter: Chapter,
    pub verses: Vec<Verse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_serialization_omits_empty_optionals() {
        let chapter = Chapter {
            id: 1,
            name_en: Chapter::default_name(1),
            name_hi: String::new(),
            summary_en: String::new(),
            summary_hi: String::new(),
            verse_count: 47,
        };

        let json = serde_json::to_value(&chapter).unwrap();
        assert_eq!(json["name_en"], "Chapter 1");
        assert_eq!(json["verse_count"], 47);
        assert!(json.get("name_hi").is_none());
        assert!(json.get("summary_en").is_none());
    }

    #[test]
    fn test_verse_translation() {
        let verse = Verse {
            id: Uuid::new_v4(),
            chapter_id: 2,
            verse_number: 47,
            sanskrit: "S".to_string(),
            transliteration: "T".to_string(),
            english: "E".to_string(),
            hindi: "H".to_string(),
        };

        assert_eq!(verse.translation(Language::English), "E");
        assert_eq!(verse.translation(Language::Hindi), "H");
        assert_eq!(verse.key(), VerseKey::new(2, 47));
    }
}
