//! Common types used across Gitartha

use serde::{Deserialize, Serialize};

use crate::error::{GitarthaError, Result};

/// Translation language a verse can be searched in.
///
/// English is the primary language of the corpus, Hindi the secondary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    /// Short language code used on the wire ("en" / "hi")
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = GitarthaError;

    /// Only the exact lowercase codes are accepted.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::English),
            "hi" => Ok(Language::Hindi),
            other => Err(GitarthaError::InvalidLanguage(other.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Natural key of a verse: (chapter number, verse number within the chapter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerseKey {
    pub chapter: i32,
    pub verse: i32,
}

impl VerseKey {
    pub fn new(chapter: i32, verse: i32) -> Self {
        Self { chapter, verse }
    }
}

impl std::fmt::Display for VerseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.chapter, self.verse)
    }
}

/// Parse a strictly positive 32-bit integer, as used for chapter and verse numbers.
pub fn parse_positive(field: &'static str, value: &str) -> Result<i32> {
    match value.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(GitarthaError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}
