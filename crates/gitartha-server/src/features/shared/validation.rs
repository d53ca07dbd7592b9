//! Shared validation for path and query parameters
//!
//! # Examples
//!
//! ```rust,ignore
//! use gitartha_server::features::shared::validation::{parse_number_param, validate_search_text};
//!
//! let chapter = parse_number_param("chapter", "2")?;
//! let needle = validate_search_text(Some("karma"))?;
//! ```

use gitartha_common::types::parse_positive;
use gitartha_common::Language;
use thiserror::Error;

/// Shortest accepted search query, in characters
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;

/// Request parameter errors, reported to clients as 400
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamValidationError {
    #[error("invalid {0} number")]
    InvalidNumber(&'static str),

    #[error("query must be at least {0} characters")]
    QueryTooShort(usize),

    #[error("lang must be 'en' or 'hi'")]
    InvalidLanguage,

    #[error("limit must be an integer")]
    InvalidLimit,
}

/// Parse a chapter or verse number taken from the URL path
pub fn parse_number_param(field: &'static str, value: &str) -> Result<i32, ParamValidationError> {
    parse_positive(field, value).map_err(|_| ParamValidationError::InvalidNumber(field))
}

/// Require a search query of at least [`MIN_SEARCH_QUERY_CHARS`] characters
pub fn validate_search_text(query: Option<&str>) -> Result<&str, ParamValidationError> {
    let query = query.unwrap_or_default();
    if query.chars().count() < MIN_SEARCH_QUERY_CHARS {
        return Err(ParamValidationError::QueryTooShort(MIN_SEARCH_QUERY_CHARS));
    }
    Ok(query)
}

/// Parse the `lang` parameter; absent means English
pub fn parse_language_param(lang: Option<&str>) -> Result<Language, ParamValidationError> {
    match lang {
        None => Ok(Language::default()),
        Some(code) => code.parse().map_err(|_| ParamValidationError::InvalidLanguage),
    }
}

/// Parse the `limit` parameter as an integer; range clamping is left to the store
pub fn parse_limit_param(limit: Option<&str>) -> Result<Option<i64>, ParamValidationError> {
    limit
        .map(|raw| raw.parse::<i64>().map_err(|_| ParamValidationError::InvalidLimit))
        .transpose()
}
