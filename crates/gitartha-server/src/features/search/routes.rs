//! Search API routes
//!
//! - `GET /api/v1/search?query=karma&lang=en&limit=20`

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;

use super::queries::{SearchVersesError, SearchVersesQuery, SearchVersesResponse};
use crate::error::AppError;
use crate::features::shared::{
    parse_language_param, parse_limit_param, validate_search_text, ParamValidationError,
};

pub fn search_routes() -> Router<PgPool> {
    Router::new().route("/", get(search_verses))
}

/// Raw query string; parsed by hand so bad values get the API's own 400 messages
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub lang: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    fn into_query(self) -> Result<SearchVersesQuery, ParamValidationError> {
        let query = validate_search_text(self.query.as_deref())?.to_string();
        let lang = parse_language_param(self.lang.as_deref())?;
        let limit = parse_limit_param(self.limit.as_deref())?;
        Ok(SearchVersesQuery { query, lang, limit })
    }
}

/// Search verse translations
///
/// # Response
///
/// - `200 OK` - `{"results": [...]}`
/// - `400 Bad Request` - query shorter than 2 characters, unknown `lang`, or
///   non-integer `limit`
#[tracing::instrument(skip(pool, params))]
async fn search_verses(
    State(pool): State<PgPool>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchVersesResponse>, SearchApiError> {
    let query = params.into_query()?;
    let response = super::queries::search_verses::handle(pool, query).await?;

    tracing::debug!(count = response.results.len(), "Search completed");

    Ok(Json(response))
}

#[derive(Debug)]
enum SearchApiError {
    Params(ParamValidationError),
    Search(SearchVersesError),
}

impl From<ParamValidationError> for SearchApiError {
    fn from(err: ParamValidationError) -> Self {
        Self::Params(err)
    }
}

impl From<SearchVersesError> for SearchApiError {
    fn from(err: SearchVersesError) -> Self {
        Self::Search(err)
    }
}

impl IntoResponse for SearchApiError {
    fn into_response(self) -> Response {
        let error = match self {
            SearchApiError::Params(e) | SearchApiError::Search(SearchVersesError::Validation(e)) => {
                AppError::from(e)
            },
            SearchApiError::Search(SearchVersesError::Database(e)) => AppError::Database(e),
        };
        error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitartha_common::Language;

    #[test]
    fn test_params_defaults() {
        let params = SearchParams {
            query: Some("karma".to_string()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.lang, Language::English);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_params_errors() {
        let short = SearchParams {
            query: Some("k".to_string()),
            ..Default::default()
        };
        assert_eq!(short.into_query().unwrap_err(), ParamValidationError::QueryTooShort(2));

        let bad_limit = SearchParams {
            query: Some("karma".to_string()),
            limit: Some("many".to_string()),
            ..Default::default()
        };
        assert_eq!(bad_limit.into_query().unwrap_err(), ParamValidationError::InvalidLimit);
    }
}
