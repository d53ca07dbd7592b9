//! Shared utilities for feature modules
//!
//! - **validation**: path and query parameter parsing
//! - **error_helpers**: database constraint-violation classification

pub mod error_helpers;
pub mod validation;

pub use validation::{
    parse_language_param, parse_limit_param, parse_number_param, validate_search_text,
    ParamValidationError,
};
