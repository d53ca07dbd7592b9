pub mod search_verses;

pub use search_verses::{SearchVersesError, SearchVersesQuery, SearchVersesResponse};
