pub mod queries;
pub mod routes;

pub use queries::{SearchVersesError, SearchVersesQuery, SearchVersesResponse};

pub use routes::search_routes;
