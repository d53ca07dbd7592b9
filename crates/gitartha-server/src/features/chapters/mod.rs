pub mod queries;
pub mod routes;

pub use queries::{
    GetChapterError, GetChapterQuery, GetChapterResponse, ListChapterVersesError,
    ListChapterVersesQuery, ListChapterVersesResponse, ListChaptersError, ListChaptersQuery,
    ListChaptersResponse,
};

pub use routes::chapters_routes;
