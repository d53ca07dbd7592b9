pub mod get;
pub mod list;
pub mod list_verses;

pub use get::{GetChapterError, GetChapterQuery, GetChapterResponse};
pub use list::{ListChaptersError, ListChaptersQuery, ListChaptersResponse};
pub use list_verses::{ListChapterVersesError, ListChapterVersesQuery, ListChapterVersesResponse};
