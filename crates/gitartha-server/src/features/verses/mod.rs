pub mod queries;
pub mod routes;

pub use queries::{GetVerseError, GetVerseQuery, RandomVerseError, RandomVerseQuery};

pub use routes::random_routes;
