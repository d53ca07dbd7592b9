pub mod get;
pub mod random;

pub use get::{GetVerseError, GetVerseQuery};
pub use random::{RandomVerseError, RandomVerseQuery};
