//! Item search - token index and multi-word substring queries.

mod index;
mod tokenize;

pub use index::SearchIndex;
pub use tokenize::tokenize;
