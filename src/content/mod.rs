//! Site content module
//!
//! Blog article lookup and slug handling.

pub mod articles;

pub use articles::{slug_to_title, ArticleResolver, ResolvedArticle, NOT_FOUND_TITLE};
