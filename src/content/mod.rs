//! Content module - posts, categories, and how they are read from disk

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, LoadedContent};
pub use markdown::MarkdownRenderer;
pub use post::{Category, Post, PostStatus, Thumbnail};
