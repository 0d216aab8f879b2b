//! Content store - the system of record the block reads posts from
//!
//! The render path only ever sees a [`ContentStore`]; hosts plug in the
//! directory-backed store, tests plug in [`MemoryStore`].

mod directory;
mod memory;

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::content::{Category, Post, PostStatus};

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

/// Failure to reach the content store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Content store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    pub fn unavailable(reason: impl fmt::Display) -> Self {
        Self::Unavailable {
            reason: reason.to_string(),
        }
    }
}

/// A bounded post query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    /// Maximum number of posts returned
    pub limit: usize,
    /// Only posts in this state
    pub status: PostStatus,
    /// Only posts in this category, if set
    pub category: Option<u64>,
}

impl PostQuery {
    /// Query for the newest published posts
    pub fn published(limit: usize) -> Self {
        Self {
            limit,
            status: PostStatus::Publish,
            category: None,
        }
    }

    pub fn in_category(mut self, category: Option<u64>) -> Self {
        self.category = category;
        self
    }

    pub fn matches(&self, post: &Post) -> bool {
        post.status == self.status
            && self
                .category
                .map_or(true, |category| post.in_category(category))
    }

    /// Filter, order newest first (ties broken by higher id), and cap at `limit`
    pub fn apply<'a, I>(&self, posts: I) -> Vec<Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut matched: Vec<Post> = posts
            .into_iter()
            .filter(|post| self.matches(post))
            .cloned()
            .collect();

        matched.sort_by_key(|post| Reverse((post.date, post.id)));
        matched.truncate(self.limit);
        matched
    }
}

/// Read-only access to posts and categories
pub trait ContentStore {
    /// Run a query; results are ordered newest first
    fn query(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError>;

    /// All categories, sorted by name
    fn categories(&self) -> Result<Vec<Category>, StoreError>;
}

impl<S: ContentStore + ?Sized> ContentStore for Arc<S> {
    fn query(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        (**self).query(query)
    }

    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).categories()
    }
}
