//! Post and Category models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::config::ThumbnailSize;

/// Publication state of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Publish,
    Draft,
    Future,
    Private,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Draft => "draft",
            Self::Future => "future",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "publish" | "published" => Ok(Self::Publish),
            "draft" => Ok(Self::Draft),
            "future" | "scheduled" => Ok(Self::Future),
            "private" => Ok(Self::Private),
            other => anyhow::bail!("Unknown post status: {}", other),
        }
    }
}

/// A featured image with optional pre-sized variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Original upload
    pub url: String,
    /// Resized variants keyed by size
    #[serde(default)]
    pub sizes: HashMap<ThumbnailSize, String>,
}

impl Thumbnail {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sizes: HashMap::new(),
        }
    }

    /// Image source for a size, falling back to the original
    pub fn src(&self, size: ThumbnailSize) -> &str {
        self.sizes.get(&size).map(String::as_str).unwrap_or(&self.url)
    }
}

/// A blog post as served by a content store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Store-wide unique id
    pub id: u64,

    /// Post title
    pub title: String,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Publication state
    pub status: PostStatus,

    /// Full permalink URL
    pub permalink: String,

    /// Featured image
    pub thumbnail: Option<Thumbnail>,

    /// Plain-text summary
    pub excerpt: Option<String>,

    /// Category names
    pub categories: Vec<String>,

    /// Category ids, parallel to `categories`
    pub category_ids: Vec<u64>,

    /// Source file path (relative), empty for posts not backed by a file
    pub source: String,
}

impl Post {
    /// Create a new published post with minimal required fields
    pub fn new(id: u64, title: impl Into<String>, date: DateTime<Local>) -> Self {
        let title = title.into();
        let slug = slug::slugify(&title);
        Self {
            id,
            title,
            slug,
            date,
            status: PostStatus::Publish,
            permalink: String::new(),
            thumbnail: None,
            excerpt: None,
            categories: Vec::new(),
            category_ids: Vec::new(),
            source: String::new(),
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Publish
    }

    pub fn in_category(&self, category_id: u64) -> bool {
        self.category_ids.contains(&category_id)
    }
}

/// A category with its post count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub count: usize,
}

impl Category {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            slug: slug::slugify(name),
            count: 0,
        }
    }
}
