//! Block attributes - the configuration surface edited in the settings panel
//!
//! The host hands us raw key/value edits (from the settings panel, a query
//! string, or an attributes file). [`BlockConfiguration::from_raw`] turns them
//! into a validated configuration; nothing downstream ever sees unchecked
//! values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Attribute names as they appear on the wire
pub mod keys {
    pub const NUMBER_OF_POSTS: &str = "numberOfPosts";
    pub const DISPLAY_POST_THUMBNAIL: &str = "displayPostThumbnail";
    pub const THUMBNAIL_SIZE: &str = "thumbnailSize";
    pub const DISPLAY_POST_EXCERPT: &str = "displayPostExcerpt";
    pub const POST_CATEGORY: &str = "postCategory";
}

/// A configuration field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for `{field}`: {reason}")]
pub struct ValidationError {
    /// Wire name of the offending attribute
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Raw attribute edits as supplied by the host, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAttributes(IndexMap<String, Value>);

impl RawAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build raw attributes from string pairs (query strings, `key=value` flags)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Set an attribute, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Overlay `other` on top of these attributes; later values win
    pub fn merge(&mut self, other: &RawAttributes) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for RawAttributes {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Number of posts to list, always within `MIN..=MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumberOfPosts(u8);

impl NumberOfPosts {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: NumberOfPosts = NumberOfPosts(5);

    /// Out-of-range values are rejected, never clamped
    pub fn new(n: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&n) {
            Ok(Self(n as u8))
        } else {
            Err(ValidationError::new(
                keys::NUMBER_OF_POSTS,
                format!(
                    "must be between {} and {}, got {}",
                    Self::MIN,
                    Self::MAX,
                    n
                ),
            ))
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for NumberOfPosts {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for NumberOfPosts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered image sizes a thumbnail can be displayed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailSize {
    Thumbnail,
    #[default]
    Medium,
    Large,
}

impl ThumbnailSize {
    pub const ALL: [ThumbnailSize; 3] = [Self::Thumbnail, Self::Medium, Self::Large];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Edge length in pixels of the size's bounding box
    pub fn dimension(self) -> u32 {
        match self {
            Self::Thumbnail => 150,
            Self::Medium => 300,
            Self::Large => 1024,
        }
    }

    /// Whether images at this size are cropped to an exact square
    ///
    /// Other sizes only bound the image and keep its aspect ratio.
    pub fn is_cropped(self) -> bool {
        self == Self::Thumbnail
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ThumbnailSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thumbnail" => Ok(Self::Thumbnail),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(ValidationError::new(
                keys::THUMBNAIL_SIZE,
                format!(
                    "unknown size `{}` (expected thumbnail, medium or large)",
                    other
                ),
            )),
        }
    }
}

/// Category restriction; category id 0 on the wire means no filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(u64),
}

impl CategoryFilter {
    pub fn from_id(id: u64) -> Self {
        if id == 0 {
            Self::All
        } else {
            Self::Only(id)
        }
    }

    /// Wire representation (0 for no filter)
    pub fn id(self) -> u64 {
        match self {
            Self::All => 0,
            Self::Only(id) => id,
        }
    }

    pub fn category(self) -> Option<u64> {
        match self {
            Self::All => None,
            Self::Only(id) => Some(id),
        }
    }
}

/// Validated configuration of one block instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConfiguration {
    pub number_of_posts: NumberOfPosts,
    pub display_post_thumbnail: bool,
    pub thumbnail_size: ThumbnailSize,
    pub display_post_excerpt: bool,
    pub post_category: CategoryFilter,
}

impl Default for BlockConfiguration {
    fn default() -> Self {
        Self {
            number_of_posts: NumberOfPosts::DEFAULT,
            display_post_thumbnail: true,
            thumbnail_size: ThumbnailSize::Medium,
            display_post_excerpt: false,
            post_category: CategoryFilter::All,
        }
    }
}

impl BlockConfiguration {
    /// Validate and normalize raw attributes; missing keys keep their defaults
    pub fn from_raw(raw: &RawAttributes) -> Result<Self, ValidationError> {
        let mut config = Self::default();
        for (key, value) in raw.iter() {
            config.apply(key, value)?;
        }
        Ok(config)
    }

    /// Apply a single settings-panel edit, producing a new configuration
    pub fn with_edit(&self, key: &str, value: &Value) -> Result<Self, ValidationError> {
        let mut next = *self;
        next.apply(key, value)?;
        Ok(next)
    }

    /// Normalized attributes for the host to persist, keyed by wire name
    pub fn to_raw(&self) -> RawAttributes {
        let mut raw = RawAttributes::new();
        raw.insert(keys::NUMBER_OF_POSTS, self.number_of_posts.get() as u64);
        raw.insert(keys::DISPLAY_POST_THUMBNAIL, self.display_post_thumbnail);
        raw.insert(keys::THUMBNAIL_SIZE, self.thumbnail_size.as_str());
        raw.insert(keys::DISPLAY_POST_EXCERPT, self.display_post_excerpt);
        raw.insert(keys::POST_CATEGORY, self.post_category.id());
        raw
    }

    /// Preview line shown in the editor in place of the server render
    pub fn summary(&self) -> String {
        format!(
            "Displaying {} posts {} thumbnails.",
            self.number_of_posts,
            if self.display_post_thumbnail {
                "with"
            } else {
                "without"
            }
        )
    }

    fn apply(&mut self, key: &str, value: &Value) -> Result<(), ValidationError> {
        let defaults = Self::default();

        match key {
            keys::NUMBER_OF_POSTS => {
                self.number_of_posts = if value.is_null() {
                    defaults.number_of_posts
                } else {
                    NumberOfPosts::new(parse_integer(keys::NUMBER_OF_POSTS, value)?)?
                };
            }
            keys::DISPLAY_POST_THUMBNAIL => {
                self.display_post_thumbnail = if value.is_null() {
                    defaults.display_post_thumbnail
                } else {
                    parse_bool(keys::DISPLAY_POST_THUMBNAIL, value)?
                };
            }
            keys::THUMBNAIL_SIZE => {
                self.thumbnail_size = match value {
                    Value::Null => defaults.thumbnail_size,
                    Value::String(s) => s.parse()?,
                    other => {
                        return Err(ValidationError::new(
                            keys::THUMBNAIL_SIZE,
                            format!("expected a size name, got {}", other),
                        ))
                    }
                };
            }
            keys::DISPLAY_POST_EXCERPT => {
                self.display_post_excerpt = if value.is_null() {
                    defaults.display_post_excerpt
                } else {
                    parse_bool(keys::DISPLAY_POST_EXCERPT, value)?
                };
            }
            keys::POST_CATEGORY => {
                self.post_category = match value {
                    // "All Categories" submits an empty value
                    Value::Null => CategoryFilter::All,
                    Value::String(s) if s.trim().is_empty() => CategoryFilter::All,
                    _ => {
                        let id = parse_integer(keys::POST_CATEGORY, value)?;
                        if id < 0 {
                            return Err(ValidationError::new(
                                keys::POST_CATEGORY,
                                format!("category id cannot be negative, got {}", id),
                            ));
                        }
                        CategoryFilter::from_id(id as u64)
                    }
                };
            }
            other => {
                tracing::debug!("Ignoring unknown block attribute `{}`", other);
            }
        }

        Ok(())
    }
}

fn parse_integer(field: &'static str, value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(ValidationError::new(
                    field,
                    format!("expected an integer, got {}", n),
                )),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            ValidationError::new(field, format!("expected an integer, got \"{}\"", s))
        }),
        other => Err(ValidationError::new(
            field,
            format!("expected an integer, got {}", other),
        )),
    }
}

fn parse_bool(field: &'static str, value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => Ok(true),
            "false" | "0" | "off" => Ok(false),
            _ => Err(ValidationError::new(
                field,
                format!("expected a boolean, got \"{}\"", s),
            )),
        },
        other => Err(ValidationError::new(
            field,
            format!("expected a boolean, got {}", other),
        )),
    }
}
