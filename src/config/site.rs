//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::RawAttributes;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // URL
    pub url: String,
    pub root: String,
    pub permalink: String,

    // Directory
    pub source_dir: String,

    // Writing
    /// Whether posts dated in the future count as published
    pub future: bool,
    /// Words kept in an automatic excerpt
    pub excerpt_length: usize,
    /// Appended to an automatic excerpt that was cut short
    pub excerpt_more: String,

    // Category
    /// Category name -> numeric id used by the block's category filter
    #[serde(default)]
    pub category_ids: HashMap<String, u64>,

    // Block
    /// Default attributes for block renders started from this site
    #[serde(default)]
    pub block: RawAttributes,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            permalink: ":year/:month/:day/:title/".to_string(),

            source_dir: "source".to_string(),

            future: true,
            excerpt_length: 55,
            excerpt_more: " [\u{2026}]".to_string(),

            category_ids: HashMap::new(),

            block: RawAttributes::new(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }
}
