//! blog-posts-block: a configurable "recent posts" listing block
//!
//! The block is a validated [`config::BlockConfiguration`] plus a render
//! function ([`block::render`]) that queries an injected
//! [`store::ContentStore`] and returns an HTML fragment. The [`Site`] type
//! wires both to a directory of Markdown posts for the CLI and preview server.

pub mod block;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

use block::BlockError;
use config::RawAttributes;
use store::DirectoryStore;

/// A site whose posts feed the block
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory (holds `_posts`)
    pub source_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
        })
    }

    /// Content store reading this site's posts
    pub fn store(&self) -> DirectoryStore {
        DirectoryStore::new(self.config.clone(), &self.source_dir)
    }

    /// Site-level default attributes with `overrides` applied on top
    pub fn attributes(&self, overrides: &RawAttributes) -> RawAttributes {
        let mut raw = self.config.block.clone();
        raw.merge(overrides);
        raw
    }

    /// Render the block for this site
    pub fn render(&self, overrides: &RawAttributes) -> Result<String, BlockError> {
        block::render_attributes(&self.attributes(overrides), &self.store())
    }
}
