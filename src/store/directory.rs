//! Content store backed by a directory of Markdown posts

use std::path::PathBuf;

use super::{ContentStore, PostQuery, StoreError};
use crate::config::SiteConfig;
use crate::content::{Category, ContentLoader, LoadedContent, Post};

/// Reads `<source_dir>/_posts` on every query, so each render sees a
/// fresh snapshot of the files
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    config: SiteConfig,
    source_dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(config: SiteConfig, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            source_dir: source_dir.into(),
        }
    }

    /// Load every post regardless of status
    pub fn load(&self) -> Result<LoadedContent, StoreError> {
        ContentLoader::new(&self.config, &self.source_dir)
            .load()
            .map_err(|e| {
                tracing::error!("Failed to read posts from {:?}: {:#}", self.source_dir, e);
                StoreError::unavailable(format!("{:#}", e))
            })
    }
}

impl ContentStore for DirectoryStore {
    fn query(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        let content = self.load()?;
        Ok(query.apply(&content.posts))
    }

    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.load()?.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with_posts(posts: &[(&str, &str)]) -> (TempDir, DirectoryStore) {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            fs::write(posts_dir.join(name), content).unwrap();
        }
        let store = DirectoryStore::new(SiteConfig::default(), dir.path());
        (dir, store)
    }

    #[test]
    fn test_query_returns_published_only() {
        let (_dir, store) = store_with_posts(&[
            ("a.md", "---\ntitle: A\ndate: 2024-01-01\n---\nA"),
            ("b.md", "---\ntitle: B\ndate: 2024-01-02\nstatus: draft\n---\nB"),
            ("c.md", "---\ntitle: C\ndate: 2024-01-03\n---\nC"),
        ]);

        let posts = store.query(&PostQuery::published(10)).unwrap();
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[test]
    fn test_category_filter() {
        let (_dir, store) = store_with_posts(&[
            ("a.md", "---\ntitle: A\ncategories: Rust\n---\nA"),
            ("b.md", "---\ntitle: B\ncategories: Travel\n---\nB"),
        ]);

        let categories = store.categories().unwrap();
        let travel = categories.iter().find(|c| c.name == "Travel").unwrap();

        let posts = store
            .query(&PostQuery::published(10).in_category(Some(travel.id)))
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "B");
    }

    #[test]
    fn test_missing_source_dir_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(SiteConfig::default(), dir.path().join("gone"));

        assert!(matches!(
            store.query(&PostQuery::published(5)),
            Err(StoreError::Unavailable { .. })
        ));
    }
}
