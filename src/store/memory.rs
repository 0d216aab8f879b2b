//! In-memory content store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{ContentStore, PostQuery, StoreError};
use crate::content::{Category, Post};

/// Store holding a fixed snapshot of posts
///
/// Can be taken offline to exercise the unavailable-store path.
#[derive(Debug)]
pub struct MemoryStore {
    posts: Vec<Post>,
    categories: Vec<Category>,
    online: AtomicBool,
}

impl MemoryStore {
    /// Create a store; categories are derived from the posts
    pub fn new(posts: Vec<Post>) -> Self {
        let mut names: BTreeMap<u64, String> = BTreeMap::new();
        for post in &posts {
            for (i, id) in post.category_ids.iter().enumerate() {
                let name = post
                    .categories
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Category {}", id));
                names.entry(*id).or_insert(name);
            }
        }

        let categories = names
            .iter()
            .map(|(id, name)| Category::new(*id, name))
            .collect();

        Self::with_categories(posts, categories)
    }

    /// Create a store with an explicit category list
    pub fn with_categories(posts: Vec<Post>, categories: Vec<Category>) -> Self {
        Self {
            posts,
            categories,
            online: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.online.store(available, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable("in-memory store is offline"))
        }
    }
}

impl ContentStore for MemoryStore {
    fn query(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        self.ensure_online()?;
        Ok(query.apply(&self.posts))
    }

    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.ensure_online()?;

        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .map(|category| {
                let mut category = category.clone();
                category.count = self
                    .posts
                    .iter()
                    .filter(|post| post.is_published() && post.in_category(category.id))
                    .count();
                category
            })
            .collect();

        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn post(id: u64, category: (u64, &str)) -> Post {
        let mut post = Post::new(id, format!("Post {}", id), Local::now());
        post.categories = vec![category.1.to_string()];
        post.category_ids = vec![category.0];
        post
    }

    #[test]
    fn test_categories_derived_with_counts() {
        let store = MemoryStore::new(vec![
            post(1, (3, "Rust")),
            post(2, (3, "Rust")),
            post(3, (1, "Travel")),
        ]);

        let categories = store.categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Rust");
        assert_eq!(categories[0].count, 2);
        assert_eq!(categories[1].id, 1);
    }

    #[test]
    fn test_offline_store_is_unavailable() {
        let store = MemoryStore::new(vec![post(1, (1, "Rust"))]);
        store.set_available(false);

        assert!(matches!(
            store.query(&PostQuery::published(5)),
            Err(StoreError::Unavailable { .. })
        ));
        assert!(store.categories().is_err());

        store.set_available(true);
        assert_eq!(store.query(&PostQuery::published(5)).unwrap().len(), 1);
    }
}
