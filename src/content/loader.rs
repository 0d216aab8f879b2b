//! Content loader - loads posts from the source directory

use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Category, FrontMatter, MarkdownRenderer, Post, PostStatus, Thumbnail};
use crate::config::{SiteConfig, ThumbnailSize};
use crate::helpers::{encode_path, full_url_for, url_for};

lazy_static! {
    static ref PERMALINK_TOKEN: Regex = Regex::new(r":([a-z_]+)").expect("valid regex");
}

/// Everything read from the posts directory in one pass
#[derive(Debug, Clone, Default)]
pub struct LoadedContent {
    /// Posts of every status, newest first
    pub posts: Vec<Post>,
    /// Categories sorted by name, counting published posts
    pub categories: Vec<Category>,
}

/// A post file parsed but not yet assigned ids
struct ParsedPost {
    path: PathBuf,
    front_matter: FrontMatter,
    body: String,
    modified: Option<DateTime<Local>>,
}

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    config: &'a SiteConfig,
    source_dir: &'a Path,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(config: &'a SiteConfig, source_dir: &'a Path) -> Self {
        Self {
            config,
            source_dir,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all posts from source/_posts
    ///
    /// A missing source directory is an error; a missing `_posts` directory
    /// is simply an empty site.
    pub fn load(&self) -> Result<LoadedContent> {
        if !self.source_dir.is_dir() {
            bail!("Source directory not found: {:?}", self.source_dir);
        }

        let posts_dir = self.source_dir.join("_posts");
        if !posts_dir.exists() {
            tracing::debug!("No posts directory at {:?}", posts_dir);
            return Ok(LoadedContent::default());
        }

        let mut parsed = Vec::new();
        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match Self::parse_file(path) {
                    Ok(post) => parsed.push(post),
                    Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
                }
            }
        }

        let category_ids = self.assign_category_ids(&parsed);
        let post_ids = assign_post_ids(&parsed);

        let mut posts: Vec<Post> = parsed
            .into_iter()
            .zip(post_ids)
            .filter_map(|(parsed, id)| Some(self.build_post(parsed, id?, &category_ids)))
            .collect();

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        let categories = collect_categories(&posts, &category_ids);
        tracing::debug!(
            "Loaded {} posts in {} categories from {:?}",
            posts.len(),
            categories.len(),
            posts_dir
        );

        Ok(LoadedContent { posts, categories })
    }

    fn parse_file(path: &Path) -> Result<ParsedPost> {
        let content = fs::read_to_string(path)?;
        let (front_matter, body) = FrontMatter::parse(&content)?;
        let body = body.to_string();

        let modified = fs::metadata(path)?
            .modified()
            .ok()
            .map(DateTime::<Local>::from);

        Ok(ParsedPost {
            path: path.to_path_buf(),
            front_matter,
            body,
            modified,
        })
    }

    /// Configured ids first; unmapped names continue after the highest one
    fn assign_category_ids(&self, parsed: &[ParsedPost]) -> HashMap<String, u64> {
        // 0 is the "All Categories" filter value
        let mut ids: HashMap<String, u64> = self
            .config
            .category_ids
            .iter()
            .filter(|(name, id)| {
                if **id == 0 {
                    tracing::warn!("Category id 0 is reserved, ignoring mapping for {}", name);
                }
                **id != 0
            })
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        let mut next = ids.values().copied().max().unwrap_or(0).checked_add(1);

        let unmapped: BTreeSet<&String> = parsed
            .iter()
            .flat_map(|p| p.front_matter.categories.iter())
            .filter(|name| !ids.contains_key(*name))
            .collect();

        for name in unmapped {
            let Some(id) = next else {
                tracing::warn!("No category id left for {}, leaving it unmapped", name);
                continue;
            };
            ids.insert(name.clone(), id);
            next = id.checked_add(1);
        }

        ids
    }

    fn build_post(
        &self,
        parsed: ParsedPost,
        id: u64,
        category_ids: &HashMap<String, u64>,
    ) -> Post {
        let ParsedPost {
            path,
            front_matter: fm,
            body,
            modified,
        } = parsed;

        let date = fm
            .parse_date()
            .or(modified)
            .unwrap_or_else(Local::now);

        let file_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let title = fm.title.clone().unwrap_or_else(|| file_stem.clone());
        let slug = fm
            .slug
            .clone()
            .unwrap_or_else(|| slug::slugify(&file_stem));

        let source = path
            .strip_prefix(self.source_dir)
            .unwrap_or(&path)
            .to_string_lossy()
            .to_string();

        let status = self.resolve_status(&fm, &date, &source);

        let excerpt = match fm.excerpt.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            _ => self.renderer.excerpt(
                &body,
                self.config.excerpt_length,
                &self.config.excerpt_more,
            ),
        };

        let thumbnail = self.build_thumbnail(&fm);

        let category_ids_for_post = fm
            .categories
            .iter()
            .filter_map(|name| category_ids.get(name).copied())
            .collect();

        let mut post = Post::new(id, title, date);
        post.permalink = self.generate_permalink(id, &date, &slug, &fm.categories);
        post.slug = slug;
        post.status = status;
        post.thumbnail = thumbnail;
        post.excerpt = excerpt;
        post.categories = fm.categories;
        post.category_ids = category_ids_for_post;
        post.source = source;
        post
    }

    fn resolve_status(
        &self,
        fm: &FrontMatter,
        date: &DateTime<Local>,
        source: &str,
    ) -> PostStatus {
        if let Some(status) = fm.status.as_deref() {
            return status.parse().unwrap_or_else(|e| {
                tracing::warn!("{} in {}, treating as draft", e, source);
                PostStatus::Draft
            });
        }

        if !fm.published {
            PostStatus::Draft
        } else if !self.config.future && *date > Local::now() {
            PostStatus::Future
        } else {
            PostStatus::Publish
        }
    }

    fn build_thumbnail(&self, fm: &FrontMatter) -> Option<Thumbnail> {
        let resolve = |src: &str| url_for(self.config, &encode_path(src.trim()));

        let original = fm.thumbnail.as_deref().or_else(|| {
            [ThumbnailSize::Large, ThumbnailSize::Medium, ThumbnailSize::Thumbnail]
                .iter()
                .find_map(|size| fm.thumbnails.get(size).map(String::as_str))
        })?;

        let mut thumbnail = Thumbnail::new(resolve(original));
        for (size, src) in &fm.thumbnails {
            thumbnail.sizes.insert(*size, resolve(src));
        }
        Some(thumbnail)
    }

    /// Generate permalink based on config pattern
    fn generate_permalink(
        &self,
        id: u64,
        date: &DateTime<Local>,
        slug: &str,
        categories: &[String],
    ) -> String {
        let path = PERMALINK_TOKEN.replace_all(&self.config.permalink, |caps: &Captures| {
            match &caps[1] {
                "year" => date.format("%Y").to_string(),
                "month" => date.format("%m").to_string(),
                "day" => date.format("%d").to_string(),
                "i_month" => date.format("%-m").to_string(),
                "i_day" => date.format("%-d").to_string(),
                "hour" => date.format("%H").to_string(),
                "minute" => date.format("%M").to_string(),
                "second" => date.format("%S").to_string(),
                "title" | "name" | "post_name" => slug.to_string(),
                "id" => id.to_string(),
                "category" => categories
                    .first()
                    .map(|c| slug::slugify(c))
                    .unwrap_or_else(|| "uncategorized".to_string()),
                _ => caps[0].to_string(),
            }
        });

        full_url_for(self.config, &encode_path(&path))
    }
}

/// Explicit ids are kept; the rest count up from the highest explicit id
///
/// Posts left without an id once the id space is exhausted get `None`.
fn assign_post_ids(parsed: &[ParsedPost]) -> Vec<Option<u64>> {
    let explicit: Vec<Option<u64>> = parsed
        .iter()
        .map(|post| match post.front_matter.id {
            Some(0) => {
                tracing::warn!("Post id 0 is reserved in {:?}, assigning a new one", post.path);
                None
            }
            id => id,
        })
        .collect();

    let mut taken: HashSet<u64> = HashSet::new();
    for (post, id) in parsed.iter().zip(&explicit) {
        if let Some(id) = id {
            if !taken.insert(*id) {
                tracing::warn!("Duplicate post id {} in {:?}", id, post.path);
            }
        }
    }

    let mut next = taken.iter().copied().max().unwrap_or(0).checked_add(1);
    parsed
        .iter()
        .zip(explicit)
        .map(|(post, id)| {
            if id.is_some() {
                return id;
            }
            match next {
                Some(id) => {
                    next = id.checked_add(1);
                    Some(id)
                }
                None => {
                    tracing::warn!("No post id left for {:?}, skipping it", post.path);
                    None
                }
            }
        })
        .collect()
}

fn collect_categories(posts: &[Post], category_ids: &HashMap<String, u64>) -> Vec<Category> {
    let used: BTreeSet<&String> = posts.iter().flat_map(|p| p.categories.iter()).collect();

    let mut categories: Vec<Category> = used
        .into_iter()
        .filter_map(|name| {
            let id = *category_ids.get(name)?;
            let mut category = Category::new(id, name);
            category.count = posts
                .iter()
                .filter(|p| p.is_published() && p.in_category(id))
                .count();
            Some(category)
        })
        .collect();

    categories.sort_by(|a, b| a.name.cmp(&b.name));
    categories
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
