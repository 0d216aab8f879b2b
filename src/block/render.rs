//! Server-side render of the recent posts listing

use super::BlockError;
use crate::config::{BlockConfiguration, RawAttributes, ThumbnailSize};
use crate::content::Post;
use crate::helpers::{html_escape, image_tag, link_to};
use crate::store::{ContentStore, PostQuery};

/// Class on the outer container
pub const CONTAINER_CLASS: &str = "blog-posts-block";

const ITEM_STYLE: &str = "overflow: hidden; margin-bottom: 20px;";
const THUMBNAIL_STYLE: &str = "float: left; margin-right: 20px;";

/// Stand-in for posts without a featured image
const PLACEHOLDER: &str = r#"<div class="blog-posts-block-placeholder" style="width: 150px; height: 150px; background-color: gray; float: left; margin-right: 20px;"></div>"#;

const UNAVAILABLE_NOTICE: &str =
    r#"<p class="blog-posts-block-notice">Recent posts are temporarily unavailable.</p>"#;

/// Query issued for a configuration
pub fn build_query(config: &BlockConfiguration) -> PostQuery {
    PostQuery::published(config.number_of_posts.get())
        .in_category(config.post_category.category())
}

/// Render the listing for a validated configuration
///
/// The store decides ordering; at most `numberOfPosts` items are emitted
/// even if the store returns more. An empty result is an empty container,
/// not an error.
pub fn render<S>(config: &BlockConfiguration, store: &S) -> Result<String, BlockError>
where
    S: ContentStore + ?Sized,
{
    let query = build_query(config);
    tracing::debug!(
        "Querying {} {} posts (category: {:?})",
        query.limit,
        query.status,
        query.category
    );

    let posts = store.query(&query)?;
    tracing::debug!("Rendering {} posts", posts.len().min(query.limit));

    let items: String = posts
        .iter()
        .take(query.limit)
        .map(|post| render_item(config, post))
        .collect();

    Ok(container(&items))
}

/// Validate raw attributes, then render
pub fn render_attributes<S>(raw: &RawAttributes, store: &S) -> Result<String, BlockError>
where
    S: ContentStore + ?Sized,
{
    let config = BlockConfiguration::from_raw(raw)?;
    render(&config, store)
}

/// Render, degrading to an empty listing plus a notice if the store is down
pub fn render_or_notice<S>(config: &BlockConfiguration, store: &S) -> String
where
    S: ContentStore + ?Sized,
{
    match render(config, store) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Recent posts block could not be rendered: {}", e);
            format!("{}{}", empty_listing(), UNAVAILABLE_NOTICE)
        }
    }
}

/// The container with no items
pub fn empty_listing() -> String {
    container("")
}

fn container(items: &str) -> String {
    format!(r#"<div class="{}">{}</div>"#, CONTAINER_CLASS, items)
}

fn render_item(config: &BlockConfiguration, post: &Post) -> String {
    let thumbnail = if config.display_post_thumbnail {
        render_thumbnail(post, config.thumbnail_size)
    } else {
        String::new()
    };

    let title = format!(
        r#"<h4 class="blog-posts-block-title">{}</h4>"#,
        link_to(&post.permalink, &post.title)
    );

    let excerpt = if config.display_post_excerpt {
        format!(
            r#"<p class="blog-posts-block-excerpt">{}</p>"#,
            html_escape(post.excerpt.as_deref().unwrap_or_default())
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="blog-posts-block-item" style="{}">{}<div class="post-content">{}{}</div></div>"#,
        ITEM_STYLE, thumbnail, title, excerpt
    )
}

fn render_thumbnail(post: &Post, size: ThumbnailSize) -> String {
    let Some(thumbnail) = &post.thumbnail else {
        return PLACEHOLDER.to_string();
    };

    let dimension = size.dimension().to_string();
    let class = format!("blog-posts-block-thumbnail size-{}", size);

    if size.is_cropped() {
        return image_tag(
            thumbnail.src(size),
            "",
            &[
                ("width", dimension.as_str()),
                ("height", dimension.as_str()),
                ("class", class.as_str()),
                ("style", THUMBNAIL_STYLE),
                ("loading", "lazy"),
            ],
        );
    }

    let style = format!("{} max-width: {}px; height: auto;", THUMBNAIL_STYLE, dimension);
    image_tag(
        thumbnail.src(size),
        "",
        &[
            ("class", class.as_str()),
            ("style", style.as_str()),
            ("loading", "lazy"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{keys, CategoryFilter};
    use crate::content::{PostStatus, Thumbnail};
    use crate::store::MemoryStore;
    use chrono::{Duration, Local};
    use serde_json::json;

    const ITEM: &str = r#"class="blog-posts-block-item""#;

    fn post(id: u64, days_ago: i64) -> Post {
        let mut post = Post::new(
            id,
            format!("Post {}", id),
            Local::now() - Duration::days(days_ago),
        );
        post.permalink = format!("https://example.com/post-{}/", id);
        post.excerpt = Some(format!("Summary of post {}", id));
        post
    }

    fn five_posts() -> Vec<Post> {
        (1..=5).map(|id| post(id, 10 - id as i64)).collect()
    }

    fn config(raw: serde_json::Value) -> BlockConfiguration {
        BlockConfiguration::from_raw(&serde_json::from_value(raw).unwrap()).unwrap()
    }

    #[test]
    fn test_build_query() {
        let query = build_query(&config(json!({ "numberOfPosts": 4, "postCategory": 9 })));
        assert_eq!(query.limit, 4);
        assert_eq!(query.status, PostStatus::Publish);
        assert_eq!(query.category, Some(9));

        let query = build_query(&BlockConfiguration::default());
        assert_eq!(query.category, None);
    }

    #[test]
    fn test_item_count_never_exceeds_limit() {
        let posts: Vec<Post> = (1..=12).map(|id| post(id, id as i64)).collect();
        let store = MemoryStore::new(posts);

        for n in 1..=10 {
            let html = render(&config(json!({ "numberOfPosts": n })), &store).unwrap();
            assert_eq!(html.matches(ITEM).count(), n);
        }
    }

    #[test]
    fn test_example_three_large_with_excerpts() {
        let mut posts = five_posts();
        let mut thumb = Thumbnail::new("/images/cover.jpg");
        thumb
            .sizes
            .insert(ThumbnailSize::Large, "/images/cover-1024x1024.jpg".into());
        posts[4].thumbnail = Some(thumb);
        let store = MemoryStore::new(posts);

        let html = render(
            &config(json!({
                "numberOfPosts": 3,
                "displayPostThumbnail": true,
                "thumbnailSize": "large",
                "displayPostExcerpt": true,
                "postCategory": 0
            })),
            &store,
        )
        .unwrap();

        assert_eq!(html.matches(ITEM).count(), 3);
        // Newest three are 5, 4, 3 in that order
        let p5 = html.find("Post 5").unwrap();
        let p4 = html.find("Post 4").unwrap();
        let p3 = html.find("Post 3").unwrap();
        assert!(p5 < p4 && p4 < p3);
        assert!(!html.contains("Post 2"));

        assert!(html.contains(r#"src="/images/cover-1024x1024.jpg""#));
        assert!(html.contains("max-width: 1024px; height: auto;"));
        assert!(html.contains("size-large"));
        assert_eq!(html.matches("blog-posts-block-placeholder").count(), 2);
        assert_eq!(html.matches("blog-posts-block-excerpt").count(), 3);
    }

    #[test]
    fn test_thumbnail_dimensions_per_size() {
        let mut p = post(1, 0);
        p.thumbnail = Some(Thumbnail::new("/wide-1600x400.jpg"));
        let store = MemoryStore::new(vec![p]);

        for (size, max_width) in [("medium", "300"), ("large", "1024")] {
            let html = render(&config(json!({ "thumbnailSize": size })), &store).unwrap();
            assert!(html.contains(r#"src="/wide-1600x400.jpg""#));
            assert!(!html.contains("width=\""));
            assert!(!html.contains("height=\""));
            assert!(html.contains(&format!("max-width: {}px; height: auto;", max_width)));
        }

        let html = render(&config(json!({ "thumbnailSize": "thumbnail" })), &store).unwrap();
        assert!(html.contains(r#"width="150" height="150""#));
        assert!(!html.contains("max-width"));
    }

    #[test]
    fn test_thumbnail_disabled_hides_images_and_placeholders() {
        let mut posts = five_posts();
        posts[0].thumbnail = Some(Thumbnail::new("/a.jpg"));
        let store = MemoryStore::new(posts);

        let html = render(&config(json!({ "displayPostThumbnail": false })), &store).unwrap();
        assert!(!html.contains("<img"));
        assert!(!html.contains("blog-posts-block-placeholder"));
    }

    #[test]
    fn test_excerpt_disabled_hides_excerpt() {
        let store = MemoryStore::new(five_posts());
        let html = render(&BlockConfiguration::default(), &store).unwrap();
        assert!(!html.contains("blog-posts-block-excerpt"));
        assert!(!html.contains("Summary of post"));
    }

    #[test]
    fn test_missing_excerpt_renders_empty_block() {
        let mut p = post(1, 0);
        p.excerpt = None;
        let store = MemoryStore::new(vec![p]);
        let html = render(&config(json!({ "displayPostExcerpt": true })), &store).unwrap();
        assert!(html.contains(r#"<p class="blog-posts-block-excerpt"></p>"#));
    }

    #[test]
    fn test_category_filter() {
        let mut posts = five_posts();
        posts[0].category_ids = vec![2];
        posts[3].category_ids = vec![2, 3];
        posts[4].category_ids = vec![3];
        let store = MemoryStore::new(posts);

        let filtered = config(json!({ "postCategory": 2, "numberOfPosts": 10 }));
        let html = render(&filtered, &store).unwrap();
        assert_eq!(html.matches(ITEM).count(), 2);
        assert!(html.contains("Post 1"));
        assert!(html.contains("Post 4"));

        let unfiltered = config(json!({ "postCategory": 0, "numberOfPosts": 10 }));
        let html = render(&unfiltered, &store).unwrap();
        assert_eq!(html.matches(ITEM).count(), 5);
    }

    #[test]
    fn test_empty_result_is_empty_container() {
        let store = MemoryStore::new(Vec::new());
        let html = render(&BlockConfiguration::default(), &store).unwrap();
        assert_eq!(html, r#"<div class="blog-posts-block"></div>"#);
        assert_eq!(html, empty_listing());

        let store = MemoryStore::new(five_posts());
        let html = render(&config(json!({ "postCategory": 99 })), &store).unwrap();
        assert_eq!(html, empty_listing());
    }

    #[test]
    fn test_drafts_are_not_listed() {
        let mut posts = five_posts();
        posts[4].status = PostStatus::Draft;
        let store = MemoryStore::new(posts);
        let html = render(&config(json!({ "numberOfPosts": 10 })), &store).unwrap();
        assert!(!html.contains("Post 5"));
        assert_eq!(html.matches(ITEM).count(), 4);
    }

    #[test]
    fn test_title_and_link_are_escaped() {
        let mut p = post(1, 0);
        p.title = "Fish & <Chips>".to_string();
        p.permalink = "https://example.com/?p=1&x=\"y\"".to_string();
        let store = MemoryStore::new(vec![p]);

        let html = render(&BlockConfiguration::default(), &store).unwrap();
        assert!(html.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(html.contains(r#"href="https://example.com/?p=1&amp;x=&quot;y&quot;""#));
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = MemoryStore::new(five_posts());
        let config = config(json!({ "displayPostExcerpt": true }));
        assert_eq!(render(&config, &store).unwrap(), render(&config, &store).unwrap());
    }

    #[test]
    fn test_unavailable_store() {
        let store = MemoryStore::new(five_posts());
        store.set_available(false);

        let err = render(&BlockConfiguration::default(), &store).unwrap_err();
        assert!(matches!(err, BlockError::StoreUnavailable(_)));

        let html = render_or_notice(&BlockConfiguration::default(), &store);
        assert!(html.starts_with(&empty_listing()));
        assert!(html.contains("blog-posts-block-notice"));
    }

    #[test]
    fn test_render_attributes_validates_first() {
        let store = MemoryStore::new(five_posts());
        let raw = RawAttributes::from_pairs([(keys::NUMBER_OF_POSTS, "11")]);
        let err = render_attributes(&raw, &store).unwrap_err();
        match err {
            BlockError::Validation(e) => assert_eq!(e.field, keys::NUMBER_OF_POSTS),
            other => panic!("unexpected error: {}", other),
        }

        let raw = RawAttributes::from_pairs([(keys::NUMBER_OF_POSTS, "2")]);
        let html = render_attributes(&raw, &store).unwrap();
        assert_eq!(html.matches(ITEM).count(), 2);
        assert_eq!(
            BlockConfiguration::from_raw(&raw).unwrap().post_category,
            CategoryFilter::All
        );
    }
}
