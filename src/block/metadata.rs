//! Block registration metadata (the `block.json` equivalent)

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::{keys, BlockConfiguration, NumberOfPosts, ThumbnailSize};
use crate::content::Category;

/// Type and default of one block attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub default: Value,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u8>,
}

impl AttributeSchema {
    fn new(kind: &'static str, default: Value) -> Self {
        Self {
            kind,
            default,
            allowed: None,
            minimum: None,
            maximum: None,
        }
    }
}

/// Registration descriptor for the block
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockType {
    pub api_version: u8,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub keywords: Vec<&'static str>,
    pub attributes: IndexMap<&'static str, AttributeSchema>,
    /// Rendered on the server only; the editor saves no markup
    pub save: Option<()>,
}

impl BlockType {
    pub fn descriptor() -> Self {
        let defaults = BlockConfiguration::default();

        let mut attributes = IndexMap::new();
        attributes.insert(
            keys::NUMBER_OF_POSTS,
            AttributeSchema {
                minimum: Some(NumberOfPosts::MIN),
                maximum: Some(NumberOfPosts::MAX),
                ..AttributeSchema::new("number", json!(defaults.number_of_posts.get()))
            },
        );
        attributes.insert(
            keys::DISPLAY_POST_THUMBNAIL,
            AttributeSchema::new("boolean", json!(defaults.display_post_thumbnail)),
        );
        attributes.insert(
            keys::THUMBNAIL_SIZE,
            AttributeSchema {
                allowed: Some(ThumbnailSize::ALL.iter().map(|s| s.as_str()).collect()),
                ..AttributeSchema::new("string", json!(defaults.thumbnail_size.as_str()))
            },
        );
        attributes.insert(
            keys::DISPLAY_POST_EXCERPT,
            AttributeSchema::new("boolean", json!(defaults.display_post_excerpt)),
        );
        attributes.insert(
            keys::POST_CATEGORY,
            AttributeSchema::new("number", json!(defaults.post_category.id())),
        );

        Self {
            api_version: 3,
            name: "blog-posts-block/recent-posts",
            title: "Blog Posts",
            description: "List the most recent published posts.",
            icon: "admin-post",
            category: "widgets",
            keywords: vec!["posts", "recent", "latest"],
            attributes,
            save: None,
        }
    }
}

/// One entry of the settings panel's category select
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub label: String,
    pub value: u64,
}

/// "All Categories" followed by every category in the store
pub fn category_options(categories: &[Category]) -> Vec<CategoryOption> {
    std::iter::once(CategoryOption {
        label: "All Categories".to_string(),
        value: 0,
    })
    .chain(categories.iter().map(|c| CategoryOption {
        label: c.name.clone(),
        value: c.id,
    }))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawAttributes;

    #[test]
    fn test_descriptor_json() {
        let json = serde_json::to_value(BlockType::descriptor()).unwrap();
        assert_eq!(json["apiVersion"], 3);
        assert_eq!(json["name"], "blog-posts-block/recent-posts");
        assert_eq!(json["attributes"]["numberOfPosts"]["default"], 5);
        assert_eq!(json["attributes"]["numberOfPosts"]["maximum"], 10);
        assert_eq!(json["attributes"]["thumbnailSize"]["enum"][2], "large");
        assert_eq!(json["attributes"]["postCategory"]["type"], "number");
        assert!(json["save"].is_null());
        assert!(json["attributes"]["displayPostExcerpt"].get("minimum").is_none());
    }

    #[test]
    fn test_descriptor_defaults_validate() {
        let descriptor = BlockType::descriptor();
        let raw: RawAttributes = descriptor
            .attributes
            .iter()
            .map(|(k, schema)| (k.to_string(), schema.default.clone()))
            .collect();
        assert_eq!(
            BlockConfiguration::from_raw(&raw).unwrap(),
            BlockConfiguration::default()
        );
    }

    #[test]
    fn test_category_options() {
        let options = category_options(&[Category::new(4, "Rust")]);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, 0);
        assert_eq!(options[0].label, "All Categories");
        assert_eq!(options[1].label, "Rust");
        assert_eq!(options[1].value, 4);
    }
}
