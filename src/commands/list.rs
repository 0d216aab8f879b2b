//! List store content

use anyhow::Result;

use crate::store::ContentStore;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = site.store();

    match content_type {
        "post" | "posts" => {
            let content = store.load()?;
            println!("Posts ({}):", content.posts.len());
            for post in content.posts {
                println!(
                    "  #{:<4} {} {:<8} {} [{}]",
                    post.id,
                    post.date.format("%Y-%m-%d"),
                    post.status,
                    post.title,
                    post.categories.join(", ")
                );
            }
        }
        "category" | "categories" => {
            let categories = store.categories()?;
            println!("Categories ({}):", categories.len());
            for category in categories {
                println!(
                    "  #{:<4} {} ({})",
                    category.id, category.name, category.count
                );
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, category", content_type);
        }
    }

    Ok(())
}
