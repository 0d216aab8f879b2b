//! Configuration module

mod attributes;
mod site;

pub use attributes::keys;
pub use attributes::{
    BlockConfiguration, CategoryFilter, NumberOfPosts, RawAttributes, ThumbnailSize,
    ValidationError,
};
pub use site::SiteConfig;
