//! The recent posts block: render callback and registration metadata

mod metadata;
mod render;

use thiserror::Error;

use crate::config::ValidationError;
use crate::store::StoreError;

pub use metadata::{category_options, AttributeSchema, BlockType, CategoryOption};
pub use render::{
    build_query, empty_listing, render, render_attributes, render_or_notice, CONTAINER_CLASS,
};

/// Everything that can stop a block from rendering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// Bad configuration, reported back to the editing user
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The content store could not be queried
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}
