//! Helper functions for building markup and URLs

mod html;
mod url;

pub use html::*;
pub use url::*;
