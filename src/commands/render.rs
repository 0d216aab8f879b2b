//! Render the block to stdout

use anyhow::Result;

use crate::block;
use crate::config::{BlockConfiguration, RawAttributes};
use crate::Site;

/// Render the block with the site's defaults overridden by `overrides`
///
/// Bad attributes abort the command; an unreachable store still prints the
/// empty listing with its notice.
pub fn run(site: &Site, overrides: &RawAttributes) -> Result<String> {
    let config = BlockConfiguration::from_raw(&site.attributes(overrides))?;
    tracing::info!("{}", config.summary());

    Ok(block::render_or_notice(&config, &site.store()))
}
