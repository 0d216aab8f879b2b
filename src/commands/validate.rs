//! Validate block attributes and print their normalized form

use anyhow::Result;

use crate::config::{BlockConfiguration, RawAttributes};

/// Normalized attributes as pretty JSON, plus the editor summary line
pub fn run(raw: &RawAttributes) -> Result<(String, String)> {
    let config = BlockConfiguration::from_raw(raw)?;
    let json = serde_json::to_string_pretty(&config.to_raw())?;
    Ok((json, config.summary()))
}
