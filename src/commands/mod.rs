//! CLI command implementations

pub mod list;
pub mod metadata;
pub mod render;
pub mod validate;

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::config::RawAttributes;

/// Collect raw attributes from an optional file plus `key=value` overrides
///
/// Files may be JSON, YAML or TOML, chosen by extension.
pub fn load_attributes(file: Option<&Path>, sets: &[String]) -> Result<RawAttributes> {
    let mut raw = match file {
        Some(path) => read_attributes_file(path)?,
        None => RawAttributes::new(),
    };

    let pairs = sets
        .iter()
        .map(|set| {
            set.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| anyhow!("Expected key=value, got `{}`", set))
        })
        .collect::<Result<Vec<_>>>()?;

    raw.merge(&RawAttributes::from_pairs(pairs));
    Ok(raw)
}

fn read_attributes_file(path: &Path) -> Result<RawAttributes> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let raw = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        Some("yml") | Some("yaml") => serde_yaml::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => bail!(
            "Unsupported attributes file {:?} (expected .json, .yml, .yaml or .toml)",
            path
        ),
    };

    tracing::debug!("Loaded block attributes from {:?}", path);
    Ok(raw)
}
