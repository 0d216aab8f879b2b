//! Print the block registration descriptor

use anyhow::Result;

use crate::block::BlockType;

/// The descriptor as pretty JSON
pub fn run() -> Result<String> {
    Ok(serde_json::to_string_pretty(&BlockType::descriptor())?)
}
