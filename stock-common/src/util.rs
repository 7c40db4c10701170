//! Utility functions shared by the stock analysis crates.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result, ResultExt};

/// Read and decode a JSON document from disk.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).context(format!("reading {}", path.display()))?;
    if content.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} is empty", path.display())));
    }
    serde_json::from_str(&content).context(format!("decoding {}", path.display()))
}

/// Encode a value as pretty-printed JSON.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
