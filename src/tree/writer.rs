//! Idempotent YAML file writer

use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Write `data` as block-style YAML to `path`
///
/// Serialization is deterministic and keeps keys in the order the map
/// provides them. If the target file already holds byte-identical content
/// the file is left untouched and `Ok(false)` is returned; this is what
/// gives export its zero-git-diff-on-re-run property. Otherwise parent
/// directories are created as needed, the file is written, and `Ok(true)`
/// is returned.
pub fn write_yaml(path: &Path, data: &Value) -> Result<bool> {
    let content = serde_yaml::to_string(data)?;

    if path.exists() {
        let existing = fs::read_to_string(path)?;
        if existing == content {
            debug!("unchanged: {}", path.display());
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    debug!("wrote: {}", path.display());
    Ok(true)
}
