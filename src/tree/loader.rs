//! Loads exported quality check files back into memory

use super::layout::SOURCE_FILE_KEY;
use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key every check record must carry to be recognized by the loader
const CHECK_MARKER_KEY: &str = "rule_type";

/// Recursively load every quality check YAML file under `root`
///
/// Files that do not parse as a YAML mapping, or that lack a `rule_type`
/// key, are skipped with a warning rather than failing the whole load; an
/// unrelated file sitting in the tree must not block an import. Each
/// returned record carries its path relative to `root` under the
/// `_source_file` key so downstream errors can point back at the file.
///
/// Directory entries are visited in sorted order for determinism.
pub fn load_checks_from_directory(root: &Path) -> Result<Vec<Value>> {
    let mut checks = Vec::new();
    if !root.is_dir() {
        return Ok(checks);
    }
    walk(root, root, &mut checks)?;
    Ok(checks)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<Value>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(root, &path, out)?;
            continue;
        }
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if !is_yaml {
            continue;
        }
        if let Some(check) = load_check_file(root, &path) {
            out.push(check);
        }
    }
    Ok(())
}

fn load_check_file(root: &Path, path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("skipping unreadable file {}: {e}", path.display());
            return None;
        }
    };

    let parsed: Value = match serde_yaml::from_str(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("skipping malformed YAML {}: {e}", path.display());
            return None;
        }
    };

    let Value::Object(mut map) = parsed else {
        warn!("skipping non-mapping YAML {}", path.display());
        return None;
    };
    if !map.contains_key(CHECK_MARKER_KEY) {
        warn!(
            "skipping {}: no '{CHECK_MARKER_KEY}' key, not a check record",
            path.display()
        );
        return None;
    }

    let relative = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    map.insert(SOURCE_FILE_KEY.to_string(), Value::String(relative));
    Some(Value::Object(map))
}
