//! Writes quality checks into a per-datastore checks tree

use crate::identity::check_filename;
use crate::portable::strip_check_for_export;
use crate::tree::layout::check_container_dir;
use crate::tree::write_yaml;
use crate::error::Result;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Export checks as YAML files under `checks_root`
///
/// Each check is stripped to its portable form and written to
/// `<container_slug>/<rule>__<fields>.yaml`; checks without a resolvable
/// container name land in the `_no_container` fallback directory. Canonical
/// filenames already taken in this run get a `_2`, `_3`, ... suffix, never
/// an overwrite. Returns the number of checks exported.
pub fn export_checks_to_directory(checks: &[Value], checks_root: &Path) -> Result<usize> {
    let mut taken: HashSet<PathBuf> = HashSet::new();
    let mut exported = 0;

    for check in checks {
        let portable = strip_check_for_export(check);
        let container = portable
            .get("container")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let rule_type = portable
            .get("rule_type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let field_names: Vec<String> = portable
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f.as_str().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let dir = check_container_dir(checks_root, container);
        let path = deduped_path(&dir, &check_filename(rule_type, &field_names), &mut taken);
        write_yaml(&path, &portable)?;
        exported += 1;
    }

    debug!("exported {exported} checks under {}", checks_root.display());
    Ok(exported)
}

/// First free path for `filename` in `dir`, suffixing `_2`, `_3`, ... as needed
fn deduped_path(dir: &Path, filename: &str, taken: &mut HashSet<PathBuf>) -> PathBuf {
    let canonical = dir.join(filename);
    if taken.insert(canonical.clone()) {
        return canonical;
    }

    let stem = filename.strip_suffix(".yaml").unwrap_or(filename);
    let mut n = 2u32;
    loop {
        let candidate = dir.join(format!("{stem}_{n}.yaml"));
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
