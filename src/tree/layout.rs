//! On-disk layout of an exported configuration tree
//!
//! ```text
//! <root>/
//!   connections/<slug(name)>.yaml
//!   datastores/<slug(ds_name)>/
//!       _datastore.yaml
//!       containers/<slug(container_name)>/_container.yaml
//!       checks/<slug(container_name)|_no_container>/<rule>__<fields>.yaml
//! ```

use crate::identity::slugify;
use std::path::{Path, PathBuf};

/// Directory holding one YAML file per connection
pub const CONNECTIONS_DIR: &str = "connections";

/// Directory holding one subdirectory per datastore
pub const DATASTORES_DIR: &str = "datastores";

/// Per-datastore directory of computed containers
pub const CONTAINERS_DIR: &str = "containers";

/// Per-datastore directory of quality checks
pub const CHECKS_DIR: &str = "checks";

/// Sentinel filename for a datastore definition
pub const DATASTORE_FILE: &str = "_datastore.yaml";

/// Sentinel filename for a container definition
pub const CONTAINER_FILE: &str = "_container.yaml";

/// Fallback directory for checks whose container name cannot be resolved
pub const NO_CONTAINER_DIR: &str = "_no_container";

/// Reserved key inside `additional_metadata` carrying a check's stable UID
pub const UID_KEY: &str = "check_uid";

/// Top-level provenance key attached to loaded checks (path relative to the
/// tree root). Stripped before any payload is sent to the server.
pub const SOURCE_FILE_KEY: &str = "_source_file";

/// Path of an exported connection file
pub fn connection_path(root: &Path, connection_name: &str) -> PathBuf {
    root.join(CONNECTIONS_DIR)
        .join(format!("{}.yaml", slugify(connection_name)))
}

/// Directory of an exported datastore
pub fn datastore_dir(root: &Path, datastore_name: &str) -> PathBuf {
    root.join(DATASTORES_DIR).join(slugify(datastore_name))
}

/// Path of an exported datastore file
pub fn datastore_path(root: &Path, datastore_name: &str) -> PathBuf {
    datastore_dir(root, datastore_name).join(DATASTORE_FILE)
}

/// Path of an exported container file
pub fn container_path(root: &Path, datastore_name: &str, container_slug: &str) -> PathBuf {
    datastore_dir(root, datastore_name)
        .join(CONTAINERS_DIR)
        .join(container_slug)
        .join(CONTAINER_FILE)
}

/// Per-datastore checks directory
pub fn checks_dir(root: &Path, datastore_name: &str) -> PathBuf {
    datastore_dir(root, datastore_name).join(CHECKS_DIR)
}

/// Directory for a check within a checks tree, given its container name
pub fn check_container_dir(checks_root: &Path, container_name: &str) -> PathBuf {
    let slug = slugify(container_name);
    if slug.is_empty() {
        checks_root.join(NO_CONTAINER_DIR)
    } else {
        checks_root.join(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_path() {
        let path = connection_path(Path::new("/out"), "Shared Conn");
        assert_eq!(path, Path::new("/out/connections/shared_conn.yaml"));
    }

    #[test]
    fn test_datastore_paths() {
        let root = Path::new("/out");
        assert_eq!(
            datastore_path(root, "Prod DB"),
            Path::new("/out/datastores/prod_db/_datastore.yaml")
        );
        assert_eq!(
            container_path(root, "Prod DB", "orders_view"),
            Path::new("/out/datastores/prod_db/containers/orders_view/_container.yaml")
        );
        assert_eq!(
            checks_dir(root, "Prod DB"),
            Path::new("/out/datastores/prod_db/checks")
        );
    }

    #[test]
    fn test_check_container_dir_fallback() {
        let checks = Path::new("/out/datastores/ds/checks");
        assert_eq!(
            check_container_dir(checks, "orders"),
            checks.join("orders")
        );
        assert_eq!(
            check_container_dir(checks, ""),
            checks.join(NO_CONTAINER_DIR)
        );
        assert_eq!(
            check_container_dir(checks, "---"),
            checks.join(NO_CONTAINER_DIR)
        );
    }
}
