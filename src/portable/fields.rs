//! Field classification for portable representations
//!
//! Every internal-field blocklist and sensitive-field set lives here so the
//! export and import sides can never drift apart about what round-trips.

/// Connection fields that hold secrets; exported as `${ENV_VAR}` placeholders
/// and resolved from the environment at import time.
pub const CONNECTION_SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "secret_key",
    "credentials_payload",
    "access_key",
    "passphrase",
    "token",
    "private_key",
    "private_key_der_b64",
    "private_key_path",
];

/// Server-only connection fields, never round-tripped
pub const CONNECTION_INTERNAL_FIELDS: &[&str] = &[
    "id",
    "created",
    "connection_type",
    "datastores",
    "product_name",
    "product_version",
    "driver_name",
    "driver_version",
];

/// Server-only datastore fields (derived scores, counts, operational state)
pub const DATASTORE_INTERNAL_FIELDS: &[&str] = &[
    "id",
    "created",
    "connected",
    "favorite",
    "latest_operation",
    "metrics",
    "anomaly_count",
    "check_count",
    "container_count",
    "field_count",
    "record_count",
    "score",
    "overall_score",
    "completeness_score",
    "conformity_score",
    "consistency_score",
    "precision_score",
    "timeliness_score",
    "volume_score",
    "accuracy_score",
    "uniqueness_score",
    "containers",
    "connection",
];

/// Server-only container fields
pub const CONTAINER_INTERNAL_FIELDS: &[&str] = &[
    "id",
    "created",
    "status",
    "metrics",
    "computed_fields",
    "field_count",
    "anomaly_count",
    "check_count",
    "record_count",
    "score",
    "cataloged",
    "datastore",
];

/// Raw ID reference fields on containers; replaced by `*_name` references
pub const CONTAINER_ID_REF_FIELDS: &[&str] = &[
    "source_container_id",
    "left_container_id",
    "right_container_id",
    "datastore_id",
];

/// Server-only quality check fields
pub const CHECK_INTERNAL_FIELDS: &[&str] = &[
    "id",
    "created",
    "anomaly_count",
    "last_asserted",
    "last_editor",
    "num_container_scans",
];

/// Legacy promotion artifacts inside `additional_metadata`, dropped on export
pub const CHECK_LEGACY_METADATA_KEYS: &[&str] = &["from quality check id", "main datastore id"];

/// Container types managed as config-as-code; everything else is
/// catalog-discovered from the warehouse and never exported.
pub const COMPUTED_CONTAINER_TYPES: &[&str] = &["computed_table", "computed_file", "computed_join"];

/// Datastore fields only valid at creation time, dropped before updates
pub const DATASTORE_CREATE_ONLY_FIELDS: &[&str] = &["trigger_catalog"];

/// Check whether a container type is one of the computed variants
pub fn is_computed_container_type(container_type: &str) -> bool {
    COMPUTED_CONTAINER_TYPES.contains(&container_type)
}
