//! Portable representations of server objects
//!
//! One-way projections from server responses (numeric ids, nested
//! sub-objects, secrets) to human-editable, name-referenced dicts suitable
//! for YAML, and the reverse shaping back into API payloads at import time.
//! Field classifications are centralized in `fields`.

pub mod fields;

mod restore;
mod strip;

pub use restore::{
    check_container_name, check_uid_of, derive_check_uid, prepare_check_payload,
    prepare_container_payload, prepare_datastore_payload, resolve_connection_secrets,
    strip_create_only_fields, ContainerRef,
};
pub use strip::{
    strip_check_for_export, strip_connection_for_export, strip_container_for_export,
    strip_datastore_for_export,
};
