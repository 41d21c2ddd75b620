//! Identity and naming for exported resources
//!
//! Pure functions that turn server object names into filesystem-safe path
//! segments, and a quality check's (container, rule type, fields) into a
//! stable content-derived UID. The UID is what makes re-imports converge:
//! identical inputs always produce the same UID regardless of field order.

use regex::Regex;
use std::sync::LazyLock;

/// Matches runs of characters that are not lowercase alphanumerics
static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Separator between the UID's segments
const UID_SEPARATOR: &str = "__";

/// Slugify a name into a path segment
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single underscore, and strips leading/trailing underscores. Collisions
/// between distinct inputs are possible; callers dedup where it matters.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let replaced = NON_ALNUM.replace_all(&lowered, "_");
    replaced.trim_matches('_').to_string()
}

/// Sort field names lexicographically and join with underscores
///
/// Returns `None` when there are no fields, so callers can omit the
/// segment entirely rather than emit a dangling separator.
fn joined_fields(field_names: &[String]) -> Option<String> {
    if field_names.is_empty() {
        return None;
    }
    let mut sorted: Vec<&str> = field_names.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    Some(sorted.join("_"))
}

/// Derive the stable UID for a quality check
///
/// `slugify(container)__lower(rule_type)__sorted_fields`, with the field
/// segment omitted when the check has no fields. Deterministic and
/// order-invariant in the field list.
pub fn generate_check_uid(container_name: &str, rule_type: &str, field_names: &[String]) -> String {
    let mut uid = format!(
        "{}{}{}",
        slugify(container_name),
        UID_SEPARATOR,
        rule_type.to_lowercase()
    );
    if let Some(fields) = joined_fields(field_names) {
        uid.push_str(UID_SEPARATOR);
        uid.push_str(&fields);
    }
    uid
}

/// Canonical filename for an exported quality check
///
/// Same normalization as the UID minus the container segment (the container
/// is the parent directory), with a `.yaml` extension.
pub fn check_filename(rule_type: &str, field_names: &[String]) -> String {
    match joined_fields(field_names) {
        Some(fields) => format!("{}{}{}.yaml", rule_type.to_lowercase(), UID_SEPARATOR, fields),
        None => format!("{}.yaml", rule_type.to_lowercase()),
    }
}

/// Environment-variable placeholder for a connection secret field
///
/// `${<UPPER(SLUG(NAME))>_<UPPER(FIELD)>}`, e.g. `${SHARED_CONN_PASSWORD}`.
pub fn env_var_placeholder(connection_name: &str, field: &str) -> String {
    let prefix = slugify(connection_name).to_uppercase();
    format!("${{{}_{}}}", prefix, field.to_uppercase())
}
