//! API collaborator: HTTP client and per-resource CRUD wrappers
//!
//! The export/import core treats this module as an external boundary: plain
//! JSON payloads in and out, typed errors by HTTP status class, paginated
//! listings exposed as `{items, total, page, size}` envelopes.

mod client;
pub mod resources;
mod types;

pub use client::{ApiClient, ApiClientConfig};
pub use types::Page;
