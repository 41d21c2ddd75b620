//! Wire types for the API collaborator

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a paginated listing response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Items on this page
    #[serde(default)]
    pub items: Vec<Value>,
    /// Total item count across all pages
    #[serde(default)]
    pub total: u64,
    /// 1-based page number
    #[serde(default)]
    pub page: u64,
    /// Page size
    #[serde(default)]
    pub size: u64,
}

impl Page {
    /// Whether `page` (1-based, of the given size) was the last page
    pub fn is_last(&self, page: u64, size: u64) -> bool {
        page.saturating_mul(size) >= self.total
    }
}
