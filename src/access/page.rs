//! Page Module
//!
//! A slice of a collection plus what a caller needs to ask for the next one.

use serde::{Deserialize, Serialize};

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page index
    pub page: usize,
    /// Requested page size
    pub limit: usize,
    /// Size of the whole collection
    pub total: usize,
    /// Whether a later page has items
    pub has_more: bool,
}

impl<T: Clone> Page<T> {
    /// Cuts page `page` of size `limit` out of `all`.
    ///
    /// Pages past the end are empty rather than an error.
    pub fn slice(all: &[T], page: usize, limit: usize) -> Self {
        let total = all.len();
        let start = page.saturating_mul(limit).min(total);
        let end = start.saturating_add(limit).min(total);
        let has_more = page.saturating_add(1).saturating_mul(limit) < total;

        Self {
            items: all[start..end].to_vec(),
            page,
            limit,
            total,
            has_more,
        }
    }
}
