//! Shared query parameter types for API handlers.

use bimfm_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

/// `?skip=&limit=` paging used by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Clamped `(limit, offset)` pair.
    pub fn resolve(&self) -> (i64, i64) {
        page(self.skip, self.limit)
    }
}

/// Clamp raw `skip` / `limit` values.
pub fn page(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        clamp_offset(skip),
    )
}
