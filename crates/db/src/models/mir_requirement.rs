//! Minimum Information Requirements catalog.

use bimfm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `mir_requirements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MirRequirement {
    pub id: DbId,
    pub requirement_number: i32,
    pub category: String,
    pub requirement_name: String,
    pub description: Option<String>,
    pub is_mandatory: bool,
    /// Asset column that satisfies this requirement, if any.
    pub asset_field: Option<String>,
    pub created_at: Timestamp,
}
