//! Raw elements extracted from a model file.

use bimfm_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ifc_elements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IfcElement {
    pub id: DbId,
    /// STEP entity number (`#123`) inside the source file.
    pub ifc_id: i64,
    pub ifc_guid: String,
    pub ifc_type: String,
    pub name: Option<String>,
    pub ifc_data: Option<serde_json::Value>,
    pub ifc_file_id: DbId,
    pub asset_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIfcElement {
    pub ifc_id: i64,
    pub ifc_guid: String,
    pub ifc_type: String,
    pub name: Option<String>,
    pub ifc_data: Option<serde_json::Value>,
    pub ifc_file_id: DbId,
    pub asset_id: Option<DbId>,
}
