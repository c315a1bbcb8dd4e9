//! Uploaded IFC model files and their processing state.

use bimfm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ifc_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IfcFile {
    pub id: DbId,
    pub filename: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub ifc_schema: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub processing_status: String,
    pub processing_error: Option<String>,
    pub elements_processed: i32,
    pub assets_created: i32,
    pub uploaded_at: Timestamp,
    pub processed_at: Option<Timestamp>,
}

/// Insert payload for a freshly uploaded file. Status starts as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIfcFile {
    pub filename: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub project_name: Option<String>,
}

/// Header data read from the model once parsing succeeds.
#[derive(Debug, Clone, Default)]
pub struct IfcFileHeader {
    pub ifc_schema: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
}
