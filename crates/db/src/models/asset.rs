//! Tracked facility assets and their MIR data.

use bimfm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub ifc_guid: String,
    pub ifc_type: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub design_criteria: Option<String>,
    pub design_standard: Option<String>,
    pub manufacturer: Option<String>,
    pub supplier: Option<String>,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub location_building: Option<String>,
    pub location_floor: Option<String>,
    pub location_room: Option<String>,
    pub location_coordinates: Option<serde_json::Value>,
    pub warranty_start_date: Option<Timestamp>,
    pub warranty_end_date: Option<Timestamp>,
    pub warranty_provider: Option<String>,
    pub installation_date: Option<Timestamp>,
    pub expected_life_span: Option<i32>,
    pub replacement_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub spare_parts_list: Option<serde_json::Value>,
    pub spare_parts_availability: Option<String>,
    pub delivery_documentation: Option<serde_json::Value>,
    pub condition_status: Option<String>,
    pub condition_score: Option<i32>,
    pub last_inspection_date: Option<Timestamp>,
    pub ifc_file_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Insert payload, used both by manual registration and IFC ingestion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAsset {
    pub ifc_guid: String,
    pub ifc_type: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub design_criteria: Option<String>,
    pub design_standard: Option<String>,
    pub manufacturer: Option<String>,
    pub supplier: Option<String>,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub location_building: Option<String>,
    pub location_floor: Option<String>,
    pub location_room: Option<String>,
    pub location_coordinates: Option<serde_json::Value>,
    pub warranty_start_date: Option<Timestamp>,
    pub warranty_end_date: Option<Timestamp>,
    pub warranty_provider: Option<String>,
    pub installation_date: Option<Timestamp>,
    pub expected_life_span: Option<i32>,
    pub replacement_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub spare_parts_list: Option<serde_json::Value>,
    pub spare_parts_availability: Option<String>,
    pub delivery_documentation: Option<serde_json::Value>,
    pub condition_status: Option<String>,
    pub condition_score: Option<i32>,
    pub ifc_file_id: Option<DbId>,
}

/// Partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub design_criteria: Option<String>,
    pub design_standard: Option<String>,
    pub manufacturer: Option<String>,
    pub supplier: Option<String>,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub location_building: Option<String>,
    pub location_floor: Option<String>,
    pub location_room: Option<String>,
    pub location_coordinates: Option<serde_json::Value>,
    pub warranty_start_date: Option<Timestamp>,
    pub warranty_end_date: Option<Timestamp>,
    pub warranty_provider: Option<String>,
    pub installation_date: Option<Timestamp>,
    pub expected_life_span: Option<i32>,
    pub replacement_cost: Option<f64>,
    pub maintenance_cost: Option<f64>,
    pub spare_parts_list: Option<serde_json::Value>,
    pub spare_parts_availability: Option<String>,
    pub delivery_documentation: Option<serde_json::Value>,
    pub condition_status: Option<String>,
    pub condition_score: Option<i32>,
}

/// Condition fields written by inspections and the 3D sync.
#[derive(Debug, Clone, Default)]
pub struct ConditionChange {
    pub condition_status: Option<String>,
    pub condition_score: Option<i32>,
    pub last_inspection_date: Option<Timestamp>,
}

/// Filters for `GET /api/assets`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub ifc_file_id: Option<DbId>,
    pub condition_status: Option<String>,
}
