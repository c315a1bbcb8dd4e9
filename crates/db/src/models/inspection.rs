//! Field inspections, their photos, and per-asset inspection statistics.

use std::collections::BTreeMap;

use bimfm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A row from the `inspections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inspection {
    pub id: DbId,
    pub code: String,
    pub inspection_date: Timestamp,
    pub has_pathology: bool,
    pub pathology_type: Option<String>,
    /// 1 (critical) to 4 (good). Only set when `has_pathology` is true.
    pub severity: Option<i32>,
    pub location: String,
    pub observations: Option<String>,
    pub ai_analysis_performed: bool,
    pub ai_confidence: Option<f64>,
    pub ai_detection_mask_path: Option<String>,
    pub ai_heatmap_path: Option<String>,
    pub asset_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `inspection_photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InspectionPhoto {
    pub id: DbId,
    pub file_path: String,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub inspection_id: DbId,
    pub uploaded_at: Timestamp,
}

/// Inspection plus its photos, the shape every inspection endpoint returns.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionDetail {
    #[serde(flatten)]
    pub inspection: Inspection,
    pub photos: Vec<InspectionPhoto>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInspection {
    pub code: String,
    pub inspection_date: Timestamp,
    pub has_pathology: bool,
    pub pathology_type: Option<String>,
    pub severity: Option<i32>,
    pub location: String,
    pub observations: Option<String>,
    pub asset_id: DbId,
}

/// Partial update. `condition_status` is written to the owning asset,
/// not the inspection row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInspection {
    pub observations: Option<String>,
    pub severity: Option<i32>,
    pub condition_status: Option<String>,
}

/// Outcome of an AI analysis stored on the inspection.
#[derive(Debug, Clone)]
pub struct AiAnalysisUpdate {
    pub confidence: f64,
    pub mask_path: Option<String>,
    pub heatmap_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInspectionPhoto {
    pub file_path: String,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub inspection_id: DbId,
}

/// Filters for `GET /api/inspections`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InspectionListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub asset_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate counts over one asset's inspections.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionTotals {
    pub total_inspections: i64,
    pub inspections_with_pathology: i64,
    pub latest_inspection_date: Option<Timestamp>,
}

/// Response body of `GET /api/assets/{id}/statistics`.
#[derive(Debug, Clone, Serialize)]
pub struct AssetStatistics {
    pub asset_id: DbId,
    pub total_inspections: i64,
    pub inspections_with_pathology: i64,
    pub latest_inspection_date: Option<Timestamp>,
    pub current_condition: Option<String>,
    pub current_condition_score: Option<i32>,
    /// Severity value to number of inspections graded with it.
    pub severity_distribution: BTreeMap<i32, i64>,
}
