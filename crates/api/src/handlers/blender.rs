//! Handlers for the Blender add-on: model data out, condition edits in.

use axum::extract::{Path, State};
use axum::Json;
use bimfm_core::condition::{validate_score, validate_status, viewport_color};
use bimfm_core::error::CoreError;
use bimfm_core::types::{DbId, Timestamp};
use bimfm_db::models::asset::{Asset, ConditionChange};
use bimfm_db::models::ifc_file::IfcFile;
use bimfm_db::repositories::{AssetRepo, IfcFileRepo, InspectionRepo};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub ifc_file_id: DbId,
    pub sync_direction: String,
    pub blender_data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncDirection {
    ToBlender,
    FromBlender,
}

impl SyncDirection {
    fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "to_blender" => Ok(Self::ToBlender),
            "from_blender" => Ok(Self::FromBlender),
            other => Err(AppError::BadRequest(format!(
                "Invalid sync_direction '{other}'. Must be 'to_blender' or 'from_blender'"
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportFile<'a> {
    id: DbId,
    filename: &'a str,
    file_path: &'a str,
}

#[derive(Debug, Serialize)]
struct ExportLocation<'a> {
    building: Option<&'a str>,
    floor: Option<&'a str>,
    room: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ExportAsset<'a> {
    ifc_guid: &'a str,
    name: Option<&'a str>,
    ifc_type: &'a str,
    condition_status: Option<&'a str>,
    condition_score: Option<i32>,
    manufacturer: Option<&'a str>,
    serial_number: Option<&'a str>,
    location: ExportLocation<'a>,
}

#[derive(Debug, Serialize)]
struct ExportInspection {
    code: String,
    asset_ifc_guid: Option<String>,
    inspection_date: Timestamp,
    has_pathology: bool,
    severity: Option<i32>,
    location: String,
    observations: Option<String>,
}

/// One entry of `blender_data.assets` sent by the add-on.
///
/// Custom properties edited in Blender come back as floats, so the score
/// is read as `f64` and narrowed by [`integral_score`].
#[derive(Debug, Deserialize)]
struct BlenderAssetEdit {
    ifc_guid: Option<String>,
    condition_status: Option<String>,
    condition_score: Option<f64>,
}

fn integral_score(raw: f64) -> Option<i32> {
    let in_range = raw.fract() == 0.0 && raw >= f64::from(i32::MIN) && raw <= f64::from(i32::MAX);
    in_range.then_some(raw as i32)
}

#[derive(Debug, Serialize)]
pub struct ViewerFile {
    pub id: DbId,
    pub filename: String,
    pub project_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewerAsset {
    pub id: DbId,
    pub ifc_guid: String,
    pub name: Option<String>,
    pub condition_status: Option<String>,
    pub condition_score: Option<i32>,
    pub viewport_color: [f32; 3],
}

#[derive(Debug, Serialize)]
pub struct ViewerInspection {
    pub id: DbId,
    pub code: String,
    pub asset_id: DbId,
    pub severity: Option<i32>,
    pub has_pathology: bool,
}

/// Response of `GET /api/blender/{ifc_file_id}/blender-data`.
#[derive(Debug, Serialize)]
pub struct BlenderData {
    pub ifc_file: ViewerFile,
    pub assets: Vec<ViewerAsset>,
    pub inspections: Vec<ViewerInspection>,
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

async fn find_file(state: &AppState, id: DbId) -> AppResult<IfcFile> {
    IfcFileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "IfcFile",
            id,
        }))
}

async fn export_to_blender(state: &AppState, file: &IfcFile) -> AppResult<Value> {
    let assets = AssetRepo::list_all_by_file(&state.pool, file.id).await?;
    let inspections = InspectionRepo::list_for_file(&state.pool, file.id).await?;

    let guid_of = |asset_id: DbId| {
        assets
            .iter()
            .find(|a| a.id == asset_id)
            .map(|a| a.ifc_guid.clone())
    };

    let export_assets: Vec<ExportAsset<'_>> = assets.iter().map(export_asset).collect();
    let export_inspections: Vec<ExportInspection> = inspections
        .into_iter()
        .map(|i| ExportInspection {
            asset_ifc_guid: guid_of(i.asset_id),
            code: i.code,
            inspection_date: i.inspection_date,
            has_pathology: i.has_pathology,
            severity: i.severity,
            location: i.location,
            observations: i.observations,
        })
        .collect();

    let export_file = ExportFile {
        id: file.id,
        filename: &file.filename,
        file_path: &file.file_path,
    };
    Ok(json!({
        "ifc_file": export_file,
        "assets": export_assets,
        "inspections": export_inspections,
    }))
}

fn export_asset(asset: &Asset) -> ExportAsset<'_> {
    ExportAsset {
        ifc_guid: &asset.ifc_guid,
        name: asset.name.as_deref(),
        ifc_type: &asset.ifc_type,
        condition_status: asset.condition_status.as_deref(),
        condition_score: asset.condition_score,
        manufacturer: asset.manufacturer.as_deref(),
        serial_number: asset.serial_number.as_deref(),
        location: ExportLocation {
            building: asset.location_building.as_deref(),
            floor: asset.location_floor.as_deref(),
            room: asset.location_room.as_deref(),
        },
    }
}

/// Apply condition edits from the add-on to assets of `file`.
///
/// Entries without a matching GUID, and values off the condition scale,
/// are skipped.
async fn import_from_blender(
    state: &AppState,
    file: &IfcFile,
    data: Option<&Value>,
) -> AppResult<Value> {
    let Some(data) = data.filter(|d| !d.is_null()) else {
        return Ok(json!({ "message": "No data provided from Blender" }));
    };

    let entries = data
        .get("assets")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut updated_count = 0usize;
    let mut tx = state.pool.begin().await?;
    for entry in entries {
        let edit: BlenderAssetEdit = match serde_json::from_value(entry) {
            Ok(edit) => edit,
            Err(e) => {
                tracing::warn!(file_id = file.id, error = %e, "Skipping malformed Blender asset entry");
                continue;
            }
        };
        let Some(guid) = edit.ifc_guid.as_deref() else {
            continue;
        };
        let Some(asset) = AssetRepo::find_by_guid_in_file(&state.pool, file.id, guid).await? else {
            continue;
        };

        let condition_status = edit
            .condition_status
            .filter(|status| match validate_status(status) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(ifc_guid = guid, error = %e, "Ignoring condition_status from Blender");
                    false
                }
            });
        let condition_score = edit.condition_score.and_then(|raw| {
            let Some(score) = integral_score(raw) else {
                tracing::warn!(ifc_guid = guid, score = raw, "Ignoring non-integral condition_score from Blender");
                return None;
            };
            match validate_score("condition_score", score) {
                Ok(()) => Some(score),
                Err(e) => {
                    tracing::warn!(ifc_guid = guid, error = %e, "Ignoring condition_score from Blender");
                    None
                }
            }
        });

        if condition_status.is_some() || condition_score.is_some() {
            let change = ConditionChange {
                condition_status,
                condition_score,
                last_inspection_date: None,
            };
            AssetRepo::apply_condition_in(&mut tx, asset.id, &change).await?;
        }
        updated_count += 1;
    }
    tx.commit().await?;

    tracing::info!(file_id = file.id, updated_count, "Blender changes applied");
    Ok(json!({
        "message": format!("Updated {updated_count} assets from Blender"),
        "updated_count": updated_count,
    }))
}

/// POST /api/blender/sync
///
/// Unknown files and directions are request errors; anything that fails
/// while syncing is reported in the body with `success: false`.
pub async fn sync(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> AppResult<Json<SyncResponse>> {
    let file = find_file(&state, request.ifc_file_id).await?;
    let direction = SyncDirection::parse(&request.sync_direction)?;

    let outcome = match direction {
        SyncDirection::ToBlender => export_to_blender(&state, &file).await,
        SyncDirection::FromBlender => {
            import_from_blender(&state, &file, request.blender_data.as_ref()).await
        }
    };

    let response = match outcome {
        Ok(data) => SyncResponse {
            success: true,
            message: match direction {
                SyncDirection::ToBlender => "Data synchronized to Blender".to_string(),
                SyncDirection::FromBlender => "Data synchronized from Blender".to_string(),
            },
            data: Some(data),
        },
        Err(e) => {
            tracing::error!(file_id = file.id, error = %e, "Blender sync failed");
            SyncResponse {
                success: false,
                message: format!("Sync failed: {e}"),
                data: None,
            }
        }
    };
    Ok(Json(response))
}

/// GET /api/blender/{ifc_file_id}/blender-data
///
/// Everything the add-on needs to color the model by condition.
pub async fn blender_data(
    State(state): State<AppState>,
    Path(ifc_file_id): Path<DbId>,
) -> AppResult<Json<BlenderData>> {
    let file = find_file(&state, ifc_file_id).await?;
    let assets = AssetRepo::list_all_by_file(&state.pool, file.id).await?;
    let inspections = InspectionRepo::list_for_file(&state.pool, file.id).await?;

    Ok(Json(BlenderData {
        ifc_file: ViewerFile {
            id: file.id,
            filename: file.filename,
            project_name: file.project_name,
        },
        assets: assets
            .into_iter()
            .map(|a| ViewerAsset {
                viewport_color: viewport_color(a.condition_score),
                id: a.id,
                ifc_guid: a.ifc_guid,
                name: a.name,
                condition_status: a.condition_status,
                condition_score: a.condition_score,
            })
            .collect(),
        inspections: inspections
            .into_iter()
            .map(|i| ViewerInspection {
                id: i.id,
                code: i.code,
                asset_id: i.asset_id,
                severity: i.severity,
                has_pathology: i.has_pathology,
            })
            .collect(),
    }))
}
