//! Handlers for tracked assets.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bimfm_core::condition::{validate_score, validate_status};
use bimfm_core::error::CoreError;
use bimfm_core::mir::{is_filled, MirCheck, MirReport};
use bimfm_core::types::DbId;
use bimfm_db::models::asset::{Asset, AssetListParams, CreateAsset, UpdateAsset};
use bimfm_db::models::inspection::{AssetStatistics, InspectionDetail};
use bimfm_db::models::property::AssetProperty;
use bimfm_db::repositories::{
    AssetRepo, IfcFileRepo, InspectionRepo, MirRequirementRepo, PropertyRepo,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::handlers::inspections::attach_photos;
use crate::query::page;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Asset", id })
}

pub(crate) async fn ensure_asset_exists(state: &AppState, id: DbId) -> AppResult<Asset> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn validate_condition(status: Option<&str>, score: Option<i32>) -> AppResult<()> {
    if let Some(status) = status {
        validate_status(status)?;
    }
    if let Some(score) = score {
        validate_score("condition_score", score)?;
    }
    Ok(())
}

/// Reject a serial number already used by another asset.
async fn check_serial_unique(
    state: &AppState,
    serial: Option<&str>,
    own_id: Option<DbId>,
) -> AppResult<()> {
    let Some(serial) = serial else {
        return Ok(());
    };
    if let Some(existing) = AssetRepo::find_by_serial(&state.pool, serial).await? {
        if Some(existing.id) != own_id {
            return Err(AppError::BadRequest(format!(
                "Serial number '{serial}' is already registered"
            )));
        }
    }
    Ok(())
}

/// GET /api/assets
pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<Json<Vec<Asset>>> {
    if let Some(status) = params.condition_status.as_deref() {
        validate_status(status)?;
    }
    let (limit, offset) = page(params.skip, params.limit);
    let assets = AssetRepo::list(&state.pool, &params, limit, offset).await?;
    Ok(Json(assets))
}

/// POST /api/assets
///
/// Manual registration of an asset that did not come from a model file.
pub async fn create_asset(
    State(state): State<AppState>,
    Json(input): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    if input.ifc_guid.trim().is_empty() {
        return Err(AppError::BadRequest("ifc_guid must not be empty".to_string()));
    }
    if input.ifc_type.trim().is_empty() {
        return Err(AppError::BadRequest("ifc_type must not be empty".to_string()));
    }
    validate_condition(input.condition_status.as_deref(), input.condition_score)?;

    if AssetRepo::find_by_guid(&state.pool, &input.ifc_guid)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(format!(
            "Asset with GUID '{}' already exists",
            input.ifc_guid
        )));
    }
    check_serial_unique(&state, input.serial_number.as_deref(), None).await?;

    if let Some(file_id) = input.ifc_file_id {
        IfcFileRepo::find_by_id(&state.pool, file_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "IfcFile",
                id: file_id,
            }))?;
    }

    let asset = AssetRepo::create(&state.pool, &input).await?;
    tracing::info!(asset_id = asset.id, ifc_guid = %asset.ifc_guid, "Asset registered");
    Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /api/assets/{id}
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Asset>> {
    Ok(Json(ensure_asset_exists(&state, id).await?))
}

/// PUT|PATCH /api/assets/{id}
///
/// Only fields present in the body are changed.
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAsset>,
) -> AppResult<Json<Asset>> {
    validate_condition(input.condition_status.as_deref(), input.condition_score)?;
    ensure_asset_exists(&state, id).await?;
    check_serial_unique(&state, input.serial_number.as_deref(), Some(id)).await?;

    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::debug!(asset_id = id, "Asset updated");
    Ok(Json(asset))
}

/// DELETE /api/assets/{id}
///
/// Inspections, their photos and the asset's properties go with it.
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(asset_id = id, "Asset deleted");
    Ok(Json(json!({ "message": "Asset deleted" })))
}

/// GET /api/assets/{id}/inspections
pub async fn list_asset_inspections(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<InspectionDetail>>> {
    ensure_asset_exists(&state, id).await?;
    let inspections = InspectionRepo::list_for_asset(&state.pool, id).await?;
    Ok(Json(attach_photos(&state, inspections).await?))
}

/// GET /api/assets/{id}/statistics
pub async fn get_asset_statistics(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AssetStatistics>> {
    let asset = ensure_asset_exists(&state, id).await?;
    let totals = InspectionRepo::totals_for_asset(&state.pool, id).await?;
    let severity_distribution = InspectionRepo::severity_distribution(&state.pool, id).await?;

    Ok(Json(AssetStatistics {
        asset_id: id,
        total_inspections: totals.total_inspections,
        inspections_with_pathology: totals.inspections_with_pathology,
        latest_inspection_date: totals.latest_inspection_date,
        current_condition: asset.condition_status,
        current_condition_score: asset.condition_score,
        severity_distribution,
    }))
}

/// GET /api/assets/{id}/properties
pub async fn list_asset_properties(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<AssetProperty>>> {
    ensure_asset_exists(&state, id).await?;
    let properties = PropertyRepo::list_for_asset(&state.pool, id).await?;
    Ok(Json(properties))
}

/// GET /api/assets/{id}/mir
///
/// Evaluate every catalog requirement bound to an asset column.
pub async fn get_asset_mir(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MirReport>> {
    let asset = ensure_asset_exists(&state, id).await?;
    let fields = serde_json::to_value(&asset)
        .map_err(|e| AppError::Internal(format!("Failed to serialize asset: {e}")))?;

    let checks = MirRequirementRepo::list_bound_to_assets(&state.pool)
        .await?
        .into_iter()
        .filter_map(|req| {
            let field = req.asset_field?;
            Some(MirCheck {
                satisfied: is_filled(fields.get(&field)),
                requirement_number: req.requirement_number,
                category: req.category,
                requirement_name: req.requirement_name,
                asset_field: field,
                is_mandatory: req.is_mandatory,
            })
        })
        .collect();

    Ok(Json(MirReport::from_checks(id, checks)))
}
