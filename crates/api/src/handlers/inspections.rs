//! Handlers for field inspections and their photos.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bimfm_core::condition::{status_for_severity, validate_score, validate_status};
use bimfm_core::error::CoreError;
use bimfm_core::types::DbId;
use bimfm_core::uploads::{inspection_photo_dir, inspection_photo_name};
use bimfm_db::models::asset::ConditionChange;
use bimfm_db::models::inspection::{
    CreateInspection, CreateInspectionPhoto, Inspection, InspectionDetail, InspectionListParams,
    InspectionPhoto, UpdateInspection,
};
use bimfm_db::repositories::{AssetRepo, InspectionPhotoRepo, InspectionRepo};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::form::{parse_timestamp, store_file, FormData};
use crate::handlers::assets::ensure_asset_exists;
use crate::query::page;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Inspection",
        id,
    })
}

/// Pair each inspection with its photos, keeping the input order.
pub(crate) async fn attach_photos(
    state: &AppState,
    inspections: Vec<Inspection>,
) -> AppResult<Vec<InspectionDetail>> {
    if inspections.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<DbId> = inspections.iter().map(|i| i.id).collect();
    let mut by_inspection: HashMap<DbId, Vec<InspectionPhoto>> = HashMap::new();
    for photo in InspectionPhotoRepo::list_for_inspections(&state.pool, &ids).await? {
        by_inspection
            .entry(photo.inspection_id)
            .or_default()
            .push(photo);
    }
    Ok(inspections
        .into_iter()
        .map(|inspection| InspectionDetail {
            photos: by_inspection.remove(&inspection.id).unwrap_or_default(),
            inspection,
        })
        .collect())
}

async fn load_detail(state: &AppState, inspection: Inspection) -> AppResult<InspectionDetail> {
    let photos = InspectionPhotoRepo::list_for_inspection(&state.pool, inspection.id).await?;
    Ok(InspectionDetail { inspection, photos })
}

/// POST /api/inspections
///
/// Multipart form. A pathology with a severity grade also rewrites the
/// asset's condition in the same transaction as the insert.
pub async fn create_inspection(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<InspectionDetail>)> {
    let mut form = FormData::read(&mut multipart).await?;

    let code = form.require("code")?.to_string();
    let asset_id: DbId = form
        .parse("asset_id")?
        .ok_or_else(|| AppError::BadRequest("Missing required field: asset_id".to_string()))?;
    let has_pathology = form
        .parse_bool("has_pathology")?
        .ok_or_else(|| AppError::BadRequest("Missing required field: has_pathology".to_string()))?;
    let location = form.require("location")?.to_string();
    let severity: Option<i32> = form.parse("severity")?;
    if let Some(severity) = severity {
        validate_score("severity", severity)?;
    }

    // Unparseable dates fall back to now.
    let inspection_date = form
        .text("inspection_date")
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    ensure_asset_exists(&state, asset_id).await?;
    if InspectionRepo::find_by_code(&state.pool, &code)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(format!(
            "Inspection code '{code}' already exists"
        )));
    }

    let input = CreateInspection {
        code,
        inspection_date,
        has_pathology,
        pathology_type: form.text("pathology_type").map(str::to_string),
        severity,
        location,
        observations: form.text("observations").map(str::to_string),
        asset_id,
    };

    let mut tx = state.pool.begin().await?;
    let inspection = InspectionRepo::create_in(&mut tx, &input).await?;
    if let (true, Some(severity)) = (has_pathology, severity) {
        let change = ConditionChange {
            condition_status: Some(status_for_severity(severity).to_string()),
            condition_score: Some(severity),
            last_inspection_date: Some(inspection.inspection_date),
        };
        AssetRepo::apply_condition_in(&mut tx, asset_id, &change).await?;
    }
    tx.commit().await?;

    let photo_dir = inspection_photo_dir(&state.config.upload_dir, inspection.id);
    let mut photos = Vec::new();
    for (index, upload) in form.take_files("photos").into_iter().enumerate() {
        let stored_name = inspection_photo_name(&inspection.code, index, &upload.file_name);
        let path = store_file(&photo_dir, &stored_name, &upload.data).await?;
        let photo = InspectionPhotoRepo::create(
            &state.pool,
            &CreateInspectionPhoto {
                file_path: path.to_string_lossy().into_owned(),
                file_name: upload.file_name,
                file_size: Some(upload.data.len() as i64),
                mime_type: upload.content_type,
                inspection_id: inspection.id,
            },
        )
        .await?;
        photos.push(photo);
    }

    tracing::info!(
        inspection_id = inspection.id,
        asset_id,
        has_pathology,
        photos = photos.len(),
        "Inspection recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(InspectionDetail { inspection, photos }),
    ))
}

/// GET /api/inspections
pub async fn list_inspections(
    State(state): State<AppState>,
    Query(params): Query<InspectionListParams>,
) -> AppResult<Json<Vec<InspectionDetail>>> {
    let (limit, offset) = page(params.skip, params.limit);
    let inspections = InspectionRepo::list(&state.pool, params.asset_id, limit, offset).await?;
    Ok(Json(attach_photos(&state, inspections).await?))
}

/// GET /api/inspections/{id}
pub async fn get_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<InspectionDetail>> {
    let inspection = InspectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(load_detail(&state, inspection).await?))
}

/// PUT|PATCH /api/inspections/{id}
///
/// `condition_status` is written to the owning asset.
pub async fn update_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInspection>,
) -> AppResult<Json<InspectionDetail>> {
    if let Some(severity) = input.severity {
        validate_score("severity", severity)?;
    }
    if let Some(status) = input.condition_status.as_deref() {
        validate_status(status)?;
    }

    let mut tx = state.pool.begin().await?;
    let inspection = InspectionRepo::update_in(&mut tx, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    if let Some(status) = input.condition_status.clone() {
        let change = ConditionChange {
            condition_status: Some(status),
            ..Default::default()
        };
        AssetRepo::apply_condition_in(&mut tx, inspection.asset_id, &change).await?;
    }
    tx.commit().await?;

    tracing::debug!(inspection_id = id, "Inspection updated");
    Ok(Json(load_detail(&state, inspection).await?))
}

/// DELETE /api/inspections/{id}
pub async fn delete_inspection(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    if !InspectionRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    let photo_dir = inspection_photo_dir(&state.config.upload_dir, id);
    if let Err(e) = tokio::fs::remove_dir_all(&photo_dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(inspection_id = id, error = %e, "Failed to remove inspection photos");
        }
    }

    tracing::info!(inspection_id = id, "Inspection deleted");
    Ok(Json(json!({ "message": "Inspection deleted" })))
}
