//! Handlers for IFC model uploads and their extracted content.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bimfm_core::error::CoreError;
use bimfm_core::types::DbId;
use bimfm_core::uploads::{ifc_dir, validate_ifc_filename};
use bimfm_db::models::asset::{Asset, AssetListParams};
use bimfm_db::models::ifc_element::IfcElement;
use bimfm_db::models::ifc_file::{CreateIfcFile, IfcFile};
use bimfm_db::repositories::{AssetRepo, IfcElementRepo, IfcFileRepo};
use serde_json::{json, Value};

use crate::background::ifc_processing;
use crate::error::{AppError, AppResult};
use crate::form::{store_file, unique_file_name, FormData};
use crate::query::PageParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "IfcFile",
        id,
    })
}

async fn ensure_file_exists(state: &AppState, id: DbId) -> AppResult<IfcFile> {
    IfcFileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/ifc/upload
///
/// Store the uploaded model under `<upload>/ifc/`, register it as
/// `pending`, and start processing in the background.
pub async fn upload_ifc_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<IfcFile>)> {
    let mut form = FormData::read(&mut multipart).await?;
    let file = form
        .take_files("file")
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    validate_ifc_filename(&file.file_name)?;

    let stored_name = unique_file_name(&file.file_name, "model.ifc");
    let path = store_file(&ifc_dir(&state.config.upload_dir), &stored_name, &file.data).await?;

    let project_name = std::path::Path::new(&file.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned());

    let record = IfcFileRepo::create(
        &state.pool,
        &CreateIfcFile {
            filename: file.file_name.clone(),
            file_path: path.to_string_lossy().into_owned(),
            file_size: Some(file.data.len() as i64),
            project_name,
        },
    )
    .await?;

    tracing::info!(
        file_id = record.id,
        filename = %record.filename,
        size = file.data.len(),
        "IFC file uploaded"
    );

    ifc_processing::spawn(state.pool.clone(), record.id, path);

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/ifc
pub async fn list_ifc_files(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<IfcFile>>> {
    let (limit, offset) = params.resolve();
    let files = IfcFileRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(files))
}

/// GET /api/ifc/{id}
pub async fn get_ifc_file(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<IfcFile>> {
    Ok(Json(ensure_file_exists(&state, id).await?))
}

/// DELETE /api/ifc/{id}
///
/// Removes the record (elements cascade, assets are unlinked) and the
/// stored model file.
pub async fn delete_ifc_file(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Value>> {
    let file = ensure_file_exists(&state, id).await?;

    if !IfcFileRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    if let Err(e) = tokio::fs::remove_file(&file.file_path).await {
        tracing::warn!(file_id = id, path = %file.file_path, error = %e, "Failed to remove stored IFC file");
    }

    tracing::info!(file_id = id, "IFC file deleted");
    Ok(Json(json!({ "message": "IFC file deleted" })))
}

/// GET /api/ifc/{id}/elements
pub async fn list_ifc_elements(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<IfcElement>>> {
    ensure_file_exists(&state, id).await?;
    let (limit, offset) = params.resolve();
    let elements = IfcElementRepo::list_by_file(&state.pool, id, limit, offset).await?;
    Ok(Json(elements))
}

/// GET /api/ifc/{id}/assets
pub async fn list_ifc_assets(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<Asset>>> {
    ensure_file_exists(&state, id).await?;
    let (limit, offset) = params.resolve();
    let filter = AssetListParams {
        ifc_file_id: Some(id),
        ..Default::default()
    };
    let assets = AssetRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(assets))
}
