//! Handlers for AI defect detection on inspection imagery.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, Query, State};
use axum::Json;
use bimfm_core::error::CoreError;
use bimfm_core::types::DbId;
use bimfm_core::uploads::{ai_input_dir, ai_results_dir, video_dir};
use bimfm_db::models::inspection::AiAnalysisUpdate;
use bimfm_db::repositories::InspectionRepo;
use bimfm_vision::{AnalysisResult, VideoAnalysis};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::form::{store_file, unique_file_name, FormData};
use crate::handlers::assets::ensure_asset_exists;
use crate::state::AppState;

/// Default frame sampling rate for video analysis.
const DEFAULT_VIDEO_FPS: f64 = 1.0;

/// Optional links for an analysis run, accepted in the query string or
/// as form fields. Form fields win.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    pub asset_id: Option<DbId>,
    pub inspection_id: Option<DbId>,
}

impl AnalyzeParams {
    fn merge_form(self, form: &FormData) -> AppResult<Self> {
        Ok(Self {
            asset_id: form.parse("asset_id")?.or(self.asset_id),
            inspection_id: form.parse("inspection_id")?.or(self.inspection_id),
        })
    }

    async fn validate(&self, state: &AppState) -> AppResult<()> {
        if let Some(asset_id) = self.asset_id {
            ensure_asset_exists(state, asset_id).await?;
        }
        if let Some(inspection_id) = self.inspection_id {
            InspectionRepo::find_by_id(&state.pool, inspection_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Inspection",
                    id: inspection_id,
                }))?;
        }
        Ok(())
    }
}

/// Store the run's outcome on the linked inspection, if any detections came back.
async fn record_on_inspection(
    state: &AppState,
    inspection_id: Option<DbId>,
    result: &AnalysisResult,
) -> AppResult<()> {
    let Some(inspection_id) = inspection_id else {
        return Ok(());
    };
    if result.detections.is_empty() {
        return Ok(());
    }
    let update = AiAnalysisUpdate {
        confidence: f64::from(result.confidence),
        mask_path: result.mask_path.clone(),
        heatmap_path: result.heatmap_path.clone(),
    };
    InspectionRepo::record_ai_analysis(&state.pool, inspection_id, &update).await?;
    tracing::info!(
        inspection_id,
        confidence = result.confidence,
        "AI analysis stored on inspection"
    );
    Ok(())
}

/// POST /api/ai/analyze
///
/// Runs the segmentation model over every uploaded image and returns
/// per-image detections with their mask, heatmap and overlay paths.
pub async fn analyze_images(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalysisResult>> {
    let mut form = FormData::read(&mut multipart).await?;
    let params = params.merge_form(&form)?;

    let uploads = form.take_files("images");
    if uploads.is_empty() {
        return Err(AppError::BadRequest("No images provided".to_string()));
    }
    params.validate(&state).await?;

    let input_dir = ai_input_dir(&state.config.upload_dir);
    let mut paths: Vec<PathBuf> = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        let name = unique_file_name(&upload.file_name, "image");
        paths.push(store_file(&input_dir, &name, &upload.data).await?);
    }

    let detector = state.detector().await?;
    let output_dir = ai_results_dir(&state.config.upload_dir);
    tracing::info!(images = paths.len(), inspection_id = ?params.inspection_id, "Starting AI analysis");

    let result = tokio::task::spawn_blocking(move || detector.analyze_images(&paths, &output_dir))
        .await
        .map_err(|e| AppError::Analysis(e.to_string()))?
        .map_err(|e| AppError::Analysis(e.to_string()))?;

    record_on_inspection(&state, params.inspection_id, &result).await?;
    Ok(Json(result))
}

/// POST /api/ai/analyze-video
///
/// Samples frames with ffmpeg at `fps` (default 1.0) and analyzes them.
pub async fn analyze_video(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> AppResult<Json<VideoAnalysis>> {
    let mut form = FormData::read(&mut multipart).await?;
    let params = params.merge_form(&form)?;
    let fps: f64 = form.parse("fps")?.unwrap_or(DEFAULT_VIDEO_FPS);
    if fps.is_nan() || fps <= 0.0 {
        return Err(AppError::BadRequest(format!(
            "fps must be positive, got {fps}"
        )));
    }

    let upload = form
        .take_files("video")
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest("No video provided".to_string()))?;
    params.validate(&state).await?;

    let videos = video_dir(&state.config.upload_dir);
    let name = unique_file_name(&upload.file_name, "video.mp4");
    let video_path = store_file(&videos, &name, &upload.data).await?;
    let frames_dir = videos.join(format!("{}_frames", uuid::Uuid::new_v4().simple()));

    let detector = state.detector().await?;
    let output_dir = ai_results_dir(&state.config.upload_dir);
    let outcome = detector
        .analyze_video(&video_path, &frames_dir, &output_dir, fps)
        .await;
    remove_frames(&frames_dir).await;
    let result = outcome.map_err(|e| AppError::Analysis(e.to_string()))?;

    tracing::info!(
        frames = result.frames_extracted,
        detections = result.analysis.detections.len(),
        "Video analysis finished"
    );

    record_on_inspection(&state, params.inspection_id, &result.analysis).await?;
    Ok(Json(result))
}

/// Sampled frames are scratch data; only the written outputs are kept.
async fn remove_frames(frames_dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(frames_dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(dir = %frames_dir.display(), error = %e, "Failed to remove extracted frames");
        }
    }
}
