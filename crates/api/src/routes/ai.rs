//! Route definitions for AI defect detection.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// AI routes mounted at `/ai`.
///
/// ```text
/// POST /analyze        -> analyze_images (multipart images[])
/// POST /analyze-video  -> analyze_video (multipart video, fps)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(ai::analyze_images))
        .route("/analyze-video", post(ai::analyze_video))
}
