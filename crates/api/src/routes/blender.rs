//! Route definitions for the Blender add-on.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::blender;
use crate::state::AppState;

/// Blender routes mounted at `/blender`.
///
/// ```text
/// POST /sync                        -> sync
/// GET  /{ifc_file_id}/blender-data  -> blender_data
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sync", post(blender::sync))
        .route("/{ifc_file_id}/blender-data", get(blender::blender_data))
}
