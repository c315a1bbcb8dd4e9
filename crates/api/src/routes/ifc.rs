//! Route definitions for IFC model files.
//!
//! All routes are mounted under `/ifc`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ifc;
use crate::state::AppState;

/// IFC file routes mounted at `/ifc`.
///
/// ```text
/// POST   /upload         -> upload_ifc_file
/// GET    /               -> list_ifc_files
/// GET    /{id}           -> get_ifc_file
/// DELETE /{id}           -> delete_ifc_file
/// GET    /{id}/elements  -> list_ifc_elements
/// GET    /{id}/assets    -> list_ifc_assets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(ifc::upload_ifc_file))
        .route("/", get(ifc::list_ifc_files))
        .route(
            "/{id}",
            get(ifc::get_ifc_file).delete(ifc::delete_ifc_file),
        )
        .route("/{id}/elements", get(ifc::list_ifc_elements))
        .route("/{id}/assets", get(ifc::list_ifc_assets))
}
