pub mod ai;
pub mod assets;
pub mod blender;
pub mod health;
pub mod ifc;
pub mod inspections;
pub mod mir;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ifc/upload                          upload model (POST, multipart)
/// /ifc                                 list files
/// /ifc/{id}                            get, delete
/// /ifc/{id}/elements                   extracted elements
/// /ifc/{id}/assets                     assets created from the file
///
/// /assets                              list, create
/// /assets/{id}                         get, update (PUT/PATCH), delete
/// /assets/{id}/inspections             inspections, newest first
/// /assets/{id}/statistics              inspection statistics
/// /assets/{id}/properties              IFC property values
/// /assets/{id}/mir                     MIR completeness
///
/// /inspections                         list, create (multipart)
/// /inspections/{id}                    get, update (PUT/PATCH), delete
///
/// /ai/analyze                          defect detection on images
/// /ai/analyze-video                    defect detection on video frames
///
/// /blender/sync                        to_blender / from_blender
/// /blender/{ifc_file_id}/blender-data  viewer data with condition colors
///
/// /mir/requirements                    MIR catalog
/// ```
///
/// Collection endpoints also answer with a trailing slash (`/assets/`),
/// which the web frontend uses.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // IFC model files and their extracted content.
        .nest("/ifc", ifc::router())
        .route("/ifc/", get(handlers::ifc::list_ifc_files))
        // Asset register, statistics and MIR completeness.
        .nest("/assets", assets::router())
        .route(
            "/assets/",
            get(handlers::assets::list_assets).post(handlers::assets::create_asset),
        )
        // Inspections with photos.
        .nest("/inspections", inspections::router())
        .route(
            "/inspections/",
            get(handlers::inspections::list_inspections)
                .post(handlers::inspections::create_inspection),
        )
        // AI defect detection.
        .nest("/ai", ai::router())
        // Blender add-on sync.
        .nest("/blender", blender::router())
        // MIR catalog.
        .nest("/mir", mir::router())
}
