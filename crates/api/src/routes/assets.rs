//! Route definitions for tracked assets.
//!
//! All routes are mounted under `/assets`.

use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// GET    /                  -> list_assets
/// POST   /                  -> create_asset
/// GET    /{id}              -> get_asset
/// PUT    /{id}              -> update_asset
/// PATCH  /{id}              -> update_asset
/// DELETE /{id}              -> delete_asset
/// GET    /{id}/inspections  -> list_asset_inspections
/// GET    /{id}/statistics   -> get_asset_statistics
/// GET    /{id}/properties   -> list_asset_properties
/// GET    /{id}/mir          -> get_asset_mir
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/inspections", get(assets::list_asset_inspections))
        .route("/{id}/statistics", get(assets::get_asset_statistics))
        .route("/{id}/properties", get(assets::list_asset_properties))
        .route("/{id}/mir", get(assets::get_asset_mir))
}
