//! Route definitions for inspections.
//!
//! All routes are mounted under `/inspections`.

use axum::routing::get;
use axum::Router;

use crate::handlers::inspections;
use crate::state::AppState;

/// Inspection routes mounted at `/inspections`.
///
/// ```text
/// GET    /      -> list_inspections
/// POST   /      -> create_inspection (multipart)
/// GET    /{id}  -> get_inspection
/// PUT    /{id}  -> update_inspection
/// PATCH  /{id}  -> update_inspection
/// DELETE /{id}  -> delete_inspection
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inspections::list_inspections).post(inspections::create_inspection),
        )
        .route(
            "/{id}",
            get(inspections::get_inspection)
                .put(inspections::update_inspection)
                .patch(inspections::update_inspection)
                .delete(inspections::delete_inspection),
        )
}
