use axum::routing::get;
use axum::Router;

use crate::handlers::mir;
use crate::state::AppState;

/// MIR catalog routes mounted at `/mir`.
///
/// ```text
/// GET /requirements  -> list_requirements
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/requirements", get(mir::list_requirements))
}
