use axum::extract::State;
use axum::Json;
use bimfm_db::models::mir_requirement::MirRequirement;
use bimfm_db::repositories::MirRequirementRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/mir/requirements
///
/// The full catalog, ordered by requirement number.
pub async fn list_requirements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MirRequirement>>> {
    let requirements = MirRequirementRepo::list(&state.pool).await?;
    Ok(Json(requirements))
}
