//! Read access to the seeded `mir_requirements` catalog.

use sqlx::PgPool;

use crate::models::mir_requirement::MirRequirement;

const COLUMNS: &str = "\
    id, requirement_number, category, requirement_name, description, \
    is_mandatory, asset_field, created_at";

pub struct MirRequirementRepo;

impl MirRequirementRepo {
    /// Full catalog in requirement-number order.
    pub async fn list(pool: &PgPool) -> Result<Vec<MirRequirement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mir_requirements ORDER BY requirement_number");
        sqlx::query_as::<_, MirRequirement>(&query)
            .fetch_all(pool)
            .await
    }

    /// Requirements bound to an asset column.
    pub async fn list_bound_to_assets(pool: &PgPool) -> Result<Vec<MirRequirement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mir_requirements \
             WHERE asset_field IS NOT NULL ORDER BY requirement_number"
        );
        sqlx::query_as::<_, MirRequirement>(&query)
            .fetch_all(pool)
            .await
    }
}
