//! Repositories for `inspections` and `inspection_photos`.

use std::collections::BTreeMap;

use bimfm_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::inspection::{
    AiAnalysisUpdate, CreateInspection, CreateInspectionPhoto, Inspection, InspectionPhoto,
    InspectionTotals, UpdateInspection,
};

/// Column list for `inspections` queries.
const COLUMNS: &str = "\
    id, code, inspection_date, has_pathology, pathology_type, severity, \
    location, observations, \
    ai_analysis_performed, ai_confidence, ai_detection_mask_path, ai_heatmap_path, \
    asset_id, created_at, updated_at";

/// Column list for `inspection_photos` queries.
const PHOTO_COLUMNS: &str = "\
    id, file_path, file_name, file_size, mime_type, inspection_id, uploaded_at";

/// Provides CRUD operations for inspections.
pub struct InspectionRepo;

impl InspectionRepo {
    /// Insert an inspection. Severity is dropped unless a pathology was found.
    pub async fn create_in(
        conn: &mut PgConnection,
        input: &CreateInspection,
    ) -> Result<Inspection, sqlx::Error> {
        let severity = if input.has_pathology {
            input.severity
        } else {
            None
        };
        let query = format!(
            "INSERT INTO inspections \
                (code, inspection_date, has_pathology, pathology_type, severity, \
                 location, observations, asset_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(&input.code)
            .bind(input.inspection_date)
            .bind(input.has_pathology)
            .bind(input.pathology_type.as_deref())
            .bind(severity)
            .bind(&input.location)
            .bind(input.observations.as_deref())
            .bind(input.asset_id)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Inspection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE id = $1");
        sqlx::query_as::<_, Inspection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Inspection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspections WHERE code = $1");
        sqlx::query_as::<_, Inspection>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List inspections, newest inspection date first.
    pub async fn list(
        pool: &PgPool,
        asset_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Inspection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections \
             WHERE ($1::BIGINT IS NULL OR asset_id = $1) \
             ORDER BY inspection_date DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(asset_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every inspection of one asset, newest first.
    pub async fn list_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<Inspection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections WHERE asset_id = $1 \
             ORDER BY inspection_date DESC, id DESC"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    /// Inspections of every asset that came from one model file.
    pub async fn list_for_file(
        pool: &PgPool,
        ifc_file_id: DbId,
    ) -> Result<Vec<Inspection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspections \
             WHERE asset_id IN (SELECT id FROM assets WHERE ifc_file_id = $1) \
             ORDER BY inspection_date DESC, id DESC"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(ifc_file_id)
            .fetch_all(pool)
            .await
    }

    /// Update observations and severity. Returns `None` if the ID does not exist.
    ///
    /// Severity stays null on inspections without a pathology.
    pub async fn update_in(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateInspection,
    ) -> Result<Option<Inspection>, sqlx::Error> {
        let query = format!(
            "UPDATE inspections SET \
                observations = COALESCE($2, observations), \
                severity = CASE WHEN has_pathology THEN COALESCE($3, severity) END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(id)
            .bind(input.observations.as_deref())
            .bind(input.severity)
            .fetch_optional(conn)
            .await
    }

    /// Store the outcome of an AI analysis run.
    pub async fn record_ai_analysis(
        pool: &PgPool,
        id: DbId,
        result: &AiAnalysisUpdate,
    ) -> Result<Option<Inspection>, sqlx::Error> {
        let query = format!(
            "UPDATE inspections SET \
                ai_analysis_performed = TRUE, \
                ai_confidence = $2, \
                ai_detection_mask_path = $3, \
                ai_heatmap_path = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Inspection>(&query)
            .bind(id)
            .bind(result.confidence)
            .bind(result.mask_path.as_deref())
            .bind(result.heatmap_path.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete an inspection by ID. Photos cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inspections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn totals_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<InspectionTotals, sqlx::Error> {
        sqlx::query_as::<_, InspectionTotals>(
            "SELECT COUNT(*) AS total_inspections, \
                COUNT(*) FILTER (WHERE has_pathology) AS inspections_with_pathology, \
                MAX(inspection_date) AS latest_inspection_date \
             FROM inspections WHERE asset_id = $1",
        )
        .bind(asset_id)
        .fetch_one(pool)
        .await
    }

    /// Count of inspections per recorded severity.
    pub async fn severity_distribution(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<BTreeMap<i32, i64>, sqlx::Error> {
        let rows: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT severity, COUNT(*) FROM inspections \
             WHERE asset_id = $1 AND severity IS NOT NULL \
             GROUP BY severity ORDER BY severity",
        )
        .bind(asset_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}

/// Provides insert and lookup for inspection photos.
pub struct InspectionPhotoRepo;

impl InspectionPhotoRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateInspectionPhoto,
    ) -> Result<InspectionPhoto, sqlx::Error> {
        let query = format!(
            "INSERT INTO inspection_photos \
                (file_path, file_name, file_size, mime_type, inspection_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PHOTO_COLUMNS}"
        );
        sqlx::query_as::<_, InspectionPhoto>(&query)
            .bind(&input.file_path)
            .bind(&input.file_name)
            .bind(input.file_size)
            .bind(input.mime_type.as_deref())
            .bind(input.inspection_id)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_inspection(
        pool: &PgPool,
        inspection_id: DbId,
    ) -> Result<Vec<InspectionPhoto>, sqlx::Error> {
        let query = format!(
            "SELECT {PHOTO_COLUMNS} FROM inspection_photos \
             WHERE inspection_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, InspectionPhoto>(&query)
            .bind(inspection_id)
            .fetch_all(pool)
            .await
    }

    /// Photos for a batch of inspections in one round trip.
    pub async fn list_for_inspections(
        pool: &PgPool,
        inspection_ids: &[DbId],
    ) -> Result<Vec<InspectionPhoto>, sqlx::Error> {
        let query = format!(
            "SELECT {PHOTO_COLUMNS} FROM inspection_photos \
             WHERE inspection_id = ANY($1) ORDER BY inspection_id, id"
        );
        sqlx::query_as::<_, InspectionPhoto>(&query)
            .bind(inspection_ids)
            .fetch_all(pool)
            .await
    }
}
