//! Repository for the `ifc_files` table.

use bimfm_core::processing_status::{
    STATUS_COMPLETED, STATUS_ERROR, STATUS_PENDING, STATUS_PROCESSING,
};
use bimfm_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::ifc_file::{CreateIfcFile, IfcFile, IfcFileHeader};

/// Column list for `ifc_files` queries.
const COLUMNS: &str = "\
    id, filename, file_path, file_size, ifc_schema, \
    project_name, project_description, \
    processing_status, processing_error, elements_processed, assets_created, \
    uploaded_at, processed_at";

/// Provides CRUD and status operations for uploaded model files.
pub struct IfcFileRepo;

impl IfcFileRepo {
    /// Record an upload in the `pending` state.
    pub async fn create(pool: &PgPool, input: &CreateIfcFile) -> Result<IfcFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO ifc_files (filename, file_path, file_size, project_name, processing_status) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IfcFile>(&query)
            .bind(&input.filename)
            .bind(&input.file_path)
            .bind(input.file_size)
            .bind(input.project_name.as_deref())
            .bind(STATUS_PENDING)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IfcFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ifc_files WHERE id = $1");
        sqlx::query_as::<_, IfcFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List files, newest upload first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<IfcFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ifc_files ORDER BY uploaded_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, IfcFile>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Move a `pending` file to `processing`.
    ///
    /// Returns false if the file is gone or no longer pending.
    pub async fn mark_processing(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ifc_files SET processing_status = $2, processing_error = NULL \
             WHERE id = $1 AND processing_status = $3",
        )
        .bind(id)
        .bind(STATUS_PROCESSING)
        .bind(STATUS_PENDING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store schema and project data. A missing project name keeps the
    /// name given at upload.
    pub async fn set_header_in(
        conn: &mut PgConnection,
        id: DbId,
        header: &IfcFileHeader,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE ifc_files SET \
                ifc_schema = $2, \
                project_name = COALESCE($3, project_name), \
                project_description = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(header.ifc_schema.as_deref())
        .bind(header.project_name.as_deref())
        .bind(header.project_description.as_deref())
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Bump the running counters after a committed batch.
    pub async fn add_progress_in(
        conn: &mut PgConnection,
        id: DbId,
        elements: i32,
        assets: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE ifc_files SET \
                elements_processed = elements_processed + $2, \
                assets_created = assets_created + $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(elements)
        .bind(assets)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Mark processing finished and stamp `processed_at`.
    pub async fn mark_completed(pool: &PgPool, id: DbId) -> Result<Option<IfcFile>, sqlx::Error> {
        let query = format!(
            "UPDATE ifc_files SET processing_status = $2, processing_error = NULL, \
                processed_at = NOW() \
             WHERE id = $1 AND processing_status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IfcFile>(&query)
            .bind(id)
            .bind(STATUS_COMPLETED)
            .bind(STATUS_PROCESSING)
            .fetch_optional(pool)
            .await
    }

    /// Record a file-level failure.
    pub async fn mark_error(pool: &PgPool, id: DbId, message: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ifc_files SET processing_status = $2, processing_error = $3 \
             WHERE id = $1 AND processing_status IN ($4, $5)",
        )
        .bind(id)
        .bind(STATUS_ERROR)
        .bind(message)
        .bind(STATUS_PENDING)
        .bind(STATUS_PROCESSING)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a file record; its elements cascade and its assets are unlinked.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ifc_files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
