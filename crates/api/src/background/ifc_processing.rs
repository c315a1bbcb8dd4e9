//! Ingestion of uploaded IFC files.
//!
//! One task per upload. The task owns the file's status from `pending`
//! onwards; failures end up in `ifc_files.processing_error`.

use std::path::PathBuf;

use bimfm_core::types::DbId;
use bimfm_ifc::{process_ifc_file, ProcessingOutcome};
use sqlx::PgPool;
use tokio::task::JoinHandle;

/// Start processing `path` for file `file_id` in the background.
pub fn spawn(pool: PgPool, file_id: DbId, path: PathBuf) -> JoinHandle<ProcessingOutcome> {
    tracing::debug!(file_id, path = %path.display(), "Queueing IFC processing");
    tokio::spawn(async move {
        let outcome = process_ifc_file(&pool, file_id, &path).await;
        if let ProcessingOutcome::Failed(message) = &outcome {
            tracing::warn!(file_id, error = %message, "IFC file marked as error");
        }
        outcome
    })
}
