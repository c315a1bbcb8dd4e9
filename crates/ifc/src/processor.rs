//! Persist an extracted model as `ifc_elements`, `assets` and properties.
//!
//! Elements are written in batches of [`BATCH_SIZE`], one transaction per
//! batch. Each element runs inside its own savepoint so a bad row is rolled
//! back and skipped without losing the rest of the batch.

use std::path::Path;

use bimfm_core::types::DbId;
use bimfm_db::models::asset::CreateAsset;
use bimfm_db::models::ifc_element::CreateIfcElement;
use bimfm_db::models::ifc_file::IfcFileHeader;
use bimfm_db::models::property::{CreateProperty, CreatePropertySet};
use bimfm_db::repositories::{AssetRepo, IfcElementRepo, IfcFileRepo, PropertyRepo};
use serde::Serialize;
use sqlx::{Connection, PgConnection, PgPool};

use crate::classify::should_create_asset;
use crate::error::IfcError;
use crate::extract::{extract_model, ProductElement};

/// Elements committed per transaction.
pub const BATCH_SIZE: usize = 100;

/// Counters reported once a file finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingSummary {
    pub elements_processed: i32,
    pub assets_created: i32,
    /// Elements whose GUID was already stored.
    pub duplicates_skipped: i32,
    /// Elements rolled back because a write failed.
    pub failures: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// The file was not `pending`; another run owns it or it already finished.
    Skipped,
    Completed(ProcessingSummary),
    /// The file is now in `error` with this message.
    Failed(String),
}

enum ElementWrite {
    Stored { asset_created: bool },
    Duplicate,
}

/// Process one uploaded file end to end.
///
/// Moves the file `pending -> processing -> completed`, or to `error` with
/// the failure message when reading, parsing or a batch commit fails.
pub async fn process_ifc_file(pool: &PgPool, file_id: DbId, path: &Path) -> ProcessingOutcome {
    match IfcFileRepo::mark_processing(pool, file_id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(file_id, "IFC file is not pending, skipping");
            return ProcessingOutcome::Skipped;
        }
        Err(e) => {
            tracing::error!(file_id, error = %e, "Failed to claim IFC file");
            return ProcessingOutcome::Failed(e.to_string());
        }
    }

    tracing::info!(file_id, path = %path.display(), "IFC processing started");

    match run(pool, file_id, path).await {
        Ok(summary) => match IfcFileRepo::mark_completed(pool, file_id).await {
            Ok(Some(_)) => {
                tracing::info!(
                    file_id,
                    elements = summary.elements_processed,
                    assets = summary.assets_created,
                    duplicates = summary.duplicates_skipped,
                    failures = summary.failures,
                    "IFC processing completed"
                );
                ProcessingOutcome::Completed(summary)
            }
            Ok(None) => {
                tracing::warn!(file_id, "IFC file left processing state before completion");
                ProcessingOutcome::Skipped
            }
            Err(e) => fail(pool, file_id, IfcError::Database(e)).await,
        },
        Err(e) => fail(pool, file_id, e).await,
    }
}

async fn fail(pool: &PgPool, file_id: DbId, error: IfcError) -> ProcessingOutcome {
    let message = error.to_string();
    tracing::error!(file_id, error = %message, "IFC processing failed");
    if let Err(e) = IfcFileRepo::mark_error(pool, file_id, &message).await {
        tracing::error!(file_id, error = %e, "Failed to record IFC processing error");
    }
    ProcessingOutcome::Failed(message)
}

async fn run(pool: &PgPool, file_id: DbId, path: &Path) -> Result<ProcessingSummary, IfcError> {
    let bytes = tokio::fs::read(path).await?;
    let model = tokio::task::spawn_blocking(move || {
        let content = String::from_utf8_lossy(&bytes);
        extract_model(&content)
    })
    .await
    .map_err(|e| IfcError::Task(e.to_string()))??;

    tracing::debug!(
        file_id,
        schema = ?model.schema,
        elements = model.elements.len(),
        "IFC model extracted"
    );

    {
        let mut conn = pool.acquire().await?;
        let header = IfcFileHeader {
            ifc_schema: model.schema.clone(),
            project_name: model.project_name.clone(),
            project_description: model.project_description.clone(),
        };
        IfcFileRepo::set_header_in(&mut conn, file_id, &header).await?;
    }

    let mut summary = ProcessingSummary::default();
    for batch in model.elements.chunks(BATCH_SIZE) {
        let mut tx = pool.begin().await?;
        let mut batch_elements = 0;
        let mut batch_assets = 0;

        for element in batch {
            let mut savepoint = Connection::begin(&mut *tx).await?;
            match store_element(&mut savepoint, file_id, element).await {
                Ok(ElementWrite::Stored { asset_created }) => {
                    savepoint.commit().await?;
                    batch_elements += 1;
                    if asset_created {
                        batch_assets += 1;
                    }
                }
                Ok(ElementWrite::Duplicate) => {
                    savepoint.rollback().await?;
                    summary.duplicates_skipped += 1;
                    tracing::warn!(
                        file_id,
                        guid = %element.guid,
                        ifc_type = element.ifc_type,
                        "Duplicate IFC GUID, skipping element"
                    );
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    summary.failures += 1;
                    tracing::warn!(
                        file_id,
                        ifc_id = element.ifc_id,
                        error = %e,
                        "Failed to store IFC element"
                    );
                }
            }
        }

        IfcFileRepo::add_progress_in(&mut tx, file_id, batch_elements, batch_assets).await?;
        tx.commit().await?;

        summary.elements_processed += batch_elements;
        summary.assets_created += batch_assets;
        tracing::debug!(
            file_id,
            elements_processed = summary.elements_processed,
            "IFC batch committed"
        );
    }

    Ok(summary)
}

async fn store_element(
    conn: &mut PgConnection,
    file_id: DbId,
    element: &ProductElement,
) -> Result<ElementWrite, sqlx::Error> {
    if IfcElementRepo::guid_exists_in(conn, &element.guid).await? {
        return Ok(ElementWrite::Duplicate);
    }

    let mut asset_id = None;
    if should_create_asset(element.ifc_type) {
        let input = CreateAsset {
            ifc_guid: element.guid.clone(),
            ifc_type: element.ifc_type.to_string(),
            name: element.name.clone(),
            description: element.description.clone(),
            location_building: element.building.clone(),
            location_floor: element.storey.clone(),
            ifc_file_id: Some(file_id),
            ..Default::default()
        };
        let Some(asset) = AssetRepo::create_if_absent_in(conn, &input).await? else {
            return Ok(ElementWrite::Duplicate);
        };
        store_properties(conn, asset.id, element).await?;
        asset_id = Some(asset.id);
    }

    let input = CreateIfcElement {
        ifc_id: i64::from(element.ifc_id),
        ifc_guid: element.guid.clone(),
        ifc_type: element.ifc_type.to_string(),
        name: element.name.clone(),
        ifc_data: Some(element.to_ifc_data()),
        ifc_file_id: file_id,
        asset_id,
    };
    match IfcElementRepo::create_if_absent_in(conn, &input).await? {
        Some(_) => Ok(ElementWrite::Stored {
            asset_created: asset_id.is_some(),
        }),
        None => Ok(ElementWrite::Duplicate),
    }
}

async fn store_properties(
    conn: &mut PgConnection,
    asset_id: DbId,
    element: &ProductElement,
) -> Result<(), sqlx::Error> {
    for pset in &element.property_sets {
        let set = PropertyRepo::create_set_in(
            conn,
            &CreatePropertySet {
                name: pset.name.clone(),
                description: None,
            },
        )
        .await?;

        for prop in &pset.properties {
            PropertyRepo::create_in(
                conn,
                &CreateProperty {
                    name: prop.name.clone(),
                    value: prop.value.clone(),
                    data_type: prop.value_type.clone(),
                    unit: prop.unit.clone(),
                    property_set_id: Some(set.id),
                    asset_id: Some(asset_id),
                },
            )
            .await?;
        }
    }
    Ok(())
}
