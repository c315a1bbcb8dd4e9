//! Repository for the `ifc_elements` table.

use bimfm_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::ifc_element::{CreateIfcElement, IfcElement};

/// Column list for `ifc_elements` queries.
const COLUMNS: &str = "id, ifc_id, ifc_guid, ifc_type, name, ifc_data, ifc_file_id, asset_id";

pub struct IfcElementRepo;

impl IfcElementRepo {
    /// Insert unless an element with the same GUID already exists.
    ///
    /// Returns `None` on a GUID collision without aborting the transaction.
    pub async fn create_if_absent_in(
        conn: &mut PgConnection,
        input: &CreateIfcElement,
    ) -> Result<Option<IfcElement>, sqlx::Error> {
        let query = format!(
            "INSERT INTO ifc_elements \
                (ifc_id, ifc_guid, ifc_type, name, ifc_data, ifc_file_id, asset_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT ON CONSTRAINT uq_ifc_elements_ifc_guid DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IfcElement>(&query)
            .bind(input.ifc_id)
            .bind(&input.ifc_guid)
            .bind(&input.ifc_type)
            .bind(input.name.as_deref())
            .bind(input.ifc_data.as_ref())
            .bind(input.ifc_file_id)
            .bind(input.asset_id)
            .fetch_optional(conn)
            .await
    }

    /// Whether any element already carries `guid`.
    pub async fn guid_exists_in(conn: &mut PgConnection, guid: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM ifc_elements WHERE ifc_guid = $1)")
                .bind(guid)
                .fetch_one(conn)
                .await?;
        Ok(row.0)
    }

    /// Elements of one file in STEP order.
    pub async fn list_by_file(
        pool: &PgPool,
        ifc_file_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IfcElement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ifc_elements WHERE ifc_file_id = $1 \
             ORDER BY ifc_id, id LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, IfcElement>(&query)
            .bind(ifc_file_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_file(pool: &PgPool, ifc_file_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ifc_elements WHERE ifc_file_id = $1")
            .bind(ifc_file_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
