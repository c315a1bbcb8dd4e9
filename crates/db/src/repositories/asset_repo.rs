//! Repository for the `assets` table.

use bimfm_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::models::asset::{Asset, AssetListParams, ConditionChange, CreateAsset, UpdateAsset};

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, ifc_guid, ifc_type, name, description, \
    design_criteria, design_standard, \
    manufacturer, supplier, model_number, serial_number, \
    location_building, location_floor, location_room, location_coordinates, \
    warranty_start_date, warranty_end_date, warranty_provider, \
    installation_date, expected_life_span, replacement_cost, maintenance_cost, \
    spare_parts_list, spare_parts_availability, delivery_documentation, \
    condition_status, condition_score, last_inspection_date, \
    ifc_file_id, created_at, updated_at";

/// Insert column list, bound as `$1..$27` by [`bind_create`].
const INSERT_COLUMNS: &str = "\
    ifc_guid, ifc_type, name, description, \
    design_criteria, design_standard, \
    manufacturer, supplier, model_number, serial_number, \
    location_building, location_floor, location_room, location_coordinates, \
    warranty_start_date, warranty_end_date, warranty_provider, \
    installation_date, expected_life_span, replacement_cost, maintenance_cost, \
    spare_parts_list, spare_parts_availability, delivery_documentation, \
    condition_status, condition_score, ifc_file_id";

const INSERT_VALUES: &str = "\
    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27";

fn bind_create<'q>(
    q: QueryAs<'q, Postgres, Asset, PgArguments>,
    input: &'q CreateAsset,
) -> QueryAs<'q, Postgres, Asset, PgArguments> {
    q.bind(&input.ifc_guid)
        .bind(&input.ifc_type)
        .bind(input.name.as_deref())
        .bind(input.description.as_deref())
        .bind(input.design_criteria.as_deref())
        .bind(input.design_standard.as_deref())
        .bind(input.manufacturer.as_deref())
        .bind(input.supplier.as_deref())
        .bind(input.model_number.as_deref())
        .bind(input.serial_number.as_deref())
        .bind(input.location_building.as_deref())
        .bind(input.location_floor.as_deref())
        .bind(input.location_room.as_deref())
        .bind(input.location_coordinates.as_ref())
        .bind(input.warranty_start_date)
        .bind(input.warranty_end_date)
        .bind(input.warranty_provider.as_deref())
        .bind(input.installation_date)
        .bind(input.expected_life_span)
        .bind(input.replacement_cost)
        .bind(input.maintenance_cost)
        .bind(input.spare_parts_list.as_ref())
        .bind(input.spare_parts_availability.as_deref())
        .bind(input.delivery_documentation.as_ref())
        .bind(input.condition_status.as_deref())
        .bind(input.condition_score)
        .bind(input.ifc_file_id)
}

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::create_in(&mut conn, input).await
    }

    pub async fn create_in(
        conn: &mut PgConnection,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets ({INSERT_COLUMNS}) VALUES ({INSERT_VALUES}) \
             RETURNING {COLUMNS}"
        );
        bind_create(sqlx::query_as::<_, Asset>(&query), input)
            .fetch_one(conn)
            .await
    }

    /// Insert unless an asset with the same GUID already exists.
    ///
    /// Returns `None` on a GUID collision; the surrounding transaction stays
    /// usable.
    pub async fn create_if_absent_in(
        conn: &mut PgConnection,
        input: &CreateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets ({INSERT_COLUMNS}) VALUES ({INSERT_VALUES}) \
             ON CONFLICT ON CONSTRAINT uq_assets_ifc_guid DO NOTHING \
             RETURNING {COLUMNS}"
        );
        bind_create(sqlx::query_as::<_, Asset>(&query), input)
            .fetch_optional(conn)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_guid(pool: &PgPool, guid: &str) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE ifc_guid = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(guid)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_serial(
        pool: &PgPool,
        serial_number: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE serial_number = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(serial_number)
            .fetch_optional(pool)
            .await
    }

    /// Find the asset with `guid` that came from model file `ifc_file_id`.
    pub async fn find_by_guid_in_file(
        pool: &PgPool,
        ifc_file_id: DbId,
        guid: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM assets WHERE ifc_file_id = $1 AND ifc_guid = $2");
        sqlx::query_as::<_, Asset>(&query)
            .bind(ifc_file_id)
            .bind(guid)
            .fetch_optional(pool)
            .await
    }

    /// List assets with optional filters, ordered by ID.
    pub async fn list(
        pool: &PgPool,
        params: &AssetListParams,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.ifc_file_id.is_some() {
            conditions.push(format!("ifc_file_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.condition_status.is_some() {
            conditions.push(format!("condition_status = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM assets {where_clause} \
             ORDER BY id LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Asset>(&query);
        if let Some(file_id) = params.ifc_file_id {
            q = q.bind(file_id);
        }
        if let Some(ref status) = params.condition_status {
            q = q.bind(status);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Every asset created from one model file, ordered by ID.
    pub async fn list_all_by_file(
        pool: &PgPool,
        ifc_file_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE ifc_file_id = $1 ORDER BY id");
        sqlx::query_as::<_, Asset>(&query)
            .bind(ifc_file_id)
            .fetch_all(pool)
            .await
    }

    /// Update an existing asset. Returns `None` if the ID does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                design_criteria = COALESCE($4, design_criteria), \
                design_standard = COALESCE($5, design_standard), \
                manufacturer = COALESCE($6, manufacturer), \
                supplier = COALESCE($7, supplier), \
                model_number = COALESCE($8, model_number), \
                serial_number = COALESCE($9, serial_number), \
                location_building = COALESCE($10, location_building), \
                location_floor = COALESCE($11, location_floor), \
                location_room = COALESCE($12, location_room), \
                location_coordinates = COALESCE($13, location_coordinates), \
                warranty_start_date = COALESCE($14, warranty_start_date), \
                warranty_end_date = COALESCE($15, warranty_end_date), \
                warranty_provider = COALESCE($16, warranty_provider), \
                installation_date = COALESCE($17, installation_date), \
                expected_life_span = COALESCE($18, expected_life_span), \
                replacement_cost = COALESCE($19, replacement_cost), \
                maintenance_cost = COALESCE($20, maintenance_cost), \
                spare_parts_list = COALESCE($21, spare_parts_list), \
                spare_parts_availability = COALESCE($22, spare_parts_availability), \
                delivery_documentation = COALESCE($23, delivery_documentation), \
                condition_status = COALESCE($24, condition_status), \
                condition_score = COALESCE($25, condition_score) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.design_criteria.as_deref())
            .bind(input.design_standard.as_deref())
            .bind(input.manufacturer.as_deref())
            .bind(input.supplier.as_deref())
            .bind(input.model_number.as_deref())
            .bind(input.serial_number.as_deref())
            .bind(input.location_building.as_deref())
            .bind(input.location_floor.as_deref())
            .bind(input.location_room.as_deref())
            .bind(input.location_coordinates.as_ref())
            .bind(input.warranty_start_date)
            .bind(input.warranty_end_date)
            .bind(input.warranty_provider.as_deref())
            .bind(input.installation_date)
            .bind(input.expected_life_span)
            .bind(input.replacement_cost)
            .bind(input.maintenance_cost)
            .bind(input.spare_parts_list.as_ref())
            .bind(input.spare_parts_availability.as_deref())
            .bind(input.delivery_documentation.as_ref())
            .bind(input.condition_status.as_deref())
            .bind(input.condition_score)
            .fetch_optional(pool)
            .await
    }

    /// Write condition fields. Unset fields are left as they are.
    pub async fn apply_condition(
        pool: &PgPool,
        id: DbId,
        change: &ConditionChange,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::apply_condition_in(&mut conn, id, change).await
    }

    pub async fn apply_condition_in(
        conn: &mut PgConnection,
        id: DbId,
        change: &ConditionChange,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                condition_status = COALESCE($2, condition_status), \
                condition_score = COALESCE($3, condition_score), \
                last_inspection_date = COALESCE($4, last_inspection_date) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(change.condition_status.as_deref())
            .bind(change.condition_score)
            .bind(change.last_inspection_date)
            .fetch_optional(conn)
            .await
    }

    /// Delete an asset by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM assets WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
