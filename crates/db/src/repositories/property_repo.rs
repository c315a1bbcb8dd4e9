//! Repository for `property_sets` and `properties`.

use bimfm_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::property::{
    AssetProperty, CreateProperty, CreatePropertySet, Property, PropertySet,
};

const SET_COLUMNS: &str = "id, name, description";

const COLUMNS: &str = "id, name, value, data_type, unit, property_set_id, asset_id";

pub struct PropertyRepo;

impl PropertyRepo {
    pub async fn create_set_in(
        conn: &mut PgConnection,
        input: &CreatePropertySet,
    ) -> Result<PropertySet, sqlx::Error> {
        let query = format!(
            "INSERT INTO property_sets (name, description) VALUES ($1, $2) \
             RETURNING {SET_COLUMNS}"
        );
        sqlx::query_as::<_, PropertySet>(&query)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .fetch_one(conn)
            .await
    }

    pub async fn create_in(
        conn: &mut PgConnection,
        input: &CreateProperty,
    ) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties (name, value, data_type, unit, property_set_id, asset_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(&input.name)
            .bind(input.value.as_deref())
            .bind(input.data_type.as_deref())
            .bind(input.unit.as_deref())
            .bind(input.property_set_id)
            .bind(input.asset_id)
            .fetch_one(conn)
            .await
    }

    /// Properties of one asset, grouped by set then name.
    pub async fn list_for_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> Result<Vec<AssetProperty>, sqlx::Error> {
        sqlx::query_as::<_, AssetProperty>(
            "SELECT p.id, p.name, p.value, p.data_type, p.unit, p.property_set_id, \
                ps.name AS property_set_name \
             FROM properties p \
             LEFT JOIN property_sets ps ON ps.id = p.property_set_id \
             WHERE p.asset_id = $1 \
             ORDER BY ps.name NULLS LAST, p.name, p.id",
        )
        .bind(asset_id)
        .fetch_all(pool)
        .await
    }
}
