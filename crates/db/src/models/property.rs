//! IFC property sets attached to assets.

use bimfm_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `property_sets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertySet {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub name: String,
    pub value: Option<String>,
    pub data_type: Option<String>,
    pub unit: Option<String>,
    pub property_set_id: Option<DbId>,
    pub asset_id: Option<DbId>,
}

/// A property joined with the name of its set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetProperty {
    pub id: DbId,
    pub name: String,
    pub value: Option<String>,
    pub data_type: Option<String>,
    pub unit: Option<String>,
    pub property_set_id: Option<DbId>,
    pub property_set_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePropertySet {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProperty {
    pub name: String,
    pub value: Option<String>,
    pub data_type: Option<String>,
    pub unit: Option<String>,
    pub property_set_id: Option<DbId>,
    pub asset_id: Option<DbId>,
}
