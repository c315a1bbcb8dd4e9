//! Minimum Information Requirements (MIR) completeness.
//!
//! Each catalog requirement may name the asset column that satisfies it.
//! A requirement is met when that column holds a non-empty value in the
//! asset's JSON representation.

use serde::Serialize;
use serde_json::Value;

use crate::types::DbId;

/// Asset columns a requirement may be bound to.
pub const MIR_ASSET_FIELDS: &[&str] = &[
    "design_criteria",
    "design_standard",
    "manufacturer",
    "supplier",
    "model_number",
    "serial_number",
    "location_building",
    "location_floor",
    "location_room",
    "location_coordinates",
    "warranty_start_date",
    "warranty_end_date",
    "warranty_provider",
    "installation_date",
    "expected_life_span",
    "replacement_cost",
    "maintenance_cost",
    "spare_parts_list",
    "spare_parts_availability",
    "delivery_documentation",
];

/// Whether a JSON value counts as filled in.
///
/// `null`, blank strings, and empty arrays/objects do not.
pub fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

/// One requirement evaluated against one asset.
#[derive(Debug, Clone, Serialize)]
pub struct MirCheck {
    pub requirement_number: i32,
    pub category: String,
    pub requirement_name: String,
    pub asset_field: String,
    pub is_mandatory: bool,
    pub satisfied: bool,
}

/// Completeness summary returned by `GET /api/assets/{id}/mir`.
#[derive(Debug, Clone, Serialize)]
pub struct MirReport {
    pub asset_id: DbId,
    pub total: usize,
    pub satisfied: usize,
    pub completeness: f64,
    pub missing_mandatory: Vec<String>,
    pub requirements: Vec<MirCheck>,
}

impl MirReport {
    pub fn from_checks(asset_id: DbId, requirements: Vec<MirCheck>) -> Self {
        let total = requirements.len();
        let satisfied = requirements.iter().filter(|c| c.satisfied).count();
        let missing_mandatory = requirements
            .iter()
            .filter(|c| c.is_mandatory && !c.satisfied)
            .map(|c| c.asset_field.clone())
            .collect();
        let completeness = if total == 0 {
            100.0
        } else {
            // Two decimals.
            ((satisfied as f64 / total as f64) * 10_000.0).round() / 100.0
        };
        Self {
            asset_id,
            total,
            satisfied,
            completeness,
            missing_mandatory,
            requirements,
        }
    }
}
