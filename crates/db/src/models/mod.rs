//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where
//!   the entity is editable

pub mod asset;
pub mod ifc_element;
pub mod ifc_file;
pub mod inspection;
pub mod mir_requirement;
pub mod property;
