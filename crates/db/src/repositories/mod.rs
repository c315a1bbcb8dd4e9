//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods suffixed `_in`
//! take a `&mut PgConnection` so callers can group them in a transaction.

pub mod asset_repo;
pub mod ifc_element_repo;
pub mod ifc_file_repo;
pub mod inspection_repo;
pub mod mir_requirement_repo;
pub mod property_repo;

pub use asset_repo::AssetRepo;
pub use ifc_element_repo::IfcElementRepo;
pub use ifc_file_repo::IfcFileRepo;
pub use inspection_repo::{InspectionPhotoRepo, InspectionRepo};
pub use mir_requirement_repo::MirRequirementRepo;
pub use property_repo::PropertyRepo;
