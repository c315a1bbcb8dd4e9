//! IFC model ingestion.
//!
//! [`extract::extract_model`] turns STEP text into product elements with
//! their property sets and spatial location; [`processor::process_ifc_file`]
//! writes them to the database as `ifc_elements` and tracked `assets`.

pub mod classify;
pub mod error;
pub mod extract;
pub mod processor;

pub use classify::should_create_asset;
pub use error::IfcError;
pub use extract::{extract_model, IfcModel, ProductElement};
pub use processor::{process_ifc_file, ProcessingOutcome, ProcessingSummary};
