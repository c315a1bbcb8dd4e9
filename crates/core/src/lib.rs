//! Domain types and rules shared by the BIM-FM crates.
//!
//! Nothing in here touches the database or HTTP; repositories, the IFC
//! pipeline, and the API build on these types.

pub mod condition;
pub mod error;
pub mod ffmpeg;
pub mod mir;
pub mod processing_status;
pub mod search;
pub mod types;
pub mod uploads;
