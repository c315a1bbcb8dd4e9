//! Background tasks spawned by request handlers.
//!
//! Each submodule provides a function that hands work to `tokio::spawn`
//! and returns immediately.

pub mod ifc_processing;
