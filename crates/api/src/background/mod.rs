//! Long-lived background tasks spawned by the API binary.

pub mod export_retention;
