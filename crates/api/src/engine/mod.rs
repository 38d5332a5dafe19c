//! Orchestration layer between HTTP handlers and the domain crates.
//!
//! Contains page creation from blueprints, idempotency-gated archetype
//! application, and export creation/download/deletion.

pub mod archetypes;
pub mod exports;
pub mod pages;
