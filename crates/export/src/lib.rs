//! Static theme export engine.
//!
//! Renders a project's pages into a WordPress theme file-set, packages it
//! as a zip archive in storage, and manages the export record lifecycle
//! (`pending → processing → ready | failed`) including staleness detection
//! and housekeeping.

pub mod job;
pub mod lifecycle;
pub mod packager;

pub use packager::{generate_theme, GeneratedTheme};
