//! Theme file-set generation and archive packaging.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use seobuilder_core::error::CoreError;
use seobuilder_core::structure::PageStructure;
use seobuilder_core::theme;
use seobuilder_db::models::page::Page;
use seobuilder_db::models::project::Project;
use seobuilder_storage::StorageBackend;

/// Storage prefix under which staging directories and archives live.
const EXPORTS_PREFIX: &str = "exports";

/// Result of a successful packaging run.
#[derive(Debug, Clone)]
pub struct GeneratedTheme {
    /// Storage key of the finished archive.
    pub archive_path: String,
    /// Archive filename (the key's basename).
    pub archive_filename: String,
}

/// Render every page of `project` into a theme file-set, archive it, and
/// return the archive's storage path.
///
/// The staging directory name embeds the project id and a timestamp so
/// concurrent exports of the same project write to distinct directories.
/// The staging directory is removed after packaging, success or not; the
/// archive appears at its final key only once fully written.
pub async fn generate_theme(
    storage: &dyn StorageBackend,
    project: &Project,
    pages: &[Page],
) -> Result<GeneratedTheme, CoreError> {
    let theme_name = format!(
        "seobuilder-project-{}-{}",
        project.id,
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    );
    let theme_dir = format!("{EXPORTS_PREFIX}/{theme_name}");

    let result = write_and_archive(storage, project, pages, &theme_name, &theme_dir).await;

    // Staging scratch space must never leak, even when packaging failed.
    if let Err(e) = storage.delete_dir(&theme_dir).await {
        tracing::warn!(theme_dir = %theme_dir, error = %e, "Failed to remove staging directory");
    }

    result
}

async fn write_and_archive(
    storage: &dyn StorageBackend,
    project: &Project,
    pages: &[Page],
    theme_name: &str,
    theme_dir: &str,
) -> Result<GeneratedTheme, CoreError> {
    storage
        .make_dir(theme_dir)
        .await
        .map_err(|e| CoreError::Storage(e.to_string()))?;

    // The stylesheet must be written first: its metadata comment block is
    // what identifies the theme on the target platform.
    put(storage, &format!("{theme_dir}/style.css"), &theme::render_style(&project.name, theme_name)).await?;
    put(storage, &format!("{theme_dir}/header.php"), &theme::render_header(&project.name)).await?;
    put(storage, &format!("{theme_dir}/footer.php"), &theme::render_footer()).await?;
    put(storage, &format!("{theme_dir}/index.php"), &theme::render_index()).await?;

    if pages.is_empty() {
        put(
            storage,
            &format!("{theme_dir}/page-empty.php"),
            "<?php // No content defined for this page ?>",
        )
        .await?;
    }

    for page in pages {
        let structure = parse_structure(page);
        let content = theme::render_page(&page.title, structure.as_ref());
        put(storage, &format!("{theme_dir}/page-{}.php", page.slug), &content).await?;
    }

    let archive_filename = format!("{theme_name}.zip");
    let archive_path = format!("{EXPORTS_PREFIX}/{archive_filename}");

    let staged = storage
        .list(theme_dir)
        .await
        .map_err(|e| CoreError::Storage(e.to_string()))?;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut archive = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for key in &staged {
            let entry_name = key.rsplit('/').next().unwrap_or(key);
            let bytes = storage
                .get(key)
                .await
                .map_err(|e| CoreError::Storage(e.to_string()))?;
            archive
                .start_file(entry_name, options)
                .map_err(|e| CoreError::Storage(format!("Cannot add archive entry: {e}")))?;
            archive
                .write_all(&bytes)
                .map_err(|e| CoreError::Storage(format!("Cannot write archive entry: {e}")))?;
        }

        archive
            .finish()
            .map_err(|e| CoreError::Storage(format!("Cannot finalize archive: {e}")))?;
    }

    // Store the archive only after a clean finish so a half-written zip can
    // never be mistaken for a ready artifact.
    storage
        .put(&archive_path, &cursor.into_inner())
        .await
        .map_err(|e| CoreError::Storage(e.to_string()))?;

    tracing::info!(
        project_id = project.id,
        archive = %archive_path,
        files = staged.len(),
        "Theme package generated"
    );

    Ok(GeneratedTheme {
        archive_path,
        archive_filename,
    })
}

async fn put(storage: &dyn StorageBackend, key: &str, content: &str) -> Result<(), CoreError> {
    storage
        .put(key, content.as_bytes())
        .await
        .map_err(|e| CoreError::Storage(e.to_string()))
}

/// Parse a page's stored structure, degrading to `None` on malformed data
/// so a single corrupt page renders as its fallback body instead of
/// failing the whole export.
fn parse_structure(page: &Page) -> Option<PageStructure> {
    let value = page.page_structure.as_ref()?;
    match PageStructure::from_value(value) {
        Ok(structure) => Some(structure),
        Err(e) => {
            tracing::warn!(page_id = page.id, error = %e, "Skipping malformed page structure");
            None
        }
    }
}
