//! Rasterization: convert every PDF page to an in-memory bitmap.
//!
//! ## Why shell out to pdftoppm?
//!
//! Rendering page pixels needs a full PDF imaging model; poppler's `pdftoppm`
//! is the battle-tested implementation every OCR toolchain builds on, and it
//! is already a hard prerequisite on machines that run Tesseract. Missing
//! poppler is therefore an *expected operational failure*, and the error for
//! it ([`MenuScanError::RasterizationUnavailable`]) carries install
//! instructions rather than a bare OS error.
//!
//! Pages are written as PNGs into a [`TempDir`] (cleaned up on drop, even on
//! panic) and decoded into [`DynamicImage`]s inside `spawn_blocking`, since
//! PNG decode of full pages is CPU-bound work that should stay off the async
//! workers.

use crate::error::MenuScanError;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

/// Rasterize every page of `pdf_path` at the given resolution.
///
/// Returns one image per page, in page order.
pub async fn rasterize_pages(pdf_path: &Path, dpi: u32) -> Result<Vec<DynamicImage>, MenuScanError> {
    info!("Converting PDF to images at {dpi} DPI");

    let temp_dir = TempDir::new().map_err(|e| MenuScanError::Internal(e.to_string()))?;
    let output_prefix = temp_dir.path().join("page");

    let output = Command::new("pdftoppm")
        .arg("-png")
        .arg("-r")
        .arg(dpi.to_string())
        .arg(pdf_path)
        .arg(&output_prefix)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MenuScanError::RasterizationUnavailable {
                    detail: e.to_string(),
                }
            } else {
                MenuScanError::Internal(format!("Failed to run pdftoppm: {e}"))
            }
        })?;

    if !output.status.success() {
        // pdftoppm refuses documents whose page tree it cannot walk.
        return Err(MenuScanError::CorruptDocument {
            path: pdf_path.to_path_buf(),
            detail: format!(
                "pdftoppm failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let mut page_files = collect_page_files(temp_dir.path())?;
    page_files.sort();

    if page_files.is_empty() {
        return Err(MenuScanError::CorruptDocument {
            path: pdf_path.to_path_buf(),
            detail: "pdftoppm produced no page images".into(),
        });
    }

    let images = tokio::task::spawn_blocking(move || {
        let images = page_files
            .iter()
            .map(|path| {
                image::open(path).map_err(|e| {
                    MenuScanError::Internal(format!(
                        "Failed to decode rendered page {}: {e}",
                        path.display()
                    ))
                })
            })
            .collect::<Result<Vec<DynamicImage>, MenuScanError>>();
        // temp_dir moved into the closure so the PNGs outlive the decode loop
        drop(temp_dir);
        images
    })
    .await
    .map_err(|e| MenuScanError::Internal(format!("Image decode task panicked: {e}")))??;

    info!("Converted {} pages to images", images.len());
    Ok(images)
}

/// List the PNG files pdftoppm wrote into `dir`.
///
/// pdftoppm zero-pads page numbers (`page-01.png`, `page-02.png`, …) so a
/// lexicographic sort restores page order.
fn collect_page_files(dir: &Path) -> Result<Vec<PathBuf>, MenuScanError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| MenuScanError::Internal(format!("Failed to list rendered pages: {e}")))?;

    let files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "png").unwrap_or(false))
        .collect();

    debug!("pdftoppm wrote {} page images", files.len());
    Ok(files)
}
