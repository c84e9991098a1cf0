//! Input validation: reject bad paths before touching document internals.
//!
//! Validation runs at [`crate::extractor::MenuExtractor::open`] time, before
//! any parse attempt, so callers get an [`MenuScanError::InvalidInput`] with a
//! specific reason instead of a confusing parser error deep in the pipeline.
//! Checks run cheapest-first: path shape, existence, file type, extension,
//! size, readability.

use crate::error::MenuScanError;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Validate that `path` points to a usable PDF file.
///
/// Checks, in order:
/// 1. non-empty path
/// 2. file exists
/// 3. is a regular file (not a directory)
/// 4. `.pdf` extension (case-insensitive)
/// 5. size within `max_size_mb`
/// 6. non-zero size
/// 7. readable by this process
///
/// Returns `Ok(())` on success, otherwise [`MenuScanError::InvalidInput`]
/// naming the failed check.
pub fn validate_pdf_file(path: &Path, max_size_mb: u64) -> Result<(), MenuScanError> {
    let invalid = |reason: String| MenuScanError::InvalidInput {
        path: path.to_path_buf(),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(invalid("file path must be a non-empty string".into()));
    }

    if !path.exists() {
        return Err(invalid("file does not exist".into()));
    }

    if !path.is_file() {
        return Err(invalid("path is not a file".into()));
    }

    let extension_ok = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !extension_ok {
        return Err(invalid(format!(
            "file must have a .pdf extension, found: {:?}",
            path.extension().unwrap_or_default()
        )));
    }

    let size = path
        .metadata()
        .map_err(|e| invalid(format!("cannot read file metadata: {e}")))?
        .len();

    let max_bytes = max_size_mb * 1024 * 1024;
    if size > max_bytes {
        return Err(invalid(format!(
            "file size ({:.2} MB) exceeds maximum allowed size ({} MB)",
            size as f64 / (1024.0 * 1024.0),
            max_size_mb
        )));
    }

    if size == 0 {
        return Err(invalid("file is empty".into()));
    }

    // Opening is the portable readability check.
    File::open(path).map_err(|e| invalid(format!("file is not readable: {e}")))?;

    debug!(
        "PDF file validation passed: {} ({:.2} MB)",
        path.display(),
        size as f64 / (1024.0 * 1024.0)
    );
    Ok(())
}
