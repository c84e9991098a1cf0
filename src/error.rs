//! Error types for the menuscan library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MenuScanError`] — **Fatal**: processing cannot proceed at all
//!   (bad input path, corrupt document structure, missing external toolchain,
//!   OCR required but disabled). Returned as `Err(MenuScanError)` from the
//!   top-level operations.
//!
//! * [`PageError`] — **Non-fatal**: a single page failed (one page's text
//!   operators are broken, one OCR call errored or timed out) while the rest
//!   of the document is fine. A failed page is folded into the assembled text
//!   as an inline marker rather than aborting its siblings.
//!
//! The infrastructure-missing variants ([`MenuScanError::RasterizationUnavailable`],
//! [`MenuScanError::OcrUnavailable`]) carry installation hints in their display
//! strings: a missing poppler or tesseract install is the dominant real-world
//! failure mode for end users, not a programming error.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the menuscan library.
///
/// Page-level failures use [`PageError`] and are rendered as inline markers
/// in the assembled output rather than propagated here.
#[derive(Debug, Error)]
pub enum MenuScanError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input path failed validation before any parse attempt
    /// (missing file, wrong extension, too large, empty, unreadable).
    #[error("Invalid PDF file '{path}': {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The file passed validation but its PDF structure cannot be parsed.
    #[error("Corrupted or invalid PDF file '{path}': {detail}")]
    CorruptDocument { path: PathBuf, detail: String },

    // ── Toolchain errors ──────────────────────────────────────────────────
    /// The external rasterization tool (pdftoppm from poppler-utils) is
    /// not installed or not on PATH.
    #[error(
        "pdftoppm not found: {detail}\n\
         pdftoppm (poppler-utils) is required to rasterize PDF pages for OCR.\n\
         Install it with:\n  \
         Windows: choco install poppler\n  \
         Mac:     brew install poppler\n  \
         Linux:   apt-get install poppler-utils"
    )]
    RasterizationUnavailable { detail: String },

    /// The OCR engine binary cannot be located.
    #[error(
        "OCR engine '{engine}' not found: {detail}\n\
         Install Tesseract with:\n  \
         Windows: choco install tesseract\n  \
         Mac:     brew install tesseract\n  \
         Linux:   apt-get install tesseract-ocr\n\
         Or point the ocr_engine_path setting at an existing tesseract binary."
    )]
    OcrUnavailable { engine: String, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// OCR is required for this document but disabled in configuration.
    #[error("OCR is disabled in configuration but required for this document")]
    OcrDisabled,

    /// OCR ran but failed (engine error or per-call timeout).
    #[error("OCR processing failed: {detail}")]
    OcrFailed { detail: String },

    // ── Combined failure ──────────────────────────────────────────────────
    /// Both the native extraction path and the OCR fallback failed.
    #[error(
        "Failed to process PDF with both text extraction and OCR.\n\
         Text extraction: {native}\n\
         OCR fallback: {ocr}"
    )]
    ProcessingFailed { native: String, ocr: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Aggregation pattern-matches on this to choose the inline marker:
/// extraction failures render as `(extraction error)`, OCR failures and
/// timeouts render as `(OCR error)`. Siblings keep processing.
#[derive(Debug, Clone, Error)]
pub enum PageError {
    /// Native text extraction failed for this page.
    #[error("Page {page}: text extraction failed: {detail}")]
    Extraction { page: u32, detail: String },

    /// The OCR engine returned an error for this page.
    #[error("Page {page}: OCR failed: {detail}")]
    Ocr { page: u32, detail: String },

    /// The OCR call exceeded the per-call timeout for this page.
    #[error("Page {page}: OCR timed out after {secs}s")]
    Timeout { page: u32, secs: u64 },
}
