//! # menuscan
//!
//! Extract readable text from restaurant menu PDFs — digital or scanned —
//! into one normalized stream with page markers, ready for downstream
//! allergen and dietary analysis.
//!
//! ## Why this crate?
//!
//! Menus arrive in two flavours that need opposite handling: digitally
//! exported PDFs with a clean embedded text layer, and phone-photo or
//! flatbed scans with no text at all. Treating them the same either wastes
//! minutes of OCR on documents that do not need it, or silently returns an
//! empty string for the ones that do. menuscan makes the call per document:
//! it measures the embedded text, trusts it when the average
//! characters-per-page signal clears a threshold, and otherwise rasterizes
//! every page and runs Tesseract with image preprocessing.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Validate   path, extension, size, readability
//!  ├─ 2. Extract    per-page native text via lopdf (no pixels touched)
//!  ├─ 3. Detect     avg chars/page vs threshold (default 50)
//!  │       ├─ enough text ──▶ assemble native text, done
//!  │       └─ too little ──▼
//!  ├─ 4. Rasterize  all pages via pdftoppm (cached per pipeline)
//!  ├─ 5. Preprocess grayscale + contrast + sharpen
//!  ├─ 6. Recognize  tesseract per page, per-call timeout
//!  └─ 7. Assemble   text + `--- Page N ---` markers, bad pages inlined
//! ```
//!
//! Partial failure is the norm, not the exception: one unreadable page
//! becomes an inline marker (`--- Page 3 (OCR error) ---`) and every other
//! page still contributes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use menuscan::{process, ProcessingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProcessingConfig::default();
//!     let text = process("menu.pdf", &config).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! ## External tools
//!
//! The OCR path shells out to two system tools; the native path needs
//! neither.
//!
//! | Tool | Package | Used for |
//! |------|---------|----------|
//! | `pdftoppm` | poppler-utils | page rasterization |
//! | `tesseract` | tesseract-ocr | optical character recognition |
//!
//! Errors for a missing tool include per-platform install instructions.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extractor;
pub mod page;
pub mod pipeline;
pub mod process;
pub mod validate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessingConfig, ProcessingConfigBuilder};
pub use error::{MenuScanError, PageError};
pub use extractor::{MenuExtractor, MenuMetadata};
pub use page::PageOutcome;
pub use process::{process, ScanPipeline};
pub use validate::validate_pdf_file;
