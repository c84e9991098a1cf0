//! Pipeline stages for the OCR path.
//!
//! Each submodule implements exactly one transformation step, keeping every
//! stage independently testable and swappable.
//!
//! ## Data Flow
//!
//! ```text
//! raster ──▶ preprocess ──▶ ocr
//! (pdftoppm)  (grayscale,    (tesseract subprocess,
//!              contrast,      per-call timeout)
//!              sharpen)
//! ```
//!
//! 1. [`raster`]     — render every page to a bitmap via poppler's pdftoppm;
//!    the only stage that can fail for a missing rasterization toolchain
//! 2. [`preprocess`] — deterministic pixel transform before recognition;
//!    pure, no I/O
//! 3. [`ocr`]        — drive the Tesseract subprocess; the only stage with a
//!    timeout

pub mod ocr;
pub mod preprocess;
pub mod raster;
