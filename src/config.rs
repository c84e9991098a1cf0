//! Configuration for PDF processing.
//!
//! All processing behaviour is controlled through [`ProcessingConfig`], built
//! via its [`ProcessingConfigBuilder`]. The config is resolved once at
//! pipeline construction and passed by reference into both components; there
//! is no global lookup inside deep call paths and no reconfiguration mid-run.
//!
//! # Design choice: builder over constructor
//! Callers usually care about one or two knobs (language, DPI) and want
//! documented defaults for the rest. The builder keeps call sites readable
//! and survives new fields without breaking them.

use crate::error::MenuScanError;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for a processing run.
///
/// Built via [`ProcessingConfig::builder()`] or [`ProcessingConfig::default()`].
/// Immutable for the lifetime of a pipeline instance.
///
/// # Example
/// ```rust
/// use menuscan::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .ocr_language("deu")
///     .dpi(200)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingConfig {
    /// Whether OCR may be used at all. Default: true.
    ///
    /// When false, a document whose native text is judged insufficient is a
    /// hard failure ([`MenuScanError::OcrDisabled`]) — OCR is never silently
    /// skipped once it has been judged required.
    pub ocr_enabled: bool,

    /// Override path to the OCR engine binary. Default: None (use `tesseract`
    /// from PATH).
    pub ocr_engine_path: Option<PathBuf>,

    /// Tesseract language code passed to the engine. Default: `"eng"`.
    pub ocr_language: String,

    /// Minimum acceptable OCR confidence, 0.0–1.0. Default: 0.75.
    ///
    /// Currently informational: the stdout interface of the engine does not
    /// report per-run confidence, so this field is carried in the config and
    /// logged but not yet enforced.
    pub ocr_quality_threshold: f32,

    /// Scan-detection threshold in average characters per page. Default: 50.
    ///
    /// Documents whose average trimmed character count per page falls below
    /// this value are classified as scanned and routed to OCR. 50 chars is
    /// well below any real menu page but above the stray characters a
    /// scanner's embedded metadata layer produces.
    pub scan_threshold_chars: f64,

    /// Per-call OCR timeout in seconds. Default: 30.
    ///
    /// Enforced per page independently; a timed-out page becomes a per-page
    /// OCR failure, not a document-level abort.
    pub ocr_timeout_secs: u64,

    /// Rasterization resolution in DPI. Default: 150.
    ///
    /// 150 DPI keeps menu text sharp enough for Tesseract while holding a
    /// typical A4 page under 2 MP. Raise to 300 for small-print wine lists.
    pub dpi: u32,

    /// Maximum accepted input file size in megabytes. Default: 50.
    pub max_file_size_mb: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            ocr_engine_path: None,
            ocr_language: "eng".to_string(),
            ocr_quality_threshold: 0.75,
            scan_threshold_chars: 50.0,
            ocr_timeout_secs: 30,
            dpi: 150,
            max_file_size_mb: 50,
        }
    }
}

impl ProcessingConfig {
    /// Create a new builder for `ProcessingConfig`.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder {
            config: Self::default(),
        }
    }

    /// The OCR engine binary to invoke: the configured override, or
    /// `tesseract` resolved from PATH.
    pub fn ocr_engine(&self) -> PathBuf {
        self.ocr_engine_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("tesseract"))
    }
}

/// Builder for [`ProcessingConfig`].
#[derive(Debug)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    pub fn ocr_enabled(mut self, v: bool) -> Self {
        self.config.ocr_enabled = v;
        self
    }

    pub fn ocr_engine_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ocr_engine_path = Some(path.into());
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn ocr_quality_threshold(mut self, t: f32) -> Self {
        self.config.ocr_quality_threshold = t.clamp(0.0, 1.0);
        self
    }

    pub fn scan_threshold_chars(mut self, chars: f64) -> Self {
        self.config.scan_threshold_chars = chars.max(0.0);
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout_secs = secs.max(1);
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_file_size_mb(mut self, mb: u64) -> Self {
        self.config.max_file_size_mb = mb.max(1);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessingConfig, MenuScanError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(MenuScanError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.ocr_timeout_secs == 0 {
            return Err(MenuScanError::InvalidConfig(
                "OCR timeout must be ≥ 1 second".into(),
            ));
        }
        if c.ocr_language.is_empty() {
            return Err(MenuScanError::InvalidConfig(
                "OCR language code must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ProcessingConfig::default();
        assert!(c.ocr_enabled);
        assert_eq!(c.ocr_language, "eng");
        assert_eq!(c.scan_threshold_chars, 50.0);
        assert_eq!(c.ocr_timeout_secs, 30);
        assert_eq!(c.dpi, 150);
        assert_eq!(c.max_file_size_mb, 50);
        assert_eq!(c.ocr_quality_threshold, 0.75);
    }

    #[test]
    fn builder_clamps_out_of_range_values() {
        let c = ProcessingConfig::builder()
            .dpi(10_000)
            .ocr_timeout_secs(0)
            .ocr_quality_threshold(2.0)
            .build()
            .unwrap();
        assert_eq!(c.dpi, 600);
        assert_eq!(c.ocr_timeout_secs, 1);
        assert_eq!(c.ocr_quality_threshold, 1.0);
    }

    #[test]
    fn empty_language_is_rejected() {
        let err = ProcessingConfig::builder().ocr_language("").build();
        assert!(matches!(err, Err(MenuScanError::InvalidConfig(_))));
    }

    #[test]
    fn engine_defaults_to_path_lookup() {
        let c = ProcessingConfig::default();
        assert_eq!(c.ocr_engine(), PathBuf::from("tesseract"));

        let c = ProcessingConfig::builder()
            .ocr_engine_path("/usr/local/bin/tesseract")
            .build()
            .unwrap();
        assert_eq!(c.ocr_engine(), PathBuf::from("/usr/local/bin/tesseract"));
    }
}
