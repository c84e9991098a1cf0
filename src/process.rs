//! Scan detection and top-level orchestration.
//!
//! [`ScanPipeline`] owns one document end to end: it asks the extractor for
//! per-page native text, judges whether the average characters-per-page
//! signal clears the configured threshold, and falls back to the
//! rasterize → preprocess → recognize path when it does not.
//!
//! ```text
//! Start ──▶ NativeAttempt ──▶ Sufficient ─────────────▶ Done
//!                │  │
//!                │  └─▶ Insufficient ─▶ OcrAttempt ──▶ Done / Failed
//!                └────▶ (error) ──────▶ OcrAttempt ──▶ Done / ProcessingFailed
//! ```
//!
//! "Insufficient text" (a business decision) and "extraction raised an
//! error" (an environment or document defect) converge on the same OCR
//! fallback but stay distinguishable: [`NativeOutcome`] keeps them as
//! separate variants, and they log differently. Rasterized pages are cached
//! on the instance, so detection and OCR never invoke the external
//! rasterizer twice; the cache dies with the pipeline.

use crate::config::ProcessingConfig;
use crate::error::{MenuScanError, PageError};
use crate::extractor::MenuExtractor;
use crate::page::{assemble_pages, PageOutcome};
use crate::pipeline::ocr::{self, OcrError};
use crate::pipeline::raster;
use image::DynamicImage;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

/// How the native extraction attempt ended.
enum NativeOutcome {
    /// Enough embedded text; OCR is skipped entirely.
    Sufficient(String),
    /// The document parsed but its text layer is too thin (or absent).
    Insufficient,
    /// Native extraction failed at the whole-document level.
    Failed(MenuScanError),
}

/// Process one menu PDF, choosing between native text extraction and OCR.
///
/// Owns the document handle and the rasterized-page cache exclusively; both
/// are released when the pipeline is dropped. Configuration is fixed at
/// construction.
pub struct ScanPipeline {
    extractor: MenuExtractor,
    config: ProcessingConfig,
    images: OnceCell<Vec<DynamicImage>>,
}

impl ScanPipeline {
    /// Open a pipeline for `path`, validating it first.
    pub fn new(path: impl Into<std::path::PathBuf>, config: ProcessingConfig) -> Result<Self, MenuScanError> {
        let extractor = MenuExtractor::open(path, &config)?;
        debug!(
            "Initialized pipeline (ocr_enabled={}, lang={}, threshold={} chars/page)",
            config.ocr_enabled, config.ocr_language, config.scan_threshold_chars
        );
        Ok(Self {
            extractor,
            config,
            images: OnceCell::new(),
        })
    }

    /// The underlying text extractor.
    pub fn extractor(&self) -> &MenuExtractor {
        &self.extractor
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Detect whether the document is image-based (scanned) vs text-based.
    ///
    /// The extractor's first-page heuristic short-circuits the cheap case;
    /// otherwise the average trimmed character count across all pages is
    /// compared against the configured threshold. A document yielding no
    /// pages, or any internal error, classifies as scanned — the
    /// conservative default that routes toward OCR rather than silently
    /// returning nothing.
    pub fn is_scanned(&self) -> bool {
        if self.extractor.is_text_based() {
            return false;
        }

        match self.extractor.extract_by_page() {
            Ok(pages) => {
                if pages.is_empty() {
                    return true;
                }
                let avg = average_chars_per_page(&pages);
                let scanned = avg < self.config.scan_threshold_chars;
                debug!(
                    "PDF scan detection: {avg:.1} chars/page -> {}",
                    if scanned { "scanned" } else { "text-based" }
                );
                scanned
            }
            Err(e) => {
                warn!("Error detecting if PDF is scanned: {e}");
                true
            }
        }
    }

    /// Rasterize every page at the configured DPI.
    ///
    /// The result is cached on this instance: repeat calls return the same
    /// images and the external rasterizer is invoked exactly once.
    pub async fn rasterize(&self) -> Result<&[DynamicImage], MenuScanError> {
        let images = self
            .images
            .get_or_try_init(|| async {
                raster::rasterize_pages(self.extractor.path(), self.config.dpi).await
            })
            .await?;

        debug!("Using {} rasterized pages", images.len());
        Ok(images.as_slice())
    }

    /// Run OCR on one page image with the configured language and timeout.
    pub async fn recognize(&self, image: &DynamicImage) -> Result<String, MenuScanError> {
        ocr::recognize(image, &self.config).await.map_err(Into::into)
    }

    /// Process the document: native extraction when the text layer is good
    /// enough, OCR otherwise.
    ///
    /// Returns the assembled text with page-break markers. Per-page failures
    /// on either path become inline markers; whole-document failures on both
    /// paths combine into [`MenuScanError::ProcessingFailed`].
    pub async fn process(&self) -> Result<String, MenuScanError> {
        info!("Attempting text extraction from PDF");

        // The typed per-page outcomes, not the by-page string mapping: a page
        // whose extraction errored must keep its error marker in the
        // assembled output, exactly as extract_text() renders it.
        let native = match self.extractor.page_outcomes() {
            Ok(outcomes) if outcomes.is_empty() => {
                warn!("No text extracted, treating as scanned PDF");
                NativeOutcome::Insufficient
            }
            Ok(outcomes) => {
                let avg = average_outcome_chars(&outcomes);
                if avg >= self.config.scan_threshold_chars {
                    info!("Text extraction successful: {avg:.1} chars/page");
                    NativeOutcome::Sufficient(assemble_pages(&outcomes))
                } else {
                    info!("Low text count ({avg:.1} chars/page), using OCR");
                    NativeOutcome::Insufficient
                }
            }
            Err(e) => {
                error!("Error processing PDF: {e}");
                NativeOutcome::Failed(e)
            }
        };

        match native {
            NativeOutcome::Sufficient(text) => Ok(text),
            NativeOutcome::Insufficient => self.process_with_ocr().await,
            NativeOutcome::Failed(native_err) => {
                info!("Attempting OCR as fallback");
                match self.process_with_ocr().await {
                    Ok(text) => Ok(text),
                    Err(ocr_err) => Err(MenuScanError::ProcessingFailed {
                        native: native_err.to_string(),
                        ocr: ocr_err.to_string(),
                    }),
                }
            }
        }
    }

    /// The OCR path: rasterize all pages, recognize each in order.
    ///
    /// Environment failures (OCR disabled, engine or rasterizer missing,
    /// unreadable document) abort; a single page's engine error or timeout
    /// becomes an inline marker and its siblings keep processing.
    async fn process_with_ocr(&self) -> Result<String, MenuScanError> {
        // Hard failure before any image work: OCR has already been judged
        // required by the caller, so "disabled" cannot be recovered.
        if !self.config.ocr_enabled {
            return Err(MenuScanError::OcrDisabled);
        }

        info!("Processing PDF with OCR");
        let images = self.rasterize().await?;
        ocr_pages(images, &self.config).await
    }
}

/// Run OCR over a sequence of page images, assembling the results.
///
/// A missing engine aborts; a single page's engine error or timeout becomes
/// an inline marker and its siblings keep processing.
async fn ocr_pages(
    images: &[DynamicImage],
    config: &ProcessingConfig,
) -> Result<String, MenuScanError> {
    let mut outcomes = Vec::with_capacity(images.len());
    for (idx, image) in images.iter().enumerate() {
        let page_num = (idx + 1) as u32;
        match ocr::recognize(image, config).await {
            Ok(text) => {
                debug!("OCR completed for page {page_num}");
                outcomes.push((page_num, PageOutcome::from_text(text)));
            }
            Err(OcrError::Disabled) => return Err(MenuScanError::OcrDisabled),
            Err(e @ OcrError::Unavailable { .. }) => return Err(e.into()),
            Err(OcrError::TimedOut { secs }) => {
                warn!("OCR timed out for page {page_num} after {secs}s");
                outcomes.push((
                    page_num,
                    PageOutcome::Failed(PageError::Timeout {
                        page: page_num,
                        secs,
                    }),
                ));
            }
            Err(OcrError::Failed { detail }) => {
                error!("OCR failed for page {page_num}: {detail}");
                outcomes.push((
                    page_num,
                    PageOutcome::Failed(PageError::Ocr {
                        page: page_num,
                        detail,
                    }),
                ));
            }
        }
    }

    let result = assemble_pages(&outcomes);
    info!("OCR processing complete: {} characters extracted", result.len());
    Ok(result)
}

impl std::fmt::Debug for ScanPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPipeline")
            .field("path", &self.extractor.path())
            .field("config", &self.config)
            .field("rasterized", &self.images.initialized())
            .finish()
    }
}

/// Convenience wrapper: open a pipeline for `path` and process it.
pub async fn process(
    path: impl AsRef<Path>,
    config: &ProcessingConfig,
) -> Result<String, MenuScanError> {
    ScanPipeline::new(path.as_ref(), config.clone())?.process().await
}

/// Average trimmed character count per page.
fn average_chars_per_page(pages: &BTreeMap<u32, String>) -> f64 {
    if pages.is_empty() {
        return 0.0;
    }
    let total: usize = pages.values().map(|t| t.trim().chars().count()).sum();
    total as f64 / pages.len() as f64
}

/// Average trimmed character count per page, over typed outcomes.
///
/// Empty and failed pages count as zero, biasing borderline documents toward
/// the OCR path.
fn average_outcome_chars(outcomes: &[(u32, PageOutcome)]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let total: usize = outcomes
        .iter()
        .map(|(_, outcome)| match outcome {
            PageOutcome::Text(text) => text.trim().chars().count(),
            PageOutcome::Empty | PageOutcome::Failed(_) => 0,
        })
        .sum();
    total as f64 / outcomes.len() as f64
}
