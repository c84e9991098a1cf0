//! Native text extraction: pull embedded text from a PDF without rendering
//! a single pixel.
//!
//! ## Why lopdf?
//!
//! The extractor needs an *owned* document handle it can open lazily on first
//! structural access and keep cached for the instance's lifetime.
//! [`lopdf::Document`] is a plain owned value, so a `OnceCell` gives us
//! "parsed at most once per instance" for free — no manual close in the
//! common path, release happens when the extractor is dropped.
//!
//! Per-page failures never escape this module as errors: a page whose
//! content stream cannot be decoded becomes a [`PageOutcome::Failed`] (or an
//! empty string in the by-page mapping), and every sibling page is still
//! processed. Only whole-document failures — a path that fails validation,
//! a structure lopdf cannot parse — surface as [`MenuScanError`].

use crate::config::ProcessingConfig;
use crate::error::{MenuScanError, PageError};
use crate::page::{assemble_pages, PageOutcome};
use crate::validate::validate_pdf_file;
use lopdf::{Dictionary, Document, Object};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lightweight document metadata: raw strings straight from the PDF info
/// dictionary (not parsed), defaulted to empty when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuMetadata {
    pub title: String,
    pub author: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
    pub page_count: usize,
    pub file_size: u64,
}

/// Extracts embedded text, page by page, from a validated menu PDF.
///
/// Construction validates the path but does not parse document structure;
/// that happens on the first structural access and is cached afterwards.
pub struct MenuExtractor {
    path: PathBuf,
    doc: OnceCell<Document>,
    metadata: OnceCell<MenuMetadata>,
}

impl MenuExtractor {
    /// Open an extractor for `path`.
    ///
    /// Runs the full input validation (existence, regular file, `.pdf`
    /// extension, size limit, non-empty, readable) and fails with
    /// [`MenuScanError::InvalidInput`] before touching document internals.
    pub fn open(path: impl Into<PathBuf>, config: &ProcessingConfig) -> Result<Self, MenuScanError> {
        let path = path.into();
        validate_pdf_file(&path, config.max_file_size_mb)?;
        info!("Initialized menu extractor for: {}", path.display());
        Ok(Self {
            path,
            doc: OnceCell::new(),
            metadata: OnceCell::new(),
        })
    }

    /// The validated input path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lazily parse the document, caching the handle for the instance's
    /// lifetime. Fails with [`MenuScanError::CorruptDocument`] when the
    /// structure cannot be parsed.
    fn document(&self) -> Result<&Document, MenuScanError> {
        self.doc.get_or_try_init(|| {
            debug!("Opening PDF document: {}", self.path.display());
            let doc = Document::load(&self.path).map_err(|e| MenuScanError::CorruptDocument {
                path: self.path.clone(),
                detail: e.to_string(),
            })?;
            info!("Opened PDF with {} pages", doc.get_pages().len());
            Ok(doc)
        })
    }

    /// Number of pages in the document. Triggers the lazy open.
    pub fn page_count(&self) -> Result<usize, MenuScanError> {
        Ok(self.document()?.get_pages().len())
    }

    /// Extract every page's outcome, in page order.
    ///
    /// One bad page does not abort the traversal; it yields
    /// [`PageOutcome::Failed`] and processing continues.
    pub(crate) fn page_outcomes(&self) -> Result<Vec<(u32, PageOutcome)>, MenuScanError> {
        let doc = self.document()?;
        let pages = doc.get_pages();
        debug!("Extracting text from {} pages", pages.len());

        let mut outcomes = Vec::with_capacity(pages.len());
        for (page_num, _object_id) in pages {
            let outcome = match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    debug!("Page {page_num}: {} characters", text.len());
                    PageOutcome::from_text(text)
                }
                Err(e) => {
                    warn!("Error extracting text from page {page_num}: {e}");
                    PageOutcome::Failed(PageError::Extraction {
                        page: page_num,
                        detail: e.to_string(),
                    })
                }
            };
            outcomes.push((page_num, outcome));
        }
        Ok(outcomes)
    }

    /// Extract all text with page breaks marked.
    ///
    /// Pages after the first are preceded by `\n--- Page N ---\n`; empty
    /// pages and per-page failures render as their respective markers (see
    /// [`crate::page`]). Never fails for a single bad page, only for
    /// whole-document open failures.
    pub fn extract_text(&self) -> Result<String, MenuScanError> {
        let outcomes = self.page_outcomes()?;
        let result = assemble_pages(&outcomes);
        info!("Extracted {} total characters from PDF", result.len());
        Ok(result)
    }

    /// Extract text from each page separately.
    ///
    /// Returns a page-number → text mapping in page order. A page whose
    /// extraction fails maps to an empty string rather than being omitted,
    /// so the mapping always covers every page.
    pub fn extract_by_page(&self) -> Result<BTreeMap<u32, String>, MenuScanError> {
        let doc = self.document()?;
        let mut page_texts = BTreeMap::new();

        for (page_num, _object_id) in doc.get_pages() {
            let text = match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Error extracting text from page {page_num}: {e}");
                    String::new()
                }
            };
            page_texts.insert(page_num, text);
        }

        debug!("Extracted text from {} pages", page_texts.len());
        Ok(page_texts)
    }

    /// Document metadata plus page count and file size.
    ///
    /// Computed once and memoized for the instance's lifetime.
    pub fn extract_metadata(&self) -> Result<&MenuMetadata, MenuScanError> {
        self.metadata.get_or_try_init(|| {
            let doc = self.document()?;

            let info: Option<&Dictionary> =
                doc.trailer.get(b"Info").ok().and_then(|obj| match obj {
                    Object::Reference(id) => {
                        doc.get_object(*id).ok().and_then(|o| o.as_dict().ok())
                    }
                    Object::Dictionary(dict) => Some(dict),
                    _ => None,
                });

            let field = |key: &[u8]| -> String {
                info.and_then(|dict| dict.get(key).ok())
                    .and_then(|obj| match obj {
                        Object::String(bytes, _) => {
                            Some(String::from_utf8_lossy(bytes).trim().to_string())
                        }
                        _ => None,
                    })
                    .unwrap_or_default()
            };

            let metadata = MenuMetadata {
                title: field(b"Title"),
                author: field(b"Author"),
                creator: field(b"Creator"),
                producer: field(b"Producer"),
                creation_date: field(b"CreationDate"),
                modification_date: field(b"ModDate"),
                page_count: doc.get_pages().len(),
                file_size: self.path.metadata().map(|m| m.len()).unwrap_or(0),
            };

            info!(
                "Extracted metadata: {} pages, {} bytes",
                metadata.page_count, metadata.file_size
            );
            Ok(metadata)
        })
    }

    /// Heuristic: does the document carry a real text layer?
    ///
    /// Examines only the first page; more than 50 trimmed characters means
    /// text-based. Returns `false` — not an error — when the document cannot
    /// be read or has no pages, leaving the decision to the page-average
    /// check in the pipeline.
    pub fn is_text_based(&self) -> bool {
        let doc = match self.document() {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Error checking if PDF is text-based: {e}");
                return false;
            }
        };

        let pages = doc.get_pages();
        let Some((&first_page, _)) = pages.iter().next() else {
            return false;
        };

        match doc.extract_text(&[first_page]) {
            Ok(text) => {
                let text_length = text.trim().chars().count();
                let is_text = text_length > 50;
                debug!("PDF text-based check: {text_length} chars on first page -> {is_text}");
                is_text
            }
            Err(e) => {
                warn!("Error checking if PDF is text-based: {e}");
                false
            }
        }
    }
}

impl std::fmt::Debug for MenuExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuExtractor")
            .field("path", &self.path)
            .field("opened", &self.doc.get().is_some())
            .finish()
    }
}
