//! Per-page outcomes and page-break marker assembly.
//!
//! Both the native extraction path and the OCR path produce one
//! [`PageOutcome`] per page, in page order, and feed them through
//! [`assemble_pages`]. Keeping assembly in one place guarantees the two
//! paths share the exact page-break convention.
//!
//! ## Marker convention
//!
//! | Outcome                    | Marker (page N > 1)                  |
//! |----------------------------|--------------------------------------|
//! | usable text                | `\n--- Page N ---\n` + text          |
//! | empty / whitespace-only    | `\n--- Page N (no text) ---\n`       |
//! | extraction failed          | `\n--- Page N (extraction error) ---\n` |
//! | OCR failed / timed out     | `\n--- Page N (OCR error) ---\n`     |
//!
//! Page 1 never receives a leading marker: the markers exist to separate
//! pages in the flattened stream, and there is nothing before page 1 to
//! separate it from.

use crate::error::PageError;

/// The result of extracting (or OCR-ing) one page.
///
/// An explicit enum instead of a bare `Option<String>` so the aggregation
/// step can pattern-match and choose the correct inline marker. This is what
/// keeps the "never abort on one bad page" contract visible in the types.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// The page yielded usable (non-whitespace) text.
    Text(String),
    /// The page yielded nothing, or whitespace only.
    Empty,
    /// Extracting or recognizing the page raised an internal error.
    Failed(PageError),
}

impl PageOutcome {
    /// Classify raw extracted text: whitespace-only counts as empty.
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            PageOutcome::Empty
        } else {
            PageOutcome::Text(text)
        }
    }
}

/// Assemble per-page outcomes into the final text stream.
///
/// `pages` must be in ascending page order; page numbers are 1-based and
/// carried explicitly so gaps (skipped pages) still label correctly.
pub fn assemble_pages(pages: &[(u32, PageOutcome)]) -> String {
    let mut full_text = String::new();

    for (i, (page_num, outcome)) in pages.iter().enumerate() {
        let first = i == 0;
        match outcome {
            PageOutcome::Text(text) => {
                if !first {
                    full_text.push_str(&format!("\n--- Page {page_num} ---\n"));
                }
                full_text.push_str(text);
            }
            PageOutcome::Empty => {
                if !first {
                    full_text.push_str(&format!("\n--- Page {page_num} (no text) ---\n"));
                }
            }
            PageOutcome::Failed(PageError::Extraction { .. }) => {
                if !first {
                    full_text.push_str(&format!("\n--- Page {page_num} (extraction error) ---\n"));
                }
            }
            PageOutcome::Failed(PageError::Ocr { .. })
            | PageOutcome::Failed(PageError::Timeout { .. }) => {
                if !first {
                    full_text.push_str(&format!("\n--- Page {page_num} (OCR error) ---\n"));
                }
            }
        }
    }

    full_text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> PageOutcome {
        PageOutcome::Text(s.to_string())
    }

    #[test]
    fn single_page_has_no_marker() {
        let out = assemble_pages(&[(1, text("Starters\nSoup 4.50"))]);
        assert_eq!(out, "Starters\nSoup 4.50");
    }

    #[test]
    fn multi_page_markers_count_and_order() {
        let pages: Vec<(u32, PageOutcome)> =
            (1..=4).map(|n| (n, text(&format!("page {n} body")))).collect();
        let out = assemble_pages(&pages);

        // Exactly pageCount - 1 markers, each exactly once, ascending.
        assert_eq!(out.matches("--- Page ").count(), 3);
        for n in 2..=4 {
            assert_eq!(out.matches(&format!("\n--- Page {n} ---\n")).count(), 1);
        }
        let p2 = out.find("--- Page 2 ---").unwrap();
        let p3 = out.find("--- Page 3 ---").unwrap();
        let p4 = out.find("--- Page 4 ---").unwrap();
        assert!(p2 < p3 && p3 < p4);
        assert!(!out.contains("--- Page 1 ---"));
    }

    #[test]
    fn whitespace_only_classifies_as_empty() {
        assert!(matches!(
            PageOutcome::from_text("  \n\t ".into()),
            PageOutcome::Empty
        ));
        assert!(matches!(
            PageOutcome::from_text("Mains".into()),
            PageOutcome::Text(_)
        ));
    }

    #[test]
    fn empty_page_gets_no_text_marker() {
        let out = assemble_pages(&[(1, text("A")), (2, PageOutcome::Empty), (3, text("C"))]);
        assert!(out.contains("\n--- Page 2 (no text) ---\n"));
        assert!(out.contains("\n--- Page 3 ---\nC"));
    }

    #[test]
    fn failed_extraction_gets_error_marker_without_aborting() {
        let out = assemble_pages(&[
            (1, text("A")),
            (
                2,
                PageOutcome::Failed(PageError::Extraction {
                    page: 2,
                    detail: "bad content stream".into(),
                }),
            ),
            (3, text("C")),
        ]);
        assert!(out.starts_with('A'));
        assert!(out.contains("\n--- Page 2 (extraction error) ---\n"));
        assert!(out.contains("\n--- Page 3 ---\nC"));
    }

    #[test]
    fn ocr_failure_and_timeout_share_the_ocr_marker() {
        let out = assemble_pages(&[
            (1, text("A")),
            (
                2,
                PageOutcome::Failed(PageError::Ocr {
                    page: 2,
                    detail: "engine crashed".into(),
                }),
            ),
            (3, PageOutcome::Failed(PageError::Timeout { page: 3, secs: 30 })),
        ]);
        assert_eq!(out.matches("(OCR error)").count(), 2);
        assert!(out.contains("--- Page 2 (OCR error) ---"));
        assert!(out.contains("--- Page 3 (OCR error) ---"));
    }

    #[test]
    fn first_page_failure_contributes_nothing() {
        let out = assemble_pages(&[
            (
                1,
                PageOutcome::Failed(PageError::Extraction {
                    page: 1,
                    detail: "…".into(),
                }),
            ),
            (2, text("B")),
        ]);
        assert!(out.starts_with("\n--- Page 2 ---\n"));
    }
}
