//! OCR: run the Tesseract engine on one preprocessed page image.
//!
//! ## Invocation model
//!
//! Tesseract runs as a subprocess (`tesseract <image> stdout -l <lang>`),
//! the same interface every language binding ultimately wraps. The
//! preprocessed image is written to a managed temp file that is deleted when
//! the call returns. The per-call timeout is enforced with
//! [`tokio::time::timeout`] plus `kill_on_drop`, so a hung engine is killed
//! rather than orphaned and a timed-out page becomes a per-page failure, not
//! a document-level abort.
//!
//! ## Error granularity
//!
//! [`OcrError`] is finer-grained than the public error type on purpose: the
//! orchestrator must distinguish environment failures (engine missing, OCR
//! disabled — abort the whole OCR pass) from per-page failures (engine error
//! or timeout — inline marker, keep going). The [`From`] impl collapses it
//! into [`MenuScanError`] at the public boundary.

use crate::config::ProcessingConfig;
use crate::error::MenuScanError;
use crate::pipeline::preprocess::preprocess;
use image::{DynamicImage, ImageFormat};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Outcome of a single OCR invocation, before collapsing into the public
/// error type.
#[derive(Debug, Error)]
pub enum OcrError {
    /// OCR is disabled in configuration. Checked before any image work.
    #[error("OCR is disabled in configuration")]
    Disabled,

    /// The engine binary could not be spawned.
    #[error("OCR engine '{engine}' not found: {detail}")]
    Unavailable { engine: String, detail: String },

    /// The engine exceeded the per-call timeout.
    #[error("OCR timed out after {secs}s")]
    TimedOut { secs: u64 },

    /// The engine ran but reported an error.
    #[error("{detail}")]
    Failed { detail: String },
}

impl From<OcrError> for MenuScanError {
    fn from(e: OcrError) -> Self {
        match e {
            OcrError::Disabled => MenuScanError::OcrDisabled,
            OcrError::Unavailable { engine, detail } => {
                MenuScanError::OcrUnavailable { engine, detail }
            }
            OcrError::TimedOut { secs } => MenuScanError::OcrFailed {
                detail: format!("timed out after {secs}s"),
            },
            OcrError::Failed { detail } => MenuScanError::OcrFailed { detail },
        }
    }
}

/// Recognize text on one page image.
///
/// Applies [`preprocess`] first, then invokes the configured engine with the
/// configured language and timeout. Returns the raw engine output; the
/// caller decides whether it counts as usable text.
pub async fn recognize(
    image: &DynamicImage,
    config: &ProcessingConfig,
) -> Result<String, OcrError> {
    if !config.ocr_enabled {
        return Err(OcrError::Disabled);
    }

    let processed = preprocess(image);
    debug!(
        "Running OCR on image ({}x{})",
        image.width(),
        image.height()
    );

    let input = tempfile::Builder::new()
        .prefix("menuscan-ocr-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| OcrError::Failed {
            detail: format!("failed to create temp image: {e}"),
        })?;
    processed
        .save_with_format(input.path(), ImageFormat::Png)
        .map_err(|e| OcrError::Failed {
            detail: format!("failed to write temp image: {e}"),
        })?;

    let engine = config.ocr_engine();
    let run = Command::new(&engine)
        .arg(input.path())
        .arg("stdout")
        .arg("-l")
        .arg(&config.ocr_language)
        .kill_on_drop(true)
        .output();

    let output = match timeout(Duration::from_secs(config.ocr_timeout_secs), run).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(OcrError::Unavailable {
                engine: engine.display().to_string(),
                detail: e.to_string(),
            });
        }
        Ok(Err(e)) => {
            return Err(OcrError::Failed {
                detail: format!("failed to run OCR engine: {e}"),
            });
        }
        // Dropping the output future kills the child (kill_on_drop).
        Err(_) => {
            return Err(OcrError::TimedOut {
                secs: config.ocr_timeout_secs,
            });
        }
    };

    if !output.status.success() {
        return Err(OcrError::Failed {
            detail: format!(
                "OCR engine exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    debug!("OCR extracted {} characters", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn blank_page() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([255, 255, 255])))
    }

    #[tokio::test]
    async fn disabled_ocr_fails_before_any_image_work() {
        let config = ProcessingConfig::builder()
            .ocr_enabled(false)
            .build()
            .unwrap();
        let err = recognize(&blank_page(), &config).await.unwrap_err();
        assert!(matches!(err, OcrError::Disabled));
    }

    #[tokio::test]
    async fn missing_engine_reports_unavailable() {
        let config = ProcessingConfig::builder()
            .ocr_engine_path("/nonexistent/menuscan-test-tesseract")
            .build()
            .unwrap();
        let err = recognize(&blank_page(), &config).await.unwrap_err();
        match err {
            OcrError::Unavailable { engine, .. } => {
                assert!(engine.contains("menuscan-test-tesseract"));
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    /// Write an executable shell script standing in for the OCR binary.
    #[cfg(unix)]
    fn stub_engine(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn engine_stdout_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let engine = stub_engine(dir.path(), r#"echo "Seafood Paella 24.00""#);
        let config = ProcessingConfig::builder()
            .ocr_engine_path(&engine)
            .build()
            .unwrap();

        let text = recognize(&blank_page(), &config).await.unwrap();
        assert!(text.contains("Seafood Paella 24.00"), "got: {text:?}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn engine_error_carries_its_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let engine = stub_engine(dir.path(), "echo \"page is blank\" >&2\nexit 1");
        let config = ProcessingConfig::builder()
            .ocr_engine_path(&engine)
            .build()
            .unwrap();

        let err = recognize(&blank_page(), &config).await.unwrap_err();
        match err {
            OcrError::Failed { detail } => {
                assert!(detail.contains("page is blank"), "got: {detail}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hung_engine_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let engine = stub_engine(dir.path(), "sleep 30");
        let config = ProcessingConfig::builder()
            .ocr_engine_path(&engine)
            .ocr_timeout_secs(1)
            .build()
            .unwrap();

        let err = recognize(&blank_page(), &config).await.unwrap_err();
        assert!(matches!(err, OcrError::TimedOut { secs: 1 }), "got {err:?}");
    }
}
