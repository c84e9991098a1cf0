//! CLI binary for menuscan.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ProcessingConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use menuscan::{ProcessingConfig, ScanPipeline};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract text (stdout); OCR kicks in automatically for scanned menus
  menuscan menu.pdf

  # Write to a file
  menuscan menu.pdf -o menu.txt

  # German menu, higher-resolution OCR
  menuscan --lang deu --dpi 300 speisekarte.pdf

  # Native extraction only — fail instead of running OCR
  menuscan --no-ocr menu.pdf

  # Is this a scanned menu?
  menuscan --detect-only menu.pdf

  # Document metadata as JSON (no OCR tools needed)
  menuscan --inspect-only menu.pdf

EXTERNAL TOOLS (OCR path only):
  pdftoppm     poppler-utils       apt-get install poppler-utils / brew install poppler
  tesseract    tesseract-ocr       apt-get install tesseract-ocr / brew install tesseract

ENVIRONMENT VARIABLES:
  TESSERACT_PATH    Path to the tesseract binary (overrides PATH lookup)
  MENUSCAN_LANG     Tesseract language code (default: eng)
"#;

/// Extract text from restaurant menu PDFs, with OCR fallback for scans.
#[derive(Parser, Debug)]
#[command(
    name = "menuscan",
    version,
    about = "Extract text from restaurant menu PDFs, with OCR fallback for scans",
    long_about = "Extract readable text from restaurant menu PDFs. Digital menus use the \
embedded text layer directly; scanned menus are rasterized and read with Tesseract OCR. \
The output is one text stream with `--- Page N ---` markers between pages.",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the menu PDF.
    input: PathBuf,

    /// Write extracted text to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tesseract language code (e.g. eng, deu, fra).
    #[arg(long, env = "MENUSCAN_LANG", default_value = "eng")]
    lang: String,

    /// Rasterization resolution in DPI (72–600).
    #[arg(long, default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Scan-detection threshold in average characters per page.
    #[arg(long, default_value_t = 50.0)]
    threshold: f64,

    /// Per-page OCR timeout in seconds.
    #[arg(long, default_value_t = 30)]
    ocr_timeout: u64,

    /// Disable OCR: scanned menus fail instead of being recognized.
    #[arg(long)]
    no_ocr: bool,

    /// Path to the tesseract binary (overrides PATH lookup).
    #[arg(long, env = "TESSERACT_PATH")]
    tesseract_path: Option<PathBuf>,

    /// Maximum accepted input size in megabytes.
    #[arg(long, default_value_t = 50)]
    max_size_mb: u64,

    /// Print the scan-detection verdict (`scanned` / `text-based`) and exit.
    #[arg(long, conflicts_with = "inspect_only")]
    detect_only: bool,

    /// Print document metadata as JSON and exit.
    #[arg(long)]
    inspect_only: bool,

    /// Verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all logging except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build configuration ──────────────────────────────────────────────
    let mut builder = ProcessingConfig::builder()
        .ocr_enabled(!cli.no_ocr)
        .ocr_language(&cli.lang)
        .dpi(cli.dpi)
        .scan_threshold_chars(cli.threshold)
        .ocr_timeout_secs(cli.ocr_timeout)
        .max_file_size_mb(cli.max_size_mb);
    if let Some(path) = &cli.tesseract_path {
        builder = builder.ocr_engine_path(path);
    }
    let config = builder.build()?;

    let pipeline = ScanPipeline::new(&cli.input, config)
        .with_context(|| format!("Cannot open '{}'", cli.input.display()))?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let metadata = pipeline.extractor().extract_metadata()?;
        println!("{}", serde_json::to_string_pretty(metadata)?);
        return Ok(());
    }

    // ── Detect-only mode ─────────────────────────────────────────────────
    if cli.detect_only {
        println!(
            "{}",
            if pipeline.is_scanned() {
                "scanned"
            } else {
                "text-based"
            }
        );
        return Ok(());
    }

    // ── Full processing ──────────────────────────────────────────────────
    let text = pipeline.process().await?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            eprintln!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
