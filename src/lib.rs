//! # pdfocr
//!
//! Rasterise every page of a PDF and run OCR over it, over HTTP.
//!
//! A client posts a base64 PDF to `POST /process-pdf` and gets back, for each
//! page in order, a JPEG data URI of the rendered page plus the words
//! Tesseract found on it, each with a bounding box and a confidence score.
//! A page that fails is reported in place with an `error` message; the other
//! pages are still returned.
//!
//! ## Pipeline Overview
//!
//! ```text
//! request JSON
//!  │
//!  ├─ 1. Input   base64 → PDF bytes                     (pipeline::input)
//!  ├─ 2. Parse   pdfium opens the document              (pipeline::render)
//!  │   for each page, sequentially:
//!  ├─ 3. Render  page bitmap at scale 1.5               (pipeline::render)
//!  ├─ 4. Encode  JPEG q70 → data URI                    (pipeline::encode)
//!  ├─ 5. OCR     tesseract TSV → words + boxes          (pipeline::ocr)
//!  └─ 6. Output  { pages: [ { image, words, error? } ] } (output)
//! ```
//!
//! Steps 2–5 are blocking and run on `tokio::task::spawn_blocking`.
//!
//! ## Library use
//!
//! ```rust,no_run
//! use pdfocr::{process_pdf, ProcessingConfig, TesseractRecognizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("scan.pdf")?;
//!     let config = ProcessingConfig::default();
//!     let output = process_pdf(bytes, Arc::new(TesseractRecognizer::default()), &config).await?;
//!     for (i, page) in output.pages.iter().enumerate() {
//!         println!("page {}: {} words", i + 1, page.words().len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfocr-server` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//!
//! ## Runtime requirements
//!
//! A pdfium shared library (system-wide or via `PDFIUM_LIB_PATH`) and a
//! `tesseract` executable with the requested language data installed.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessingConfig, ProcessingConfigBuilder};
pub use error::{EngineError, OcrError, PageError, ProcessError};
pub use output::{BoundingBox, DocumentResult, PageResult, RasterImage, Word};
pub use pipeline::ocr::{TesseractRecognizer, TextRecognizer};
pub use process::{
    process_document, process_pdf, process_pdf_blocking, DocumentProcessor,
    PdfiumTesseractProcessor,
};
pub use progress::{
    LoggingProgress, NoopProgressCallback, PageStage, ProcessingProgressCallback,
    ProgressCallback,
};
pub use server::{router, AppState};
