//! Error types for the pdfocr library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ProcessError`] — **Fatal**: the request cannot proceed at all
//!   (no PDF supplied, undecodable base64, unreadable PDF container).
//!   Returned as `Err(ProcessError)` from [`crate::process::process_pdf`]
//!   and mapped to an HTTP status by [`crate::server`].
//!
//! * [`PageError`] — **Non-fatal**: a single page failed (load, render or
//!   OCR) but the other pages are fine. Stored inside
//!   [`crate::output::PageResult::Failure`] so the response always carries one
//!   entry per page.
//!
//! [`OcrError`] is the recogniser's own error; the page pipeline folds it into
//! [`PageError::OcrFailed`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfocr library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ProcessError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The request carried no `pdf` field, or it was empty.
    #[error("No PDF data provided")]
    MissingPdf,

    /// The `pdf` field is not valid base64.
    #[error("Invalid base64 PDF data")]
    InvalidBase64 { detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt, or the bytes are not a PDF at all.
    #[error("Failed to load PDF document: {detail}")]
    DocumentLoad { detail: String },

    /// PDF requires a password; the service never supplies one.
    #[error("PDF document is encrypted and requires a password")]
    PasswordRequired,

    // ── Engine binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProcessError {
    /// True for errors caused by the request body rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingPdf | Self::InvalidBase64 { .. })
    }

    /// True when the PDF container itself could not be opened.
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::DocumentLoad { .. } | Self::PasswordRequired)
    }
}

/// A non-fatal error for a single page.
///
/// The `Display` text is exactly what the HTTP response puts in the page's
/// `error` field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    /// The page handle could not be obtained from the document.
    #[error("Failed to load page {page}")]
    LoadFailed { page: usize, detail: String },

    /// Page rasterisation or JPEG encoding failed.
    #[error("Failed to process page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// The OCR engine failed on the rasterised page.
    #[error("Failed to process page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },
}

impl PageError {
    /// 1-indexed page number the error belongs to.
    pub fn page(&self) -> usize {
        match self {
            Self::LoadFailed { page, .. }
            | Self::RenderFailed { page, .. }
            | Self::OcrFailed { page, .. } => *page,
        }
    }
}

/// A failure reported by the PDF engine for one page operation.
///
/// Carries the engine's message only; the caller attaches the page number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// Errors raised by a [`crate::pipeline::ocr::TextRecognizer`].
#[derive(Debug, Error)]
pub enum OcrError {
    /// The image handed to the recogniser carried no bytes.
    #[error("cannot run OCR on an empty image")]
    EmptyImage,

    /// The engine executable could not be started.
    #[error("failed to start OCR engine '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but reported failure.
    #[error("OCR engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    /// The engine output could not be parsed into words.
    #[error("malformed OCR output at line {line}: {detail}")]
    MalformedOutput { line: usize, detail: String },

    /// Temp-file I/O around the engine call failed.
    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}
