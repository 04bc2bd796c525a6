//! Progress-callback trait for per-page processing events.
//!
//! Inject an [`Arc<dyn ProcessingProgressCallback>`] via
//! [`crate::config::ProcessingConfigBuilder::progress_callback`] to receive
//! events as the orchestrator walks the document. The server installs
//! [`LoggingProgress`], which writes every event to `tracing`; this is where
//! the OCR engine's progress hook ends up.
//!
//! # Example
//!
//! ```rust
//! use pdfocr::{ProcessingProgressCallback, ProcessingConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct WordCounter {
//!     words: AtomicUsize,
//! }
//!
//! impl ProcessingProgressCallback for WordCounter {
//!     fn on_page_complete(&self, _page_num: usize, _total_pages: usize, word_count: usize) {
//!         self.words.fetch_add(word_count, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(WordCounter { words: AtomicUsize::new(0) });
//!
//! let config = ProcessingConfig::builder()
//!     .progress_callback(counter as Arc<dyn ProcessingProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The engine step a page is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStage {
    /// PDFium is drawing the page and the bitmap is being JPEG-encoded.
    Rasterizing,
    /// Tesseract is reading the encoded image.
    Recognizing,
}

impl fmt::Display for PageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PageStage::Rasterizing => "rasterizing",
            PageStage::Recognizing => "recognizing",
        };
        f.write_str(s)
    }
}

/// Called by the orchestrator as it processes each page.
///
/// Pages within one document are processed sequentially, but concurrent
/// requests share the server's callback, so implementations must be
/// `Send + Sync`. All methods default to no-ops.
pub trait ProcessingProgressCallback: Send + Sync {
    /// Called once the document is parsed, before any page is loaded.
    fn on_document_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called before a page handle is requested.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called as a page enters each engine step.
    fn on_page_stage(&self, page_num: usize, stage: PageStage) {
        let _ = (page_num, stage);
    }

    /// Called when a page was rasterised and recognised.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages
    /// * `word_count`  — number of words the engine returned
    fn on_page_complete(&self, page_num: usize, total_pages: usize, word_count: usize) {
        let _ = (page_num, total_pages, word_count);
    }

    /// Called when a page failed to load, render or recognise.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after all pages have been attempted.
    ///
    /// # Arguments
    /// * `total_pages`   — total pages in the document
    /// * `success_count` — pages processed without error
    fn on_document_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ProcessingProgressCallback for NoopProgressCallback {}

/// Writes every event to `tracing`.
pub struct LoggingProgress;

impl ProcessingProgressCallback for LoggingProgress {
    fn on_document_start(&self, total_pages: usize) {
        info!("Processing document with {} pages", total_pages);
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        info!("Processing page {}/{}", page_num, total_pages);
    }

    fn on_page_stage(&self, page_num: usize, stage: PageStage) {
        debug!("Page {}: {}", page_num, stage);
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize, word_count: usize) {
        info!(
            "Page {}/{}: extracted {} words",
            page_num, total_pages, word_count
        );
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        warn!("Page {}/{} failed: {}", page_num, total_pages, error);
    }

    fn on_document_complete(&self, total_pages: usize, success_count: usize) {
        info!(
            "Document complete: {}/{} pages succeeded",
            success_count, total_pages
        );
    }
}

/// Convenience alias matching the type stored in [`crate::config::ProcessingConfig`].
pub type ProgressCallback = Arc<dyn ProcessingProgressCallback>;
