//! Document orchestration: parse the PDF, then walk its pages in order.
//!
//! ```text
//! Start ─▶ ParsingDocument ─▶ ( LoadPage ─▶ Rasterize ─▶ Recognize ─▶ Append )* ─▶ Done
//!               │
//!               └─▶ Failed  (ProcessError, no partial result)
//! ```
//!
//! Only parsing the document can fail the whole call. Inside the page loop
//! every failure is recorded as that page's [`PageResult::Failure`] and the
//! loop moves on, so `pages.len()` always equals the document's page count.
//! Pages are processed strictly one after another.

use crate::config::ProcessingConfig;
use crate::error::{PageError, ProcessError};
use crate::output::{DocumentResult, PageResult};
use crate::pipeline::ocr::{TesseractRecognizer, TextRecognizer};
use crate::pipeline::page;
use crate::pipeline::render::{self, Document, PdfiumDocument};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Process every page of an already-parsed document.
///
/// Never fails: a page whose handle cannot be obtained becomes
/// `Failed to load page {n}`, and render/OCR failures are folded in by
/// [`page::process_page`].
pub fn process_document(
    document: &dyn Document,
    recognizer: &dyn TextRecognizer,
    config: &ProcessingConfig,
) -> DocumentResult {
    let total_pages = document.page_count();
    let cb = config.progress_callback.as_ref();

    if let Some(cb) = cb {
        cb.on_document_start(total_pages);
    }

    let mut pages = Vec::with_capacity(total_pages);

    for page_num in 1..=total_pages {
        if let Some(cb) = cb {
            cb.on_page_start(page_num, total_pages);
        }

        let result = match document.page(page_num) {
            Ok(handle) => page::process_page(handle.as_ref(), page_num, recognizer, config),
            Err(e) => {
                error!("Failed to load page {}: {}", page_num, e);
                PageResult::Failure {
                    error: PageError::LoadFailed {
                        page: page_num,
                        detail: e.to_string(),
                    },
                }
            }
        };

        if let Some(cb) = cb {
            match &result {
                PageResult::Success { words, .. } => {
                    cb.on_page_complete(page_num, total_pages, words.len())
                }
                PageResult::Failure { error } => {
                    cb.on_page_error(page_num, total_pages, &error.to_string())
                }
            }
        }

        pages.push(result);
    }

    let output = DocumentResult { pages };

    if let Some(cb) = cb {
        cb.on_document_complete(total_pages, output.succeeded());
    }

    output
}

/// Parse `bytes` with pdfium and process every page. Blocking.
///
/// # Errors
/// Returns `Err(ProcessError)` only when the document as a whole is
/// unusable: no PDF header, pdfium cannot parse it, it is encrypted, or
/// pdfium itself cannot be bound.
pub fn process_pdf_blocking(
    bytes: Vec<u8>,
    recognizer: &dyn TextRecognizer,
    config: &ProcessingConfig,
) -> Result<DocumentResult, ProcessError> {
    let start = Instant::now();
    info!("Loading PDF ({} bytes)", bytes.len());

    render::ensure_pdf_header(&bytes)?;
    let pdfium = render::bind_pdfium(config.pdfium_lib_path.as_deref())?;
    let document = PdfiumDocument::load(&pdfium, bytes)?;

    let output = process_document(&document, recognizer, config);

    info!(
        "Processed {}/{} pages in {}ms",
        output.succeeded(),
        output.pages.len(),
        start.elapsed().as_millis()
    );
    Ok(output)
}

/// Async entry point: runs [`process_pdf_blocking`] on the blocking pool.
///
/// The calling task suspends until the whole document is done.
pub async fn process_pdf(
    bytes: Vec<u8>,
    recognizer: Arc<dyn TextRecognizer>,
    config: &ProcessingConfig,
) -> Result<DocumentResult, ProcessError> {
    let config = config.clone();

    tokio::task::spawn_blocking(move || process_pdf_blocking(bytes, recognizer.as_ref(), &config))
        .await
        .map_err(|e| ProcessError::Internal(format!("Processing task panicked: {}", e)))?
}

/// What the HTTP layer calls with decoded PDF bytes.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    async fn process(&self, pdf: Vec<u8>) -> Result<DocumentResult, ProcessError>;
}

/// pdfium for rendering, Tesseract for OCR.
pub struct PdfiumTesseractProcessor {
    config: ProcessingConfig,
    recognizer: Arc<dyn TextRecognizer>,
}

impl PdfiumTesseractProcessor {
    pub fn new(config: ProcessingConfig) -> Self {
        let recognizer = Arc::new(TesseractRecognizer::new(config.tesseract_path.clone()));
        Self::with_recognizer(config, recognizer)
    }

    /// Use a custom recogniser instead of the Tesseract executable.
    pub fn with_recognizer(config: ProcessingConfig, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { config, recognizer }
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }
}

#[async_trait]
impl DocumentProcessor for PdfiumTesseractProcessor {
    async fn process(&self, pdf: Vec<u8>) -> Result<DocumentResult, ProcessError> {
        process_pdf(pdf, Arc::clone(&self.recognizer), &self.config).await
    }
}
