//! PDF rasterisation: open a document and render pages via pdfium.
//!
//! ## Why traits?
//!
//! [`Document`] and [`Page`] are the only surface the orchestrator sees.
//! The pdfium implementations below are what the server uses; tests swap in
//! in-memory fakes so page-failure handling can be exercised without a
//! pdfium shared library.
//!
//! ## Blocking
//!
//! Everything here is synchronous. pdfium keeps thread-local state and is not
//! async-safe, so [`crate::process::process_pdf`] runs it inside
//! `tokio::task::spawn_blocking`.

use crate::error::{EngineError, PageError, ProcessError};
use crate::output::RasterImage;
use crate::pipeline::encode;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Hard cap on either rendered edge, whatever the scale.
///
/// An A0 poster at scale 1.5 is ~5,000 px wide; this stops a hostile
/// MediaBox from allocating gigabytes.
pub const MAX_RENDERED_EDGE: i32 = 10_000;

/// A parsed PDF.
pub trait Document {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Obtain the handle for `page_num` (1-indexed).
    fn page(&self, page_num: usize) -> Result<Box<dyn Page + '_>, EngineError>;
}

/// One page of a [`Document`].
pub trait Page {
    /// Render the page with its viewport scaled by `scale`.
    fn render(&self, scale: f32) -> Result<DynamicImage, EngineError>;
}

impl From<PdfiumError> for EngineError {
    fn from(e: PdfiumError) -> Self {
        EngineError(format!("{:?}", e))
    }
}

/// Bind to pdfium, from `lib_path` if given or the system library otherwise.
///
/// `lib_path` may name the shared library itself or the directory holding it.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, ProcessError> {
    let bindings = match lib_path {
        Some(path) if path.is_dir() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
        }
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_system_library().or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        }),
    };

    bindings
        .map(Pdfium::new)
        .map_err(|e| ProcessError::PdfiumBindingFailed(format!("{:?}", e)))
}

/// Check for the `%PDF` header within the first 1024 bytes, where readers
/// are required to look for it.
pub fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024)];
    window.windows(4).any(|w| w == b"%PDF")
}

/// Reject bytes without a PDF header before pdfium is bound.
pub fn ensure_pdf_header(bytes: &[u8]) -> Result<(), ProcessError> {
    if has_pdf_header(bytes) {
        return Ok(());
    }
    let magic: Vec<u8> = bytes.iter().take(4).copied().collect();
    Err(ProcessError::DocumentLoad {
        detail: format!("missing %PDF header, first bytes: {:?}", magic),
    })
}

/// A document opened by pdfium from in-memory bytes.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    /// Parse `bytes` as a PDF.
    ///
    /// # Errors
    /// * [`ProcessError::DocumentLoad`] when the bytes are not a readable PDF
    /// * [`ProcessError::PasswordRequired`] when the document is encrypted
    pub fn load(pdfium: &'a Pdfium, bytes: Vec<u8>) -> Result<Self, ProcessError> {
        let document = pdfium.load_pdf_from_byte_vec(bytes, None).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                ProcessError::PasswordRequired
            } else {
                ProcessError::DocumentLoad { detail: err_str }
            }
        })?;

        info!("PDF loaded: {} pages", document.pages().len());
        Ok(Self { document })
    }
}

impl Document for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, page_num: usize) -> Result<Box<dyn Page + '_>, EngineError> {
        let index = page_num
            .checked_sub(1)
            .and_then(|i| PdfPageIndex::try_from(i).ok())
            .ok_or_else(|| EngineError(format!("page number {} is out of range", page_num)))?;

        let page = self.document.pages().get(index)?;
        Ok(Box::new(PdfiumPage { page }))
    }
}

struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

impl Page for PdfiumPage<'_> {
    fn render(&self, scale: f32) -> Result<DynamicImage, EngineError> {
        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(scale)
            .set_maximum_width(MAX_RENDERED_EDGE)
            .set_maximum_height(MAX_RENDERED_EDGE);

        let bitmap = self.page.render_with_config(&render_config)?;
        Ok(bitmap.as_image())
    }
}

/// Rasterise one page into an encoded [`RasterImage`].
///
/// Render and encode failures both surface as [`PageError::RenderFailed`]
/// tagged with `page_num`.
pub fn rasterize(
    page: &dyn Page,
    page_num: usize,
    scale: f32,
    jpeg_quality: u8,
) -> Result<RasterImage, PageError> {
    debug!("Rendering page {} with scale {}", page_num, scale);

    let image = page.render(scale).map_err(|e| PageError::RenderFailed {
        page: page_num,
        detail: e.to_string(),
    })?;

    debug!(
        "Rendered page {} → {}x{} px",
        page_num,
        image.width(),
        image.height()
    );

    encode::encode_page(&image, jpeg_quality).map_err(|e| PageError::RenderFailed {
        page: page_num,
        detail: format!("Image encoding failed: {}", e),
    })
}
