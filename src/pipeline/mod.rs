//! Pipeline stages for PDF page OCR.
//!
//! Each submodule implements exactly one step. The orchestrator in
//! [`crate::process`] strings them together per page.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ ocr
//! (base64)  (pdfium)   (JPEG)    (tesseract)
//!           └──────── page ────────┘
//! ```
//!
//! 1. [`input`]  — decode the request's base64 field into PDF bytes
//! 2. [`render`] — open the document and rasterise pages; blocking, pdfium
//!    is not async-safe
//! 3. [`encode`] — JPEG-encode a page bitmap into a [`crate::output::RasterImage`]
//! 4. [`ocr`]    — run the OCR engine and parse its word boxes
//! 5. [`page`]   — compose 2–4 for one page, folding failures into data

pub mod encode;
pub mod input;
pub mod ocr;
pub mod page;
pub mod render;
