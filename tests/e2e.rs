//! End-to-end tests against real pdfium and Tesseract.
//!
//! These need a pdfium shared library and a `tesseract` executable with
//! English language data, so they are gated behind the `E2E_ENABLED`
//! environment variable.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/opt/pdfium/lib cargo test --test e2e -- --nocapture

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pdfocr::{
    router, AppState, DocumentProcessor, PdfiumTesseractProcessor, ProcessError,
    ProcessingConfig,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Return early unless the e2e environment is requested.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

fn config() -> ProcessingConfig {
    let mut builder = ProcessingConfig::builder();
    if let Ok(path) = std::env::var("PDFIUM_LIB_PATH") {
        builder = builder.pdfium_lib_path(path);
    }
    if let Ok(path) = std::env::var("TESSERACT_PATH") {
        builder = builder.tesseract_path(path);
    }
    builder.build().expect("valid config")
}

/// Build a PDF with one US-Letter page per entry, each showing its text in
/// large Helvetica. Offsets in the xref table are computed, so pdfium opens
/// it without repair.
fn text_pdf(pages: &[&str]) -> Vec<u8> {
    let n = pages.len();
    // 1: catalog, 2: pages, 3: font, then (page, content) pairs.
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        n
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());

    for (i, text) in pages.iter().enumerate() {
        let content_id = 5 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            content_id
        ));
        let stream = format!("BT /F1 48 Tf 72 650 Td ({}) Tj ET", text);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for off in offsets {
        xref.push_str(&format!("{:010} 00000 n \n", off));
    }
    pdf.extend_from_slice(xref.as_bytes());
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    pdf
}

fn all_text(words: &[pdfocr::Word]) -> String {
    words
        .iter()
        .map(|w| w.text.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::test]
async fn test_single_page_words_and_image() {
    e2e_skip_unless_enabled!();

    let processor = PdfiumTesseractProcessor::new(config());
    let output = processor
        .process(text_pdf(&["HELLO WORLD"]))
        .await
        .expect("processing should succeed");

    assert_eq!(output.pages.len(), 1);
    let page = &output.pages[0];
    assert!(page.is_success(), "page failed: {:?}", page.error());

    let text = all_text(page.words());
    println!("OCR: {text}");
    assert!(text.contains("HELLO"), "got {text:?}");
    assert!(text.contains("WORLD"), "got {text:?}");

    for w in page.words() {
        assert!((0.0..=100.0).contains(&w.confidence), "{w:?}");
        assert!(w.bbox.x0 <= w.bbox.x1 && w.bbox.y0 <= w.bbox.y1, "{w:?}");
        // 612 x 792 pt at scale 1.5
        assert!(w.bbox.x1 <= 918 && w.bbox.y1 <= 1188, "{w:?}");
    }

    if let pdfocr::PageResult::Success { image, .. } = page {
        assert_eq!((image.width, image.height), (918, 1188));
        assert!(image.to_data_uri().starts_with("data:image/jpeg;base64,/9j/"));
    }
}

#[tokio::test]
async fn test_pages_keep_document_order() {
    e2e_skip_unless_enabled!();

    let processor = PdfiumTesseractProcessor::new(config());
    let output = processor
        .process(text_pdf(&["FIRST", "SECOND", "THIRD"]))
        .await
        .expect("processing should succeed");

    assert_eq!(output.pages.len(), 3);
    for (page, expected) in output.pages.iter().zip(["FIRST", "SECOND", "THIRD"]) {
        let text = all_text(page.words());
        assert!(text.contains(expected), "expected {expected}, got {text:?}");
    }
}

#[tokio::test]
async fn test_same_input_same_words() {
    e2e_skip_unless_enabled!();

    let processor = PdfiumTesseractProcessor::new(config());
    let pdf = text_pdf(&["REPEATABLE"]);
    let a = processor.process(pdf.clone()).await.unwrap();
    let b = processor.process(pdf).await.unwrap();
    assert_eq!(a.pages[0].words(), b.pages[0].words());
}

#[tokio::test]
async fn test_truncated_pdf_is_document_error() {
    e2e_skip_unless_enabled!();

    let processor = PdfiumTesseractProcessor::new(config());
    let err = processor
        .process(b"%PDF-1.4\n1 0 obj\n<<".to_vec())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ProcessError::DocumentLoad { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_http_round_trip() {
    e2e_skip_unless_enabled!();

    let state = AppState::new(Arc::new(PdfiumTesseractProcessor::new(config())));
    let payload = json!({ "pdf": STANDARD.encode(text_pdf(&["PAYLOAD"])) });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/process-pdf")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let pages = body["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0]["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
    assert!(pages[0]["words"].as_array().is_some_and(|w| !w.is_empty()));
}
