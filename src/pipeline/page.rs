//! One page through the engines: rasterise, then recognise.
//!
//! [`process_page`] always returns a [`PageResult`]. Render errors, OCR
//! errors and panics inside either engine all become
//! [`PageResult::Failure`], so one bad page never costs the caller the rest
//! of the document.

use crate::config::ProcessingConfig;
use crate::error::PageError;
use crate::output::PageResult;
use crate::pipeline::ocr::TextRecognizer;
use crate::pipeline::render::{self, Page};
use crate::progress::PageStage;
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Rasterise `page` and run OCR over the result.
///
/// `page_num` is 1-indexed and only used for tagging errors and events.
pub fn process_page(
    page: &dyn Page,
    page_num: usize,
    recognizer: &dyn TextRecognizer,
    config: &ProcessingConfig,
) -> PageResult {
    let stage = Cell::new(PageStage::Rasterizing);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_engines(page, page_num, recognizer, config, &stage)
    }))
    .unwrap_or_else(|payload| {
        let detail = panic_message(payload.as_ref());
        Err(match stage.get() {
            PageStage::Rasterizing => PageError::RenderFailed {
                page: page_num,
                detail,
            },
            PageStage::Recognizing => PageError::OcrFailed {
                page: page_num,
                detail,
            },
        })
    });

    match outcome {
        Ok(result) => result,
        Err(e) => {
            error!("Error processing page {}: {}", page_num, e);
            PageResult::Failure { error: e }
        }
    }
}

fn run_engines(
    page: &dyn Page,
    page_num: usize,
    recognizer: &dyn TextRecognizer,
    config: &ProcessingConfig,
    current: &Cell<PageStage>,
) -> Result<PageResult, PageError> {
    let enter = |s: PageStage| {
        current.set(s);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_stage(page_num, s);
        }
    };

    enter(PageStage::Rasterizing);
    let image = render::rasterize(page, page_num, config.scale, config.jpeg_quality)?;

    enter(PageStage::Recognizing);
    let words = recognizer
        .recognize(&image, &config.language)
        .map_err(|e| PageError::OcrFailed {
            page: page_num,
            detail: e.to_string(),
        })?;

    debug!(
        "Extracted {} words for page {} via {}",
        words.len(),
        page_num,
        recognizer.name()
    );

    Ok(PageResult::Success { image, words })
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("engine panicked: {}", s)
    } else {
        "engine panicked".to_string()
    }
}
