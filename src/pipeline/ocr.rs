//! Text recognition: run the OCR engine on a rasterised page.
//!
//! The production recogniser shells out to the `tesseract` executable and
//! asks for TSV output, which carries one row per layout element. Rows at
//! level 5 are words; each becomes a [`Word`] with its box converted from
//! `left/top/width/height` into `x0/y0/x1/y1`. Words keep the engine's order.
//!
//! This is the only place engine output is narrowed to `{text, bbox,
//! confidence}`; downstream stages pass `Word`s through untouched.

use crate::error::OcrError;
use crate::output::{BoundingBox, RasterImage, Word};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// TSV layout level Tesseract uses for single words.
const WORD_LEVEL: &str = "5";

/// Number of tab-separated columns in a Tesseract TSV row.
const TSV_COLUMNS: usize = 12;

/// Anything that can turn a page image into words.
///
/// Calls block until the engine finishes; the orchestrator already runs on a
/// blocking thread.
pub trait TextRecognizer: Send + Sync {
    /// Engine identifier used in logs.
    fn name(&self) -> &'static str;

    /// Recognise the words in `image`, in engine order.
    fn recognize(&self, image: &RasterImage, language: &str) -> Result<Vec<Word>, OcrError>;
}

/// Tesseract invoked as an external process.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: PathBuf,
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check whether the executable can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &RasterImage, language: &str) -> Result<Vec<Word>, OcrError> {
        if image.is_empty() {
            return Err(OcrError::EmptyImage);
        }

        let mut input = tempfile::Builder::new()
            .prefix("pdfocr-page-")
            .suffix(".jpg")
            .tempfile()?;
        input.write_all(&image.bytes)?;
        input.flush()?;

        debug!(
            "Running {} on {}x{} image ({} bytes, lang={})",
            self.program.display(),
            image.width,
            image.height,
            image.bytes.len(),
            language
        );

        let output = Command::new(&self.program)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg("3")
            .arg("tsv")
            .output()
            .map_err(|e| OcrError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            debug!("tesseract: {}", line);
        }

        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse Tesseract TSV output into words.
///
/// The header row is skipped, as are non-word rows and words whose text is
/// blank. Confidence is clamped into `[0, 100]`.
pub fn parse_tsv(tsv: &str) -> Result<Vec<Word>, OcrError> {
    let mut words = Vec::new();

    for (idx, line) in tsv.lines().enumerate() {
        let line_no = idx + 1;
        if line.is_empty() || line.starts_with("level\t") {
            continue;
        }

        let cols: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if cols.len() < TSV_COLUMNS - 1 {
            return Err(OcrError::MalformedOutput {
                line: line_no,
                detail: format!("expected {} columns, got {}", TSV_COLUMNS, cols.len()),
            });
        }
        if cols[0] != WORD_LEVEL {
            continue;
        }

        let text = cols.get(11).map(|t| t.trim()).unwrap_or("");
        if text.is_empty() {
            continue;
        }

        let num = |i: usize, name: &str| -> Result<u32, OcrError> {
            cols[i].trim().parse::<u32>().map_err(|e| OcrError::MalformedOutput {
                line: line_no,
                detail: format!("bad {} '{}': {}", name, cols[i], e),
            })
        };
        let bbox = BoundingBox::from_ltwh(
            num(6, "left")?,
            num(7, "top")?,
            num(8, "width")?,
            num(9, "height")?,
        );

        let confidence = match cols[10].trim().parse::<f32>() {
            Ok(c) if c.is_finite() => c.clamp(0.0, 100.0),
            _ => {
                warn!("Line {}: unreadable confidence '{}', using 0", line_no, cols[10]);
                0.0
            }
        };

        words.push(Word {
            text: text.to_string(),
            bbox,
            confidence,
        });
    }

    Ok(words)
}
