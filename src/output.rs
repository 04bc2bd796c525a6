//! Result types returned by the processing pipeline.
//!
//! Internally a page outcome is a tagged union ([`PageResult`]) so callers can
//! match on success or failure. On the wire every page has the same shape:
//!
//! ```json
//! { "image": "data:image/jpeg;base64,...", "words": [ ... ] }
//! { "image": "", "words": [], "error": "Failed to load page 3" }
//! ```

use crate::error::PageError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize, Serializer};

/// An encoded page raster plus its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Encoded image bytes (JPEG).
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. `image/jpeg`.
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl RasterImage {
    /// Render the image as a self-contained `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Serialize for RasterImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

/// Pixel-space rectangle a recognised word occupies. Origin is top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl BoundingBox {
    /// Build from the `left, top, width, height` layout OCR engines report.
    pub fn from_ltwh(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            x0: left,
            y0: top,
            x1: left.saturating_add(width),
            y1: top.saturating_add(height),
        }
    }
}

/// One recognised word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: BoundingBox,
    /// Engine confidence in `[0, 100]`.
    pub confidence: f32,
}

/// Outcome of processing a single page.
#[derive(Debug, Clone)]
pub enum PageResult {
    Success { image: RasterImage, words: Vec<Word> },
    Failure { error: PageError },
}

impl PageResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn words(&self) -> &[Word] {
        match self {
            Self::Success { words, .. } => words,
            Self::Failure { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&PageError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}

/// Uniform wire shape shared by both variants.
#[derive(Serialize)]
struct PageResultWire<'a> {
    image: String,
    words: &'a [Word],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Serialize for PageResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Success { image, words } => PageResultWire {
                image: image.to_data_uri(),
                words,
                error: None,
            },
            Self::Failure { error } => PageResultWire {
                image: String::new(),
                words: &[],
                error: Some(error.to_string()),
            },
        };
        wire.serialize(serializer)
    }
}

/// Every page of a document, in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentResult {
    pub pages: Vec<PageResult>,
}

impl DocumentResult {
    pub fn succeeded(&self) -> usize {
        self.pages.iter().filter(|p| p.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.pages.len() - self.succeeded()
    }
}
