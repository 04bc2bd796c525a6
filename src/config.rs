//! Configuration types for PDF page OCR.
//!
//! All processing behaviour is controlled through [`ProcessingConfig`], built
//! via its [`ProcessingConfigBuilder`]. The HTTP server holds one config for
//! its whole lifetime and shares it read-only across requests.

use crate::error::ProcessError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for rasterising and recognising a PDF.
///
/// # Example
/// ```rust
/// use pdfocr::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .scale(2.0)
///     .language("deu")
///     .build()
///     .unwrap();
/// assert_eq!(config.jpeg_quality, 70);
/// ```
#[derive(Clone)]
pub struct ProcessingConfig {
    /// Viewport scale factor used when rasterising each page. Default: 1.5.
    ///
    /// 1.0 renders at 72 DPI; 1.5 gives 108 DPI, enough for Tesseract to read
    /// body text while keeping the JPEG payload in the response small.
    pub scale: f32,

    /// JPEG quality (1–100) of the returned page image. Default: 70.
    pub jpeg_quality: u8,

    /// Tesseract language code, e.g. `eng` or `eng+deu`. Default: `eng`.
    pub language: String,

    /// Tesseract executable. Default: `tesseract` resolved through `PATH`.
    pub tesseract_path: PathBuf,

    /// Explicit pdfium shared library. `None` binds the system library.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Receives per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            scale: 1.5,
            jpeg_quality: 70,
            language: "eng".to_string(),
            tesseract_path: PathBuf::from("tesseract"),
            pdfium_lib_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProcessingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingConfig")
            .field("scale", &self.scale)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("language", &self.language)
            .field("tesseract_path", &self.tesseract_path)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ProcessingProgressCallback>"),
            )
            .finish()
    }
}

impl ProcessingConfig {
    /// Create a new builder for `ProcessingConfig`.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ProcessingConfig`].
#[derive(Debug)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    pub fn tesseract_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tesseract_path = path.into();
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessingConfig, ProcessError> {
        let c = &self.config;
        if !c.scale.is_finite() || c.scale <= 0.0 || c.scale > 10.0 {
            return Err(ProcessError::InvalidConfig(format!(
                "scale must be in (0, 10], got {}",
                c.scale
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(ProcessError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.language.trim().is_empty() {
            return Err(ProcessError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_behaviour() {
        let c = ProcessingConfig::default();
        assert_eq!(c.scale, 1.5);
        assert_eq!(c.jpeg_quality, 70);
        assert_eq!(c.language, "eng");
        assert_eq!(c.tesseract_path, PathBuf::from("tesseract"));
        assert!(c.pdfium_lib_path.is_none());
    }

    #[test]
    fn builder_rejects_non_positive_scale() {
        assert!(ProcessingConfig::builder().scale(0.0).build().is_err());
        assert!(ProcessingConfig::builder().scale(-1.0).build().is_err());
        assert!(ProcessingConfig::builder().scale(f32::NAN).build().is_err());
    }

    #[test]
    fn builder_rejects_bad_quality_and_language() {
        assert!(ProcessingConfig::builder().jpeg_quality(0).build().is_err());
        assert!(ProcessingConfig::builder().jpeg_quality(101).build().is_err());
        assert!(ProcessingConfig::builder().language("  ").build().is_err());
    }

    #[test]
    fn builder_sets_fields() {
        let c = ProcessingConfig::builder()
            .scale(2.0)
            .jpeg_quality(85)
            .language("fra")
            .tesseract_path("/usr/local/bin/tesseract")
            .pdfium_lib_path("/opt/pdfium/libpdfium.so")
            .build()
            .unwrap();
        assert_eq!(c.scale, 2.0);
        assert_eq!(c.jpeg_quality, 85);
        assert_eq!(c.language, "fra");
        assert_eq!(c.pdfium_lib_path, Some(PathBuf::from("/opt/pdfium/libpdfium.so")));
    }
}
