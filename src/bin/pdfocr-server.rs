//! HTTP server binary for pdfocr.
//!
//! A thin shim over the library crate: maps flags and environment variables
//! to `ProcessingConfig`, then serves the router until shutdown.

use anyhow::{Context, Result};
use clap::Parser;
use pdfocr::server::{self, AppState};
use pdfocr::{LoggingProgress, PdfiumTesseractProcessor, ProcessingConfig, TesseractRecognizer};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = "\
EXAMPLES:
  pdfocr-server
  PORT=8080 pdfocr-server --language eng+deu
  pdfocr-server --pdfium-lib /opt/pdfium/lib --tesseract /usr/local/bin/tesseract

  curl -s localhost:3000/process-pdf \\
       -H 'Content-Type: application/json' \\
       -d \"{\\\"pdf\\\":\\\"$(base64 -w0 scan.pdf)\\\"}\"

Variables from a .env file in the working directory are loaded first.";

#[derive(Parser, Debug)]
#[command(
    name = "pdfocr-server",
    version,
    about = "Serve page images and OCR words for base64 PDFs over HTTP",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// TCP port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Page viewport scale used for rasterisation.
    #[arg(long, env = "PDFOCR_SCALE", default_value_t = 1.5)]
    scale: f32,

    /// JPEG quality of returned page images (1–100).
    #[arg(long, env = "PDFOCR_JPEG_QUALITY", default_value_t = 70,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Tesseract language(s), e.g. eng or eng+fra.
    #[arg(short, long, env = "PDFOCR_LANGUAGE", default_value = "eng")]
    language: String,

    /// Tesseract executable.
    #[arg(long, env = "TESSERACT_PATH", default_value = "tesseract")]
    tesseract: PathBuf,

    /// pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFOCR_VERBOSE")]
    verbose: bool,
}

fn build_config(cli: &Cli) -> Result<ProcessingConfig> {
    let mut builder = ProcessingConfig::builder()
        .scale(cli.scale)
        .jpeg_quality(cli.jpeg_quality)
        .language(cli.language.clone())
        .tesseract_path(cli.tesseract.clone())
        .progress_callback(Arc::new(LoggingProgress));

    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(path.clone());
    }

    builder.build().context("Invalid configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = build_config(&cli)?;
    tracing::info!("Starting pdfocr-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("{:?}", config);

    let tesseract = TesseractRecognizer::new(config.tesseract_path.clone());
    if !tesseract.is_available() {
        tracing::warn!(
            "'{}' could not be started; every page will fail OCR until it is installed",
            tesseract.program().display()
        );
    }

    let processor = PdfiumTesseractProcessor::new(config);
    let state = AppState::new(Arc::new(processor));

    let addr = SocketAddr::new(cli.host, cli.port);
    server::serve(addr, state)
        .await
        .with_context(|| format!("Server on {} failed", addr))
}
