//! HTTP surface: `POST /process-pdf` and `GET /health`.
//!
//! The handler only decodes the request and maps outcomes to status codes;
//! all PDF work happens behind [`DocumentProcessor`].

use crate::error::ProcessError;
use crate::output::DocumentResult;
use crate::pipeline::input;
use crate::process::DocumentProcessor;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    processor: Arc<dyn DocumentProcessor>,
}

impl AppState {
    pub fn new(processor: Arc<dyn DocumentProcessor>) -> Self {
        Self { processor }
    }
}

/// Read the `pdf` field of a request body.
///
/// Absent, `null`, `false`, `0` and non-object bodies count as no PDF; any
/// other non-string value cannot be base64.
pub fn pdf_field(body: &Value) -> Result<Option<&str>, ProcessError> {
    match body.get("pdf") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ProcessError::InvalidBase64 {
            detail: format!("expected a base64 string, got {}", other),
        }),
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Everything the endpoint can answer with instead of a page list.
#[derive(Debug)]
pub enum ApiError {
    /// Fatal processing error.
    Process(ProcessError),
    /// The body could not be read as JSON.
    Rejected { status: StatusCode, message: String },
    /// A handler panicked.
    Panicked(String),
}

impl From<ProcessError> for ApiError {
    fn from(e: ProcessError) -> Self {
        Self::Process(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413; any other unreadable body is the
        // client's fault.
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Process(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Process(e) if e.is_document_error() => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load PDF document".to_string(),
            ),
            Self::Process(ProcessError::Internal(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
            ),
            Self::Process(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", e),
            ),
            Self::Rejected { status, message } => (*status, message.clone()),
            Self::Panicked(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        (status, Json(ErrorResponse { error })).into_response()
    }
}

async fn process_pdf_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DocumentResult>, ApiError> {
    let body = match payload {
        Ok(Json(body)) => body,
        // A body that is not declared as JSON carries no `pdf` field.
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Null,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            return Err(rejection.into());
        }
    };

    let bytes = pdf_field(&body)
        .and_then(input::decode_pdf)
        .map_err(|e| {
            warn!("Bad request: {}", e);
            ApiError::from(e)
        })?;

    info!("Received PDF ({} bytes)", bytes.len());

    let result = state.processor.process(bytes).await.map_err(|e| {
        error!("Error processing PDF: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(result))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    error!("Request handler panicked: {}", detail);
    ApiError::Panicked(detail).into_response()
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/process-pdf", post(process_pdf_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C or SIGTERM.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("pdfocr server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown..."),
    }
}
