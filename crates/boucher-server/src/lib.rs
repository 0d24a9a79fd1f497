//! HTTP service for bank-transfer receipt processing.
//!
//! One endpoint accepts a receipt image as multipart upload and answers with
//! the four annotated fields.

mod error;
mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use boucher_core::{BoucherConfig, ReceiptParser, TokenSource};

pub use error::{ErrorBody, ErrorKind, ServerError};
pub use handlers::{health_check, process_receipt, HealthResponse};

/// State shared by every request.
///
/// The OCR engine and parser are built once at startup and only read here.
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<ReceiptParser>,
    pub source: Arc<dyn TokenSource>,
    pub image_field: String,
    pub uniform_error_status: bool,
    pub ocr_timeout: Duration,
}

impl AppState {
    pub fn new(parser: ReceiptParser, source: Arc<dyn TokenSource>, config: &BoucherConfig) -> Self {
        Self {
            parser: Arc::new(parser),
            source,
            image_field: config.server.image_field.clone(),
            uniform_error_status: config.server.uniform_error_status,
            ocr_timeout: Duration::from_secs(config.ocr.timeout_secs),
        }
    }

    /// Override the OCR deadline.
    pub fn with_ocr_timeout(mut self, timeout: Duration) -> Self {
        self.ocr_timeout = timeout;
        self
    }
}

/// Build the router with all endpoints.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/procesar_boucher", post(process_receipt))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server on the configured address.
pub async fn start_server(config: &BoucherConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr = &config.server.bind_addr;
    tracing::info!("Starting receipt server on {}", addr);

    let app = build_router(state, config.server.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}
