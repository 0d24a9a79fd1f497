//! HTTP request handlers.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use boucher_core::ReceiptFields;

use crate::{AppState, ServerError};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Extract the receipt fields from an uploaded image.
pub async fn process_receipt(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = async {
        let mut multipart = multipart.map_err(|e| ServerError::Upload(e.body_text()))?;
        let image = read_field(&mut multipart, &state.image_field).await?;
        info!("Received receipt image: {} bytes", image.len());
        state.process_image_bytes(image).await
    }
    .await;

    match result {
        Ok(fields) => Json(fields).into_response(),
        Err(e) => {
            warn!("Receipt request failed: {}", e);
            e.into_response_with(state.uniform_error_status)
        }
    }
}

async fn read_field(multipart: &mut Multipart, name: &str) -> Result<Bytes, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Upload(e.body_text()))?
    {
        if field.name() == Some(name) {
            return field
                .bytes()
                .await
                .map_err(|e| ServerError::Upload(e.body_text()));
        }
    }
    Err(ServerError::Upload(format!("missing form field '{}'", name)))
}

impl AppState {
    /// Decode, recognize and parse one image under the OCR deadline.
    pub async fn process_image_bytes(&self, bytes: Bytes) -> Result<ReceiptFields, ServerError> {
        let parser = self.parser.clone();
        let source = self.source.clone();

        let task = tokio::task::spawn_blocking(move || {
            let image = image::load_from_memory(&bytes).map_err(|e| ServerError::Decode(e.to_string()))?;
            let tokens = source.recognize(&image)?;
            Ok::<_, ServerError>(parser.parse_tokens(tokens))
        });

        match tokio::time::timeout(self.ocr_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ServerError::Internal(join_error.to_string())),
            Err(_) => Err(ServerError::Timeout(self.ocr_timeout.as_secs())),
        }
    }
}
