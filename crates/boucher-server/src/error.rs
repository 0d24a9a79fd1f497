//! Request-level failures and their HTTP representation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use boucher_core::OcrError;

/// Category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Upload,
    Decode,
    Inference,
    Timeout,
    Internal,
}

/// A failure that abandons the whole request.
///
/// Field-level misses are not errors; they come back as flagged fields.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The multipart body or the image field is missing or malformed.
    #[error("upload error: {0}")]
    Upload(String),

    /// The uploaded bytes are not a decodable image.
    #[error("decode error: {0}")]
    Decode(String),

    /// The OCR engine failed.
    #[error("inference error: {0}")]
    Inference(#[from] OcrError),

    /// The OCR engine did not answer within the deadline.
    #[error("OCR did not finish within {0}s")]
    Timeout(u64),

    /// Unexpected failure, e.g. a panicked worker.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Body returned for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}

impl ServerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::Upload(_) => ErrorKind::Upload,
            ServerError::Decode(_) => ErrorKind::Decode,
            ServerError::Inference(_) => ErrorKind::Inference,
            ServerError::Timeout(_) => ErrorKind::Timeout,
            ServerError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Status used when error kinds are reported through the status code.
    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Upload => StatusCode::BAD_REQUEST,
            ErrorKind::Decode => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Inference => StatusCode::BAD_GATEWAY,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the response; with `uniform_status` every error is a 200.
    pub fn into_response_with(self, uniform_status: bool) -> Response {
        let status = if uniform_status {
            StatusCode::OK
        } else {
            self.status()
        };
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_statuses_by_kind() {
        assert_eq!(ServerError::Upload("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::Decode("x".into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ServerError::Inference(OcrError::Recognition("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(ServerError::Timeout(30).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ServerError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_uniform_status_keeps_error_body() {
        let response = ServerError::Decode("bad png".into()).into_response_with(true);
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "decode error: bad png");
        assert_eq!(value["kind"], "decode");
    }
}
