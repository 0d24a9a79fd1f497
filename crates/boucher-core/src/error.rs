//! Error types for the boucher-core library.

use thiserror::Error;

/// Main error type for the boucher library.
#[derive(Error, Debug)]
pub enum BoucherError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Token dump or config file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The engine lock was poisoned by a panic in an earlier call.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
}

/// Result type for the boucher library.
pub type Result<T> = std::result::Result<T, BoucherError>;
