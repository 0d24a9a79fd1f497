//! Core library for bank-transfer receipt OCR.
//!
//! This crate provides:
//! - OCR tokens and the engine-provider interface ([`TokenSource`])
//! - reconstruction of reading rows from unordered tokens
//! - sequential extraction of amount, date, destination and operation number
//! - confidence annotation of the extracted fields

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;

pub use error::{BoucherError, OcrError, Result};
pub use models::config::BoucherConfig;
pub use models::receipt::{AnnotatedField, Observation, ReceiptFields};
pub use ocr::{cluster_rows, Row, RowClusterer, RowToken, StaticTokens, Token, TokenSource};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use receipt::{ConfidenceAnnotator, ExtractedFields, FieldResult, ReceiptParser};
