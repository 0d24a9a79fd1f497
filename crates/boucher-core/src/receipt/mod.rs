//! Receipt field extraction module.
//!
//! Fields are extracted by a fixed sequence of [`RowExtractor`]s. Each one
//! receives the rows left over by the previous extractor and, on success,
//! hands on only the rows after the one it matched.

mod annotate;
mod parser;
pub mod rules;

pub use annotate::ConfidenceAnnotator;
pub use parser::{ExtractedFields, ReceiptParser};

use crate::ocr::Row;

/// Outcome of one field extraction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldResult {
    /// The field was located.
    Found {
        value: String,
        confidence: Option<f32>,
    },
    /// No row matched the field's heuristics.
    NotFound,
}

impl FieldResult {
    pub fn found(value: impl Into<String>, confidence: Option<f32>) -> Self {
        FieldResult::Found {
            value: value.into(),
            confidence,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldResult::Found { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            FieldResult::Found { value, .. } => Some(value),
            FieldResult::NotFound => None,
        }
    }
}

/// A field result together with the rows still available to later extractors.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction<'r> {
    pub result: FieldResult,
    pub remaining: &'r [Row],
}

impl<'r> Extraction<'r> {
    /// A miss: nothing is consumed.
    pub fn not_found(rows: &'r [Row]) -> Self {
        Self {
            result: FieldResult::NotFound,
            remaining: rows,
        }
    }

    /// A match on `rows[index]`; that row and everything before it is consumed.
    pub fn found_at(rows: &'r [Row], index: usize, result: FieldResult) -> Self {
        Self {
            result,
            remaining: &rows[index + 1..],
        }
    }
}

/// Trait for extractors that scan reading rows front to back.
pub trait RowExtractor {
    /// Field name used in logs.
    fn field(&self) -> &'static str;

    /// Search `rows` for the field.
    fn extract<'r>(&self, rows: &'r [Row]) -> Extraction<'r>;
}
