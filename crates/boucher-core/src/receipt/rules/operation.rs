//! Operation number extraction.
//!
//! The number follows a "Número de operación" label, either on the same
//! line or wrapped onto the following lines.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::ocr::Row;
use crate::receipt::{Extraction, FieldResult, RowExtractor};

use super::patterns::{digits_of, is_numeric, DIGIT_RUN};

/// Operation number field extractor.
pub struct OperationNumberExtractor {
    keywords: Vec<String>,
    digits: usize,
}

impl OperationNumberExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            keywords: config
                .operation_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            digits: config.operation_digits,
        }
    }

    /// Whether the row carries one of the operation number labels.
    pub fn is_label_row(&self, row: &Row) -> bool {
        let text = row.text().to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Number found on the label row itself.
    ///
    /// The first digit run long enough to hold a number wins, cut to its
    /// leading `digits`; otherwise every digit of the row is joined.
    fn from_label_row(&self, text: &str) -> Result<String, String> {
        if let Some(run) = DIGIT_RUN
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|run| run.len() >= self.digits)
        {
            return Ok(run[..self.digits].to_string());
        }

        let mut number = digits_of(text);
        if number.len() >= self.digits {
            number.truncate(self.digits);
            Ok(number)
        } else {
            Err(number)
        }
    }
}

impl Default for OperationNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RowExtractor for OperationNumberExtractor {
    fn field(&self) -> &'static str {
        "numero_operacion"
    }

    fn extract<'r>(&self, rows: &'r [Row]) -> Extraction<'r> {
        let Some(index) = rows.iter().position(|row| self.is_label_row(row)) else {
            return Extraction::not_found(rows);
        };

        let label_row = &rows[index];
        let confidence = label_row.first_confidence();

        let mut number = match self.from_label_row(&label_row.text()) {
            Ok(number) => {
                return Extraction::found_at(rows, index, FieldResult::found(number, confidence));
            }
            Err(partial) => partial,
        };

        for (offset, row) in rows[index + 1..].iter().enumerate() {
            number.push_str(&digits_of(&row.text()));
            if !is_numeric(&number) {
                debug!("Operation number continuation stopped at row {}", index + 1 + offset);
                break;
            }
            if number.len() >= self.digits {
                number.truncate(self.digits);
                return Extraction::found_at(
                    rows,
                    index + 1 + offset,
                    FieldResult::found(number, confidence),
                );
            }
        }

        Extraction::not_found(rows)
    }
}
