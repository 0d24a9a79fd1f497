//! Destination account type extraction.

use crate::models::config::{DestinationRule, ExtractionConfig};
use crate::ocr::Row;
use crate::receipt::{Extraction, FieldResult, RowExtractor};

/// Destination field extractor, driven by an ordered keyword table.
pub struct DestinationExtractor {
    rules: Vec<DestinationRule>,
}

impl DestinationExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            rules: config.destinations.clone(),
        }
    }

    /// Label of the first rule whose keyword occurs in `text`.
    pub fn match_token(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| text.contains(rule.keyword.as_str()))
            .map(|rule| rule.label.as_str())
    }
}

impl Default for DestinationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RowExtractor for DestinationExtractor {
    fn field(&self) -> &'static str {
        "destino"
    }

    fn extract<'r>(&self, rows: &'r [Row]) -> Extraction<'r> {
        for (index, row) in rows.iter().enumerate() {
            for token in row.tokens() {
                if let Some(label) = self.match_token(&token.text) {
                    return Extraction::found_at(
                        rows,
                        index,
                        FieldResult::found(label, Some(token.confidence)),
                    );
                }
            }
        }
        Extraction::not_found(rows)
    }
}
