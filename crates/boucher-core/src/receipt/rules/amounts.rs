//! Transferred amount extraction.

use crate::models::config::ExtractionConfig;
use crate::ocr::Row;

use super::patterns::{DIGIT_RUN, WHOLE_AMOUNT};
use crate::receipt::{Extraction, FieldResult, RowExtractor};

/// Amount field extractor.
///
/// A token matches when it holds a three-digit amount with `.00` cents, or
/// failing that, one of the template's usual denominations.
pub struct AmountExtractor {
    denominations: Vec<String>,
}

impl AmountExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            denominations: config.amount_denominations.clone(),
        }
    }

    /// Replace the denomination allow-list.
    pub fn with_denominations<S: Into<String>>(mut self, denominations: impl IntoIterator<Item = S>) -> Self {
        self.denominations = denominations.into_iter().map(Into::into).collect();
        self
    }

    /// Amount carried by a single token, if any.
    pub fn match_token(&self, text: &str) -> Option<String> {
        if let Some(caps) = WHOLE_AMOUNT.captures(text) {
            return Some(caps[1].to_string());
        }

        if self.denominations.iter().any(|d| text.contains(d.as_str())) {
            return DIGIT_RUN.find(text).map(|m| m.as_str().to_string());
        }

        None
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RowExtractor for AmountExtractor {
    fn field(&self) -> &'static str {
        "monto"
    }

    fn extract<'r>(&self, rows: &'r [Row]) -> Extraction<'r> {
        for (index, row) in rows.iter().enumerate() {
            for token in row.tokens() {
                if let Some(value) = self.match_token(&token.text) {
                    return Extraction::found_at(
                        rows,
                        index,
                        FieldResult::found(value, Some(token.confidence)),
                    );
                }
            }
        }
        Extraction::not_found(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_amount_with_cents() {
        let extractor = AmountExtractor::new();
        assert_eq!(extractor.match_token("350.00 soles"), Some("350".to_string()));
        assert_eq!(extractor.match_token("S/275.00"), Some("275".to_string()));
        assert_eq!(extractor.match_token("S/ 1,250.00"), Some("250".to_string()));
    }

    #[test]
    fn test_denomination_allow_list() {
        let extractor = AmountExtractor::new();
        assert_eq!(extractor.match_token("S/450"), Some("450".to_string()));
        assert_eq!(extractor.match_token("S/ 4500,5"), Some("4500".to_string()));
        assert_eq!(extractor.match_token("S/ 275"), None);

        let custom = AmountExtractor::new().with_denominations(["275"]);
        assert_eq!(custom.match_token("S/ 275"), Some("275".to_string()));
        assert_eq!(custom.match_token("S/450"), None);
    }

    #[test]
    fn test_consumes_matched_row() {
        let rows = vec![
            Row::from_pairs([("Constancia de pago", 0.9)]),
            Row::from_pairs([("S/", 0.8), ("350.00", 0.55)]),
            Row::from_pairs([("Jueves, 14 marzo 2024", 0.9)]),
        ];

        let extraction = AmountExtractor::new().extract(&rows);
        assert_eq!(extraction.result, FieldResult::found("350", Some(0.55)));
        assert_eq!(extraction.remaining, &rows[2..]);
    }

    #[test]
    fn test_no_amount_leaves_rows() {
        let rows = vec![Row::from_pairs([("Pagos Varios", 0.9)])];
        let extraction = AmountExtractor::new().extract(&rows);
        assert_eq!(extraction.result, FieldResult::NotFound);
        assert_eq!(extraction.remaining.len(), 1);
    }
}
