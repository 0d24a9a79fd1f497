//! Sequential receipt parser: amount, date, destination, operation number.

use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::BoucherConfig;
use crate::models::receipt::{AnnotatedField, ReceiptFields};
use crate::ocr::{Row, RowClusterer, Token, TokenSource};

use super::rules::{AmountExtractor, DateExtractor, DestinationExtractor, OperationNumberExtractor};
use super::{ConfidenceAnnotator, FieldResult, RowExtractor};

/// Raw extraction results, before confidence annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub amount: FieldResult,
    pub date: FieldResult,
    pub destination: FieldResult,
    pub operation_number: FieldResult,
}

impl ExtractedFields {
    /// Annotate every field with `annotator`.
    pub fn annotate(self, annotator: &ConfidenceAnnotator) -> ReceiptFields {
        self.map(|result| annotator.annotate(result))
    }

    /// Convert each field exactly once with `f`.
    pub fn map(self, mut f: impl FnMut(FieldResult) -> AnnotatedField) -> ReceiptFields {
        ReceiptFields {
            amount: f(self.amount),
            date: f(self.date),
            operation_number: f(self.operation_number),
            destination: f(self.destination),
        }
    }
}

/// Receipt parser for the bank-transfer template.
pub struct ReceiptParser {
    clusterer: RowClusterer,
    amount: AmountExtractor,
    date: DateExtractor,
    destination: DestinationExtractor,
    operation: OperationNumberExtractor,
    annotator: ConfidenceAnnotator,
}

impl ReceiptParser {
    /// Create a parser with the template's default tables.
    pub fn new() -> Result<Self> {
        Self::from_config(&BoucherConfig::default())
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &BoucherConfig) -> Result<Self> {
        config.validate()?;
        let extraction = &config.extraction;

        Ok(Self {
            clusterer: RowClusterer::new().with_threshold(config.clustering.row_threshold),
            amount: AmountExtractor::from_config(extraction),
            date: DateExtractor::from_config(extraction)?,
            destination: DestinationExtractor::from_config(extraction),
            operation: OperationNumberExtractor::from_config(extraction),
            annotator: ConfidenceAnnotator::new(extraction.min_confidence),
        })
    }

    /// Group tokens into reading rows.
    pub fn rows(&self, tokens: Vec<Token>) -> Vec<Row> {
        self.clusterer.cluster(tokens)
    }

    /// Run the four extractors in template order over `rows`.
    ///
    /// Each extractor only sees the rows left after the previous one matched.
    pub fn extract(&self, rows: &[Row]) -> ExtractedFields {
        let amount = run_stage(&self.amount, rows);
        let date = run_stage(&self.date, amount.remaining);
        let destination = run_stage(&self.destination, date.remaining);
        let operation = run_stage(&self.operation, destination.remaining);

        ExtractedFields {
            amount: amount.result,
            date: date.result,
            destination: destination.result,
            operation_number: operation.result,
        }
    }

    /// Extract and annotate the fields of already clustered rows.
    pub fn parse_rows(&self, rows: &[Row]) -> ReceiptFields {
        self.extract(rows).annotate(&self.annotator)
    }

    /// Cluster OCR tokens and extract the receipt fields.
    pub fn parse_tokens(&self, tokens: Vec<Token>) -> ReceiptFields {
        let start = Instant::now();
        let token_count = tokens.len();
        let rows = self.rows(tokens);
        let fields = self.parse_rows(&rows);

        info!(
            "Parsed receipt: {} tokens, {} rows, {} flagged fields in {}ms",
            token_count,
            rows.len(),
            fields.flagged().len(),
            start.elapsed().as_millis()
        );

        fields
    }

    /// Recognize an image with `source` and extract the receipt fields.
    pub fn parse_image(&self, source: &dyn TokenSource, image: &DynamicImage) -> Result<ReceiptFields> {
        let tokens = source.recognize(image)?;
        Ok(self.parse_tokens(tokens))
    }
}

fn run_stage<'r, E: RowExtractor>(extractor: &E, rows: &'r [Row]) -> super::Extraction<'r> {
    let extraction = extractor.extract(rows);
    debug!(
        "{}: {:?}, {} of {} rows left",
        extractor.field(),
        extraction.result,
        extraction.remaining.len(),
        rows.len()
    );
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::Observation;
    use pretty_assertions::assert_eq;

    fn receipt_rows() -> Vec<Row> {
        vec![
            Row::from_pairs([("Constancia de Pago", 0.95)]),
            Row::from_pairs([("S/", 0.9), ("350.00", 0.91)]),
            Row::from_pairs([("Jueves,", 0.88), ("14 marzo 2024", 0.9), ("10:32 am", 0.7)]),
            Row::from_pairs([("Pagos Varios", 0.45)]),
            Row::from_pairs([("Número de operación", 0.83), ("01234567", 0.9)]),
        ]
    }

    #[test]
    fn test_extract_full_receipt() {
        let parser = ReceiptParser::new().unwrap();
        let fields = parser.extract(&receipt_rows());

        assert_eq!(
            fields,
            ExtractedFields {
                amount: FieldResult::found("350", Some(0.91)),
                date: FieldResult::found("14/03/2024", Some(0.88)),
                destination: FieldResult::found("Servicio", Some(0.45)),
                operation_number: FieldResult::found("01234567", Some(0.83)),
            }
        );
    }

    #[test]
    fn test_annotated_receipt() {
        let parser = ReceiptParser::new().unwrap();
        let receipt = parser.parse_rows(&receipt_rows());

        assert_eq!(receipt.amount.observation, Observation::Clear);
        assert_eq!(receipt.destination.value(), Some("Servicio"));
        assert_eq!(receipt.destination.observation, Observation::Obs);
        assert_eq!(receipt.flagged(), vec!["destino"]);
    }

    #[test]
    fn test_earlier_stage_consumes_rows() {
        // The amount row sits below the date, so the date is no longer visible.
        let rows = vec![
            Row::from_pairs([("Jueves, 14 marzo 2024", 0.9)]),
            Row::from_pairs([("S/ 400", 0.9)]),
            Row::from_pairs([("Moneda Soles", 0.9)]),
        ];
        let fields = ReceiptParser::new().unwrap().extract(&rows);

        assert_eq!(fields.amount, FieldResult::found("400", Some(0.9)));
        assert_eq!(fields.date, FieldResult::NotFound);
        assert_eq!(fields.destination, FieldResult::found("Cuenta Corriente", Some(0.9)));
    }

    #[test]
    fn test_missing_stage_does_not_consume() {
        let rows = vec![
            Row::from_pairs([("Moneda", 0.9)]),
            Row::from_pairs([("Operación 87654321", 0.9)]),
        ];
        let fields = ReceiptParser::new().unwrap().extract(&rows);

        assert_eq!(fields.amount, FieldResult::NotFound);
        assert_eq!(fields.date, FieldResult::NotFound);
        assert_eq!(fields.destination, FieldResult::found("Cuenta Corriente", Some(0.9)));
        assert_eq!(fields.operation_number, FieldResult::found("87654321", Some(0.9)));
    }

    #[test]
    fn test_each_field_annotated_once() {
        let parser = ReceiptParser::new().unwrap();
        let annotator = ConfidenceAnnotator::default();
        let mut calls = 0;

        let receipt = parser.extract(&receipt_rows()).map(|result| {
            calls += 1;
            annotator.annotate(result)
        });

        assert_eq!(calls, 4);
        let value = serde_json::to_value(&receipt).unwrap();
        for field in value.as_object().unwrap().values() {
            assert_eq!(field.as_array().unwrap().len(), 3);
        }
    }

    #[test]
    fn test_parse_image_with_static_tokens() {
        use crate::ocr::StaticTokens;

        let source = StaticTokens::new(vec![
            Token::from_rect(10.0, 100.0, 200.0, 120.0, "Operación 11223344", 0.9),
            Token::from_rect(10.0, 10.0, 200.0, 30.0, "S/ 500.00", 0.9),
        ]);
        let receipt = ReceiptParser::new()
            .unwrap()
            .parse_image(&source, &DynamicImage::new_rgb8(4, 4))
            .unwrap();

        assert_eq!(receipt.amount.value(), Some("500"));
        assert_eq!(receipt.operation_number.value(), Some("11223344"));
        assert_eq!(receipt.date, AnnotatedField::missing());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BoucherConfig::default();
        config.extraction.operation_digits = 0;
        assert!(ReceiptParser::from_config(&config).is_err());
    }
}
