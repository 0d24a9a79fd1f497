//! End-to-end tests from OCR tokens to annotated receipt fields.

use boucher_core::{
    AnnotatedField, BoucherConfig, Observation, ReceiptParser, Row, Token,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Tokens laid out like a scanned transfer receipt, shuffled.
fn receipt_tokens() -> Vec<Token> {
    vec![
        Token::from_rect(220.0, 402.0, 330.0, 424.0, "12345678", 0.93),
        Token::from_rect(20.0, 20.0, 260.0, 44.0, "Constancia de Transferencia", 0.97),
        Token::from_rect(120.0, 81.0, 220.0, 109.0, "350.00", 0.92),
        Token::from_rect(20.0, 160.0, 110.0, 182.0, "Jueves,", 0.81),
        Token::from_rect(20.0, 400.0, 210.0, 422.0, "Número de operación", 0.77),
        Token::from_rect(20.0, 80.0, 100.0, 108.0, "S/", 0.88),
        Token::from_rect(120.0, 161.0, 300.0, 183.0, "14 marzo 2024 - 10:32", 0.9),
        Token::from_rect(20.0, 280.0, 200.0, 302.0, "Moneda Soles", 0.52),
    ]
}

#[test]
fn test_receipt_from_tokens() {
    let parser = ReceiptParser::new().unwrap();
    let receipt = parser.parse_tokens(receipt_tokens());

    assert_eq!(
        serde_json::to_value(&receipt).unwrap(),
        json!({
            "monto": ["350", 0.92f32, ""],
            "fecha": ["14/03/2024", 0.81f32, ""],
            "numero_operacion": ["12345678", 0.77f32, ""],
            "destino": ["Cuenta Corriente", 0.52f32, "Obs"],
        })
    );
}

#[test]
fn test_rows_follow_reading_order() {
    let parser = ReceiptParser::new().unwrap();
    let rows = parser.rows(receipt_tokens());

    let lines: Vec<String> = rows.iter().map(Row::text).collect();
    assert_eq!(
        lines,
        vec![
            "Constancia de Transferencia",
            "S/ 350.00",
            "Jueves, 14 marzo 2024 - 10:32",
            "Moneda Soles",
            "Número de operación 12345678",
        ]
    );
}

#[test]
fn test_date_line_with_connector() {
    let parser = ReceiptParser::new().unwrap();
    let receipt = parser.parse_tokens(vec![Token::from_rect(
        0.0,
        0.0,
        300.0,
        20.0,
        "JUEVES 14 DE MARZO 2024",
        0.9,
    )]);

    assert_eq!(receipt.date.value(), Some("14/03/2024"));
    assert_eq!(receipt.date.confidence, Some(0.9));
    assert_eq!(receipt.date.observation, Observation::Clear);
}

#[test]
fn test_amount_token() {
    let parser = ReceiptParser::new().unwrap();
    let receipt = parser.parse_tokens(vec![Token::from_rect(0.0, 0.0, 90.0, 20.0, "350.00 soles", 0.4)]);

    assert_eq!(receipt.amount.value(), Some("350"));
    assert_eq!(receipt.amount.observation, Observation::Obs);
}

#[test]
fn test_operation_number_row() {
    let parser = ReceiptParser::new().unwrap();
    let receipt = parser.parse_tokens(vec![Token::from_rect(
        0.0,
        0.0,
        300.0,
        20.0,
        "Número de operación: 12345678",
        0.85,
    )]);

    assert_eq!(receipt.operation_number.value(), Some("12345678"));
}

#[test]
fn test_no_weekday_means_missing_date() {
    let parser = ReceiptParser::new().unwrap();
    let receipt = parser.parse_tokens(vec![
        Token::from_rect(0.0, 0.0, 90.0, 20.0, "S/ 450", 0.9),
        Token::from_rect(0.0, 40.0, 90.0, 60.0, "14/03/2024", 0.9),
    ]);

    assert_eq!(receipt.date, AnnotatedField::missing());
    assert_eq!(
        serde_json::to_value(&receipt.date).unwrap(),
        json!([null, null, "Obs"])
    );
    assert_eq!(receipt.amount.value(), Some("450"));
}

#[test]
fn test_empty_ocr_output() {
    let receipt = ReceiptParser::new().unwrap().parse_tokens(Vec::new());
    assert_eq!(receipt.flagged().len(), 4);
}

#[test]
fn test_configured_template_variant() {
    let mut config = BoucherConfig::default();
    config.extraction.amount_denominations = vec!["275".to_string()];
    config.extraction.operation_digits = 6;

    let parser = ReceiptParser::from_config(&config).unwrap();
    let receipt = parser.parse_tokens(vec![
        Token::from_rect(0.0, 0.0, 90.0, 20.0, "S/ 275", 0.9),
        Token::from_rect(0.0, 40.0, 190.0, 60.0, "Operación 654321", 0.9),
    ]);

    assert_eq!(receipt.amount.value(), Some("275"));
    assert_eq!(receipt.operation_number.value(), Some("654321"));
}
