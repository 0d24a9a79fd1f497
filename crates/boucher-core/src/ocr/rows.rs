//! Reconstruction of physical reading rows from unordered OCR tokens.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Token;

/// Text and confidence of one token once its geometry has been dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowToken {
    pub text: String,
    pub confidence: f32,
}

impl RowToken {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Tokens presumed to lie on one physical line, in left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    tokens: Vec<RowToken>,
}

impl Row {
    pub fn new(tokens: Vec<RowToken>) -> Self {
        Self { tokens }
    }

    /// Build a row from `(text, confidence)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f32)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(text, confidence)| RowToken::new(text, confidence))
                .collect(),
        )
    }

    pub fn tokens(&self) -> &[RowToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token texts joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Confidence of the leftmost token.
    pub fn first_confidence(&self) -> Option<f32> {
        self.tokens.first().map(|t| t.confidence)
    }
}

/// Groups tokens into rows by comparing vertical midpoints.
#[derive(Debug, Clone)]
pub struct RowClusterer {
    threshold: f32,
}

impl RowClusterer {
    /// Create a clusterer with the default 30% threshold.
    pub fn new() -> Self {
        Self { threshold: 30.0 }
    }

    /// Set the maximum midpoint distance, in percent of the current row height.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Cluster tokens into rows, top-to-bottom then left-to-right.
    pub fn cluster(&self, mut tokens: Vec<Token>) -> Vec<Row> {
        tokens.sort_by(|a, b| a.first_y().total_cmp(&b.first_y()));

        let mut rows: Vec<Vec<Token>> = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        // Vertical span of `current`, across every corner of every token in it.
        let mut span = (f32::INFINITY, f32::NEG_INFINITY);

        for token in tokens {
            let (top, bottom) = token.y_span();

            if !current.is_empty() && self.relative_distance(span, (top, bottom)) > self.threshold {
                rows.push(std::mem::take(&mut current));
                span = (f32::INFINITY, f32::NEG_INFINITY);
            }

            span = (span.0.min(top), span.1.max(bottom));
            current.push(token);
        }

        if !current.is_empty() {
            rows.push(current);
        }

        debug!("Clustered tokens into {} rows", rows.len());

        rows.into_iter()
            .map(|mut row| {
                row.sort_by(|a, b| a.min_x().total_cmp(&b.min_x()));
                Row::new(
                    row.into_iter()
                        .map(|t| RowToken::new(t.text, t.confidence))
                        .collect(),
                )
            })
            .collect()
    }

    /// Midpoint distance between a row span and a token span, as a
    /// percentage of the row height.
    ///
    /// A zero-height row yields 0 when the midpoints coincide and infinity
    /// otherwise.
    fn relative_distance(&self, row: (f32, f32), token: (f32, f32)) -> f32 {
        let row_mid = (row.0 + row.1) / 2.0;
        let token_mid = (token.0 + token.1) / 2.0;
        let distance = (row_mid - token_mid).abs();
        let height = row.1 - row.0;

        if height == 0.0 {
            if distance == 0.0 { 0.0 } else { f32::INFINITY }
        } else {
            distance / height * 100.0
        }
    }
}

impl Default for RowClusterer {
    fn default() -> Self {
        Self::new()
    }
}

/// Cluster tokens with the given threshold.
pub fn cluster_rows(tokens: Vec<Token>, threshold: f32) -> Vec<Row> {
    RowClusterer::new().with_threshold(threshold).cluster(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(rows: &[Row]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.tokens().iter().map(|t| t.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_groups_lines_and_orders_left_to_right() {
        let tokens = vec![
            Token::from_rect(200.0, 52.0, 300.0, 72.0, "350.00", 0.95),
            Token::from_rect(10.0, 10.0, 120.0, 30.0, "Constancia", 0.9),
            Token::from_rect(10.0, 50.0, 60.0, 70.0, "S/", 0.8),
            Token::from_rect(130.0, 11.0, 220.0, 31.0, "de pago", 0.85),
        ];

        let rows = RowClusterer::new().cluster(tokens);
        assert_eq!(
            texts(&rows),
            vec![vec!["Constancia", "de pago"], vec!["S/", "350.00"]]
        );
        assert_eq!(rows[1].text(), "S/ 350.00");
        assert_eq!(rows[1].first_confidence(), Some(0.8));
    }

    #[test]
    fn test_row_span_covers_every_token() {
        // The third token is far from the second token's midpoint but close
        // to the midpoint of the combined row span.
        let tokens = vec![
            Token::from_rect(0.0, 0.0, 10.0, 20.0, "a", 0.9),
            Token::from_rect(20.0, 3.0, 30.0, 6.0, "b", 0.9),
            Token::from_rect(40.0, 6.0, 50.0, 10.0, "c", 0.9),
        ];

        let rows = RowClusterer::new().cluster(tokens);
        assert_eq!(texts(&rows), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_threshold_boundary() {
        // Row 0..20 has midpoint 10; token 16..26 has midpoint 21 -> 55%.
        let tokens = vec![
            Token::from_rect(0.0, 0.0, 10.0, 20.0, "top", 0.9),
            Token::from_rect(20.0, 16.0, 30.0, 26.0, "low", 0.9),
        ];

        assert_eq!(RowClusterer::new().cluster(tokens.clone()).len(), 2);
        assert_eq!(
            RowClusterer::new().with_threshold(60.0).cluster(tokens).len(),
            1
        );
    }

    #[test]
    fn test_zero_height_rows() {
        let same = vec![
            Token::from_rect(30.0, 10.0, 40.0, 10.0, "right", 0.7),
            Token::from_rect(0.0, 10.0, 20.0, 10.0, "left", 0.7),
        ];
        assert_eq!(texts(&cluster_rows(same, 30.0)), vec![vec!["left", "right"]]);

        let apart = vec![
            Token::from_rect(0.0, 10.0, 20.0, 10.0, "flat", 0.7),
            Token::from_rect(0.0, 10.5, 20.0, 10.5, "next", 0.7),
        ];
        assert_eq!(texts(&cluster_rows(apart, 30.0)), vec![vec!["flat"], vec!["next"]]);
    }

    #[test]
    fn test_rotated_boxes_use_leftmost_corner() {
        let tokens = vec![
            Token::new([50.0, 10.0, 90.0, 12.0, 88.0, 30.0, 48.0, 28.0], "second", 0.9),
            Token::new([30.0, 11.0, 45.0, 11.0, 45.0, 29.0, 5.0, 29.0], "first", 0.9),
        ];
        let rows = cluster_rows(tokens, 30.0);
        assert_eq!(texts(&rows), vec![vec!["first", "second"]]);
    }

    #[test]
    fn test_deterministic_and_sorted() {
        let tokens: Vec<Token> = (0..40)
            .map(|i| {
                let x = ((i * 37) % 11) as f32 * 25.0;
                let y = (i / 5) as f32 * 30.0 + (i % 3) as f32;
                Token::from_rect(x, y, x + 20.0, y + 18.0, format!("t{}", i), 0.9)
            })
            .collect();

        let first = cluster_rows(tokens.clone(), 30.0);
        let second = cluster_rows(tokens.clone(), 30.0);
        assert_eq!(first, second);

        let min_x = |text: &str| {
            tokens
                .iter()
                .find(|t| t.text == text)
                .map(|t| t.min_x())
                .unwrap()
        };
        for row in &first {
            for pair in row.tokens().windows(2) {
                assert!(min_x(&pair[0].text) <= min_x(&pair[1].text));
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(RowClusterer::new().cluster(Vec::new()).is_empty());
    }
}
