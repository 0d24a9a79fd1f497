//! OCR tokens, the engine-provider interface and row reconstruction.

mod rows;
#[cfg(feature = "native")]
mod pure_engine;

pub use rows::{cluster_rows, Row, RowClusterer, RowToken};
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{BoucherError, OcrError};

/// One recognized text fragment with its quadrilateral and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Corner coordinates (x1, y1, x2, y2, x3, y3, x4, y4), not necessarily axis-aligned.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl Token {
    pub fn new(bbox: [f32; 8], text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            text: text.into(),
            confidence,
        }
    }

    /// Build a token from an axis-aligned rectangle.
    pub fn from_rect(x1: f32, y1: f32, x2: f32, y2: f32, text: impl Into<String>, confidence: f32) -> Self {
        Self::new([x1, y1, x2, y1, x2, y2, x1, y2], text, confidence)
    }

    /// Y coordinate of the first corner, used to order tokens before clustering.
    pub fn first_y(&self) -> f32 {
        self.bbox[1]
    }

    /// Smallest x across all four corners.
    pub fn min_x(&self) -> f32 {
        [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]]
            .into_iter()
            .fold(f32::INFINITY, f32::min)
    }

    /// Vertical extent (min y, max y) across all four corners.
    pub fn y_span(&self) -> (f32, f32) {
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        (min_y, max_y)
    }
}

/// Anything that turns a decoded receipt image into OCR tokens.
///
/// Implementations are built once at startup and shared across concurrent
/// requests, so they must be `Send + Sync`. Engines that are not reentrant
/// serialize their calls internally.
pub trait TokenSource: Send + Sync {
    /// Recognize the tokens of one image. Token order is unspecified.
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Token>, OcrError>;
}

/// A fixed token list, returned for every image.
///
/// Used to replay OCR dumps and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: Vec<Token>,
}

impl StaticTokens {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Load a JSON array of tokens.
    pub fn from_file(path: &Path) -> Result<Self, BoucherError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&content)?))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl TokenSource for StaticTokens {
    fn recognize(&self, _image: &DynamicImage) -> Result<Vec<Token>, OcrError> {
        Ok(self.tokens.clone())
    }
}
