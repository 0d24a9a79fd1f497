//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BoucherError, Result};

/// Main configuration for the boucher pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoucherConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Row clustering configuration.
    pub clustering: ClusteringConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// HTTP service configuration.
    pub server: ServerConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` placeholders emitted by the recognizer.
    pub keep_unk: bool,

    /// Upper bound for a single OCR call, in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            timeout_secs: 30,
        }
    }
}

/// Row clustering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Maximum midpoint distance, as a percentage of the current row height,
    /// for a token to join the current row.
    pub row_threshold: f32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self { row_threshold: 30.0 }
    }
}

/// A keyword that, when found in a token, names the destination account type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRule {
    /// Case-sensitive substring searched in each token.
    pub keyword: String,
    /// Value reported for the destination field.
    pub label: String,
}

impl DestinationRule {
    pub fn new(keyword: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            label: label.into(),
        }
    }
}

/// Field extraction configuration for the receipt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fields below this confidence are flagged for review.
    pub min_confidence: f32,

    /// Common transfer denominations accepted without a `.00` suffix.
    pub amount_denominations: Vec<String>,

    /// Weekday names (lowercase, with and without diacritics).
    pub weekdays: Vec<String>,

    /// Month names (lowercase) and their calendar number.
    pub months: Vec<(String, u32)>,

    /// Substring replacements restoring diacritics lost by OCR.
    pub diacritic_fixes: Vec<(String, String)>,

    /// Destination keywords, checked in order for every token.
    pub destinations: Vec<DestinationRule>,

    /// Phrases (lowercase) introducing the operation number.
    pub operation_keywords: Vec<String>,

    /// Number of digits in an operation number.
    pub operation_digits: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            amount_denominations: strings(&["350", "400", "450", "500"]),
            weekdays: strings(&[
                "lunes",
                "martes",
                "miércoles",
                "miercoles",
                "jueves",
                "viernes",
                "sábado",
                "sabado",
                "domingo",
            ]),
            months: [
                ("enero", 1),
                ("febrero", 2),
                ("marzo", 3),
                ("abril", 4),
                ("mayo", 5),
                ("junio", 6),
                ("julio", 7),
                ("agosto", 8),
                ("septiembre", 9),
                ("setiembre", 9),
                ("octubre", 10),
                ("noviembre", 11),
                ("diciembre", 12),
            ]
            .iter()
            .map(|(name, number)| (name.to_string(), *number))
            .collect(),
            diacritic_fixes: vec![
                ("iercoles".to_string(), "iércoles".to_string()),
                ("abado".to_string(), "ábado".to_string()),
            ],
            destinations: vec![
                DestinationRule::new("Varios", "Servicio"),
                DestinationRule::new("Moneda", "Cuenta Corriente"),
            ],
            operation_keywords: strings(&[
                "número de operación",
                "numero de operacion",
                "operación",
                "operacion",
            ]),
            operation_digits: 8,
        }
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind_addr: String,

    /// Multipart field carrying the receipt image.
    pub image_field: String,

    /// Answer every request with 200, errors included.
    pub uniform_error_status: bool,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            image_field: "imagen".to_string(),
            uniform_error_status: true,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl BoucherConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.clustering.row_threshold.is_nan() || self.clustering.row_threshold <= 0.0 {
            return Err(BoucherError::Config(format!(
                "clustering.row_threshold must be positive, got {}",
                self.clustering.row_threshold
            )));
        }
        let min_confidence = self.extraction.min_confidence;
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(BoucherError::Config(format!(
                "extraction.min_confidence must be within [0, 1], got {}",
                min_confidence
            )));
        }
        if self.extraction.operation_digits == 0 {
            return Err(BoucherError::Config(
                "extraction.operation_digits must be greater than zero".to_string(),
            ));
        }
        if self.extraction.weekdays.is_empty() || self.extraction.months.is_empty() {
            return Err(BoucherError::Config(
                "extraction.weekdays and extraction.months must not be empty".to_string(),
            ));
        }
        if let Some((name, number)) = self
            .extraction
            .months
            .iter()
            .find(|(_, number)| !(1..=12).contains(number))
        {
            return Err(BoucherError::Config(format!(
                "month '{}' has invalid number {}",
                name, number
            )));
        }
        if self.ocr.timeout_secs == 0 {
            return Err(BoucherError::Config(
                "ocr.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
