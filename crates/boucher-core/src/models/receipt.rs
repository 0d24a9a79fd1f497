//! Receipt data models returned to callers.

use serde::{Deserialize, Serialize};

/// Review marker attached to every annotated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Observation {
    /// Value present with acceptable confidence.
    #[default]
    #[serde(rename = "")]
    Clear,
    /// Value missing or below the confidence threshold.
    #[serde(rename = "Obs")]
    Obs,
}

impl Observation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Observation::Clear => "",
            Observation::Obs => "Obs",
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Observation::Obs)
    }
}

/// A receipt field after confidence annotation.
///
/// Serialized as a three-element array `[value, confidence, observation]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "FieldTuple", from = "FieldTuple")]
pub struct AnnotatedField {
    pub value: Option<String>,
    pub confidence: Option<f32>,
    pub observation: Observation,
}

type FieldTuple = (Option<String>, Option<f32>, Observation);

impl From<AnnotatedField> for FieldTuple {
    fn from(field: AnnotatedField) -> Self {
        (field.value, field.confidence, field.observation)
    }
}

impl From<FieldTuple> for AnnotatedField {
    fn from((value, confidence, observation): FieldTuple) -> Self {
        Self {
            value,
            confidence,
            observation,
        }
    }
}

impl AnnotatedField {
    /// The shape reported for a field that could not be extracted.
    pub fn missing() -> Self {
        Self {
            value: None,
            confidence: None,
            observation: Observation::Obs,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// The four fields extracted from a bank-transfer receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptFields {
    /// Transferred amount.
    #[serde(rename = "monto")]
    pub amount: AnnotatedField,

    /// Transfer date as `DD/MM/YYYY`.
    #[serde(rename = "fecha")]
    pub date: AnnotatedField,

    /// Bank operation number.
    #[serde(rename = "numero_operacion")]
    pub operation_number: AnnotatedField,

    /// Destination account type.
    #[serde(rename = "destino")]
    pub destination: AnnotatedField,
}

impl ReceiptFields {
    /// Fields flagged for human review.
    pub fn flagged(&self) -> Vec<&'static str> {
        [
            ("monto", &self.amount),
            ("fecha", &self.date),
            ("numero_operacion", &self.operation_number),
            ("destino", &self.destination),
        ]
        .into_iter()
        .filter(|(_, field)| field.observation.is_flagged())
        .map(|(name, _)| name)
        .collect()
    }
}
