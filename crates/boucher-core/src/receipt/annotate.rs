//! Low-confidence flagging applied to every extracted field.

use crate::models::receipt::{AnnotatedField, Observation};

use super::FieldResult;

/// Turns a [`FieldResult`] into the `[value, confidence, observation]` shape.
#[derive(Debug, Clone)]
pub struct ConfidenceAnnotator {
    threshold: f32,
}

impl ConfidenceAnnotator {
    /// Create an annotator flagging anything below `threshold`.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Annotate one result. Takes the result by value: a field is annotated once.
    pub fn annotate(&self, result: FieldResult) -> AnnotatedField {
        match result {
            FieldResult::Found { value, confidence } => {
                // Missing and NaN confidences are flagged too.
                let observation = match confidence {
                    Some(c) if c >= self.threshold => Observation::Clear,
                    _ => Observation::Obs,
                };
                AnnotatedField {
                    value: Some(value),
                    confidence,
                    observation,
                }
            }
            FieldResult::NotFound => AnnotatedField::missing(),
        }
    }
}

impl Default for ConfidenceAnnotator {
    fn default() -> Self {
        Self::new(0.6)
    }
}
