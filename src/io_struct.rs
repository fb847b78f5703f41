use serde::{Deserialize, Serialize};

use crate::classifier::Prediction;

/// Success body for `/predict`, e.g.
/// `{"prediction": "PET_Bottles", "confidence": 90.95}`.
///
/// Confidence is a number, never a pre-formatted string; display
/// rounding is the caller's concern.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub prediction: String,
    pub confidence: f32,
}

impl From<&Prediction> for PredictionOutput {
    fn from(prediction: &Prediction) -> Self {
        Self {
            prediction: prediction.label.as_str().to_string(),
            confidence: prediction.confidence,
        }
    }
}
