use std::path::PathBuf;
use std::sync::Arc;

use crate::classifier::{ImageModel, Prediction, TractModel, WasteClass};
use crate::error::PredictError;
use crate::preprocess::preprocess;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub max_body_bytes: usize,
}

/// Per-process shared state: the one-time-loaded model handle.
///
/// `None` means the service is up but Unavailable; the only transition
/// to Ready happens in [`AppState::new`], before any request is served.
/// The handle is never mutated afterwards, so requests share it without
/// locking.
#[derive(Clone)]
pub struct AppState {
    model: Option<Arc<dyn ImageModel>>,
}

impl AppState {
    /// Loads the model artifact, falling back to the Unavailable state
    /// on failure. A missing artifact is a deployment problem for the
    /// operator to spot in the logs, not a reason to crash.
    pub fn new(config: &AppConfig) -> Self {
        match TractModel::load(&config.model_path) {
            Ok(model) => {
                log::info!("Loaded model from {}", config.model_path.display());
                Self {
                    model: Some(Arc::new(model)),
                }
            }
            Err(e) => {
                log::error!(
                    "Failed to load model from {}: {:#}. Serving in degraded mode, every predict will fail",
                    config.model_path.display(),
                    e
                );
                Self { model: None }
            }
        }
    }

    pub fn with_model(model: Arc<dyn ImageModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Full request-to-prediction pipeline: decode, preprocess, invoke
    /// the model, map the best score to its label.
    pub fn predict(&self, bytes: &[u8]) -> Result<Prediction, PredictError> {
        let model = self.model.as_ref().ok_or(PredictError::ModelUnavailable)?;

        // Magic-number sniff before the full decode so obviously bad
        // uploads fail as a caller error, not anything deeper.
        image::guess_format(bytes)?;

        let input = preprocess(bytes)?;
        let scores = model.run(&input).map_err(|e| {
            log::error!("Model invocation failed: {e:#}");
            PredictError::Inference(e)
        })?;

        if scores.len() != WasteClass::ALL.len() {
            return Err(PredictError::Inference(anyhow::anyhow!(
                "model returned {} scores, expected {}",
                scores.len(),
                WasteClass::ALL.len()
            )));
        }

        // First maximum wins on ties.
        let mut best = 0;
        let mut best_score = scores[0];
        for (i, &score) in scores.iter().enumerate().skip(1) {
            if score > best_score {
                best = i;
                best_score = score;
            }
        }

        Ok(Prediction {
            label: WasteClass::ALL[best],
            confidence: best_score * 100.0,
        })
    }
}
