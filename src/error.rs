use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Request-level failure taxonomy. Each variant maps to its own status
/// code so callers can branch on the category instead of parsing
/// messages.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Model is not loaded. Check server logs.")]
    ModelUnavailable,
    #[error("Invalid image file provided: {0}")]
    Decode(#[from] image::ImageError),
    #[error("An error occurred during prediction: {0}")]
    Inference(anyhow::Error),
}

impl actix_web::ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PredictError::Decode(_) => StatusCode::BAD_REQUEST,
            PredictError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
