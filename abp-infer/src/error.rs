use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("No data provided")]
    MissingBody,

    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("Field '{0}' must be an array of numbers")]
    InvalidField(&'static str),

    #[error("Input data must be {expected} samples long, got ppg: {ppg}, ecg: {ecg}")]
    InvalidLength {
        expected: usize,
        ppg: usize,
        ecg: usize,
    },

    #[error("Model not found at path: {0}")]
    ModelNotFound(String),

    #[error("Artifact not found at path: {0}")]
    ArtifactNotFound(String),

    #[error("Invalid artifact {path}: {reason}")]
    InvalidArtifact { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ONNX Runtime error: {0}")]
    OrtError(#[from] ort::Error),

    #[error("Feature count mismatch: scaler expects {expected}, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Shape error: {0}")]
    ShapeError(#[from] ShapeError),

    #[error("Model session lock poisoned")]
    SessionPoisoned,

    #[error("Inference task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl InferenceError {
    /// Whether the failure was caused by the caller's request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InferenceError::MissingBody
                | InferenceError::MissingField(_)
                | InferenceError::InvalidField(_)
                | InferenceError::InvalidLength { .. }
        )
    }

    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.to_string();

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %error_message, "rejected request");
        } else {
            tracing::error!(status = status.as_u16(), error = ?self, "request failed");
        }

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
