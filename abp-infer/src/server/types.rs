use crate::model::ModelBundle;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub bundle: ModelBundle,
    pub metrics: PrometheusHandle,
}

// --- DTOs (Data Transfer Objects) ---

// Prediction. Requests are parsed by `SignalPair::from_body` so that each
// validation failure maps to its own error.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct PredictResponse {
    pub predicted_abp: Vec<Vec<f64>>,
}

// API summary
#[derive(Serialize)]
pub struct ApiInfo {
    pub status: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Serialize)]
pub struct Endpoints {
    #[serde(rename = "/predict")]
    pub predict: EndpointInfo,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub description: &'static str,
    pub input_format: InputFormat,
}

#[derive(Serialize)]
pub struct InputFormat {
    pub ppg: String,
    pub ecg: String,
}
