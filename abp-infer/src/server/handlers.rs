use axum::{body::Bytes, extract::State, Json};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;

use crate::error::InferenceError;
use crate::preprocessing::signal::{SignalPair, SAMPLE_LEN};
use crate::server::types::*;

pub async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        status: "API is running",
        endpoints: Endpoints {
            predict: EndpointInfo {
                method: "POST",
                description: "Predict ABP values from PPG and ECG data",
                input_format: InputFormat {
                    ppg: format!("List of {} PPG signal values", SAMPLE_LEN),
                    ecg: format!("List of {} ECG signal values", SAMPLE_LEN),
                },
            },
        },
    })
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn render_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, InferenceError> {
    let start = Instant::now();
    let result = run_prediction(&state, &body).await;

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) if e.is_client_error() => "client_error",
        Err(_) => "server_error",
    };
    counter!("abp_predict_requests_total", "outcome" => outcome).increment(1);
    histogram!("abp_predict_duration_seconds").record(start.elapsed().as_secs_f64());

    result.map(Json)
}

async fn run_prediction(state: &AppState, body: &[u8]) -> Result<PredictResponse, InferenceError> {
    // 1. Validate
    let pair = SignalPair::from_body(body)?;

    // 2. Normalize, infer, denormalize off the async workers
    let start = Instant::now();
    let bundle = state.bundle.clone();
    let prediction = tokio::task::spawn_blocking(move || bundle.predict(&pair)).await??;
    tracing::info!(
        shape = ?prediction.shape(),
        inference_time_ms = start.elapsed().as_secs_f64() * 1000.0,
        "prediction complete"
    );

    // 3. Serialize
    Ok(PredictResponse {
        predicted_abp: prediction.outer_iter().map(|row| row.to_vec()).collect(),
    })
}
