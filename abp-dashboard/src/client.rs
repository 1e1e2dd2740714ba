use crate::error::DashboardError;
use crate::input::SignalPair;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Blocking client for the inference service's predict endpoint.
pub struct PredictClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl PredictClient {
    pub fn new(url: impl Into<String>) -> Result<Self, DashboardError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("abp-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Sends one window and returns the raw JSON response.
    ///
    /// Non-success responses become [`DashboardError::Service`] carrying the
    /// service's `error` message.
    pub fn predict(&self, pair: &SignalPair) -> Result<Value, DashboardError> {
        tracing::debug!(url = %self.url, "sending prediction request");
        let response = self.http.post(&self.url).json(pair).send()?;
        let status = response.status();
        let text = response.text()?;

        let body: Value = serde_json::from_str(&text).map_err(|_| DashboardError::Malformed {
            status: status.as_u16(),
            body: text.clone(),
        })?;

        if status.is_success() {
            return Ok(body);
        }
        match body.get("error").and_then(Value::as_str) {
            Some(message) => Err(DashboardError::Service(message.to_string())),
            None => Err(DashboardError::Malformed {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

/// The file offered for download after a successful prediction.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionFile {
    pub predicted_abp: Vec<Vec<f64>>,
}

/// First row of `predicted_abp`; missing or empty rows yield an empty series.
pub fn first_row(response: &Value) -> Result<Vec<f64>, DashboardError> {
    let Some(row) = response
        .get("predicted_abp")
        .and_then(|rows| rows.get(0))
        .and_then(Value::as_array)
    else {
        return Ok(Vec::new());
    };

    row.iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| DashboardError::Malformed {
                status: 200,
                body: response.to_string(),
            })
        })
        .collect()
}

/// Writes `{"predicted_abp": [row]}` with four-space indentation.
pub fn save_result(path: impl AsRef<Path>, row: &[f64]) -> Result<(), DashboardError> {
    let file = PredictionFile {
        predicted_abp: vec![row.to_vec()],
    };
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    file.serialize(&mut ser)?;
    fs::write(path, buf)?;
    Ok(())
}
