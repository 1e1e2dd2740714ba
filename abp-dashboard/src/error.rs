use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("no input given: pass --input or both --ppg and --ecg")]
    NoInput,

    #[error("invalid number '{value}' in {field}")]
    Parse { field: &'static str, value: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("each signal must hold exactly {expected} samples (ppg: {ppg}, ecg: {ecg})")]
    Length {
        expected: usize,
        ppg: usize,
        ecg: usize,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Error message returned by the service, kept verbatim.
    #[error("{0}")]
    Service(String),

    #[error("unexpected response ({status}): {body}")]
    Malformed { status: u16, body: String },

    #[error("output error: {0}")]
    Output(#[from] io::Error),
}
