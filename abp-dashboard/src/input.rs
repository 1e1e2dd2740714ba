use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Samples per signal the service expects.
pub const SAMPLE_LEN: usize = 250;

/// Request body for `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPair {
    pub ppg: Vec<f64>,
    pub ecg: Vec<f64>,
}

impl SignalPair {
    /// Parses two comma-separated strings. Blank entries are skipped.
    pub fn from_csv(ppg: &str, ecg: &str) -> Result<Self, DashboardError> {
        Ok(Self {
            ppg: parse_csv("ppg", ppg)?,
            ecg: parse_csv("ecg", ecg)?,
        })
    }

    /// Reads an uploaded JSON file shaped like the request body.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DashboardError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.ppg.len() != SAMPLE_LEN || self.ecg.len() != SAMPLE_LEN {
            return Err(DashboardError::Length {
                expected: SAMPLE_LEN,
                ppg: self.ppg.len(),
                ecg: self.ecg.len(),
            });
        }
        Ok(())
    }
}

fn parse_csv(field: &'static str, text: &str) -> Result<Vec<f64>, DashboardError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| DashboardError::Parse {
                field,
                value: s.to_string(),
            })
        })
        .collect()
}
