use crate::error::InferenceError;
use ndarray::{Array2, Array3};
use serde_json::{Map, Value};

/// Samples per signal in one model window.
pub const SAMPLE_LEN: usize = 250;
/// Channel 0 is PPG, channel 1 is ECG.
pub const CHANNELS: usize = 2;
/// Width of the flattened window the input scaler was fitted on.
pub const FLAT_LEN: usize = SAMPLE_LEN * CHANNELS;

/// A validated, time-aligned PPG/ECG window.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPair {
    ppg: Vec<f64>,
    ecg: Vec<f64>,
}

impl SignalPair {
    pub fn new(ppg: Vec<f64>, ecg: Vec<f64>) -> Result<Self, InferenceError> {
        if ppg.len() != SAMPLE_LEN || ecg.len() != SAMPLE_LEN {
            return Err(InferenceError::InvalidLength {
                expected: SAMPLE_LEN,
                ppg: ppg.len(),
                ecg: ecg.len(),
            });
        }
        Ok(Self { ppg, ecg })
    }

    /// Parses a raw request body.
    ///
    /// Checks run in a fixed order and the first failure wins: the body must be
    /// a JSON object, both keys must be present, both must be numeric arrays,
    /// and both arrays must hold exactly [`SAMPLE_LEN`] samples.
    pub fn from_body(body: &[u8]) -> Result<Self, InferenceError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(InferenceError::MissingBody);
        }
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "request body is not valid JSON");
            InferenceError::MissingBody
        })?;
        match value {
            Value::Object(map) => Self::from_object(&map),
            _ => Err(InferenceError::MissingBody),
        }
    }

    fn from_object(map: &Map<String, Value>) -> Result<Self, InferenceError> {
        let missing: Vec<&'static str> = ["ppg", "ecg"]
            .into_iter()
            .filter(|key| !map.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(InferenceError::MissingField(missing));
        }

        let ppg = numeric_array(map, "ppg")?;
        let ecg = numeric_array(map, "ecg")?;
        tracing::info!(ppg_len = ppg.len(), ecg_len = ecg.len(), "received signal pair");

        Self::new(ppg, ecg)
    }

    pub fn ppg(&self) -> &[f64] {
        &self.ppg
    }

    pub fn ecg(&self) -> &[f64] {
        &self.ecg
    }

    /// Stacks the pair into a `(1, SAMPLE_LEN, CHANNELS)` tensor.
    ///
    /// The scalers and the model were fitted against this exact layout:
    /// timestep-major with PPG before ECG at every step.
    pub fn to_tensor(&self) -> Result<Array3<f64>, InferenceError> {
        let mut interleaved = Vec::with_capacity(FLAT_LEN);
        for (&p, &e) in self.ppg.iter().zip(&self.ecg) {
            interleaved.push(p);
            interleaved.push(e);
        }
        Ok(Array3::from_shape_vec((1, SAMPLE_LEN, CHANNELS), interleaved)?)
    }

    /// Row-major flattening of [`SignalPair::to_tensor`] into `(1, FLAT_LEN)`.
    pub fn to_flat(&self) -> Result<Array2<f64>, InferenceError> {
        Ok(self.to_tensor()?.into_shape_with_order((1, FLAT_LEN))?)
    }
}

fn numeric_array(map: &Map<String, Value>, key: &'static str) -> Result<Vec<f64>, InferenceError> {
    map.get(key)
        .and_then(Value::as_array)
        .ok_or(InferenceError::InvalidField(key))?
        .iter()
        .map(|v| v.as_f64().ok_or(InferenceError::InvalidField(key)))
        .collect()
}
