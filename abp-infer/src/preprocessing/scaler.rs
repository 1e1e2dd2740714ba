use crate::error::InferenceError;
use ndarray::{Array2, ArrayView1, Zip};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A fitted per-feature affine transform, exported from the training toolchain as JSON.
///
/// `Standard` mirrors scikit-learn's `StandardScaler` (`mean_`, `scale_`), `MinMax`
/// mirrors `MinMaxScaler` (`min_`, `scale_`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalingTransform {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl ScalingTransform {
    /// Loads and validates a scaler file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InferenceError::ArtifactNotFound(path.display().to_string()));
        }

        let invalid = |reason: String| InferenceError::InvalidArtifact {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let scaler: ScalingTransform =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        scaler.validate().map_err(invalid)?;

        tracing::info!(
            path = %path.display(),
            kind = scaler.kind(),
            features = scaler.n_features(),
            "loaded scaler"
        );
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), String> {
        let (offset, scale) = self.params();
        if offset.is_empty() {
            return Err("scaler has no features".to_string());
        }
        if offset.len() != scale.len() {
            return Err(format!(
                "parameter length mismatch: {} offsets, {} scales",
                offset.len(),
                scale.len()
            ));
        }
        if offset.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err("parameters must be finite".to_string());
        }
        if let ScalingTransform::MinMax { scale, .. } = self {
            if scale.contains(&0.0) {
                return Err("min_max scale entries must be non-zero".to_string());
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScalingTransform::Standard { .. } => "standard",
            ScalingTransform::MinMax { .. } => "min_max",
        }
    }

    pub fn n_features(&self) -> usize {
        self.params().0.len()
    }

    fn params(&self) -> (&[f64], &[f64]) {
        match self {
            ScalingTransform::Standard { mean, scale } => (mean, scale),
            ScalingTransform::MinMax { min, scale } => (min, scale),
        }
    }

    /// Maps raw values into the normalized space. Rows are samples, columns features.
    pub fn forward(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        match self {
            ScalingTransform::Standard { mean, scale } => {
                self.apply(x, mean, scale, |v, m, s| (v - m) / nonzero(s))
            }
            ScalingTransform::MinMax { min, scale } => {
                self.apply(x, min, scale, |v, m, s| v * s + m)
            }
        }
    }

    /// Maps normalized values back to physical units.
    pub fn inverse(&self, x: &Array2<f64>) -> Result<Array2<f64>, InferenceError> {
        match self {
            ScalingTransform::Standard { mean, scale } => {
                self.apply(x, mean, scale, |v, m, s| v * nonzero(s) + m)
            }
            ScalingTransform::MinMax { min, scale } => {
                self.apply(x, min, scale, |v, m, s| (v - m) / s)
            }
        }
    }

    fn apply<F>(
        &self,
        x: &Array2<f64>,
        offset: &[f64],
        scale: &[f64],
        f: F,
    ) -> Result<Array2<f64>, InferenceError>
    where
        F: Fn(f64, f64, f64) -> f64,
    {
        if x.ncols() != offset.len() {
            return Err(InferenceError::FeatureMismatch {
                expected: offset.len(),
                got: x.ncols(),
            });
        }

        let offset = ArrayView1::from(offset);
        let scale = ArrayView1::from(scale);
        let mut out = x.to_owned();
        for mut row in out.rows_mut() {
            Zip::from(&mut row)
                .and(&offset)
                .and(&scale)
                .for_each(|v, &m, &s| *v = f(*v, m, s));
        }
        Ok(out)
    }
}

// Constant features are stored with a zero scale by some exporters.
fn nonzero(s: f64) -> f64 {
    if s == 0.0 {
        1.0
    } else {
        s
    }
}
