use crate::config::ArtifactConfig;
use crate::error::InferenceError;
use crate::model::loader;
use crate::model::regressor::{OnnxRegressor, Regressor};
use crate::preprocessing::scaler::ScalingTransform;
use crate::preprocessing::signal::{SignalPair, CHANNELS, FLAT_LEN, SAMPLE_LEN};
use ndarray::Array2;
use std::sync::Arc;

/// The model and its two scalers, loaded once and shared read-only by every request.
#[derive(Clone)]
pub struct ModelBundle {
    model: Arc<dyn Regressor>,
    input_scaler: Arc<ScalingTransform>,
    output_scaler: Arc<ScalingTransform>,
}

impl ModelBundle {
    pub fn new(
        model: Arc<dyn Regressor>,
        input_scaler: ScalingTransform,
        output_scaler: ScalingTransform,
    ) -> Result<Self, InferenceError> {
        if input_scaler.n_features() != FLAT_LEN {
            return Err(InferenceError::FeatureMismatch {
                expected: FLAT_LEN,
                got: input_scaler.n_features(),
            });
        }
        Ok(Self {
            model,
            input_scaler: Arc::new(input_scaler),
            output_scaler: Arc::new(output_scaler),
        })
    }

    /// Loads the ONNX model and both scalers named in `config`.
    pub fn load(config: &ArtifactConfig) -> Result<Self, InferenceError> {
        let session = loader::load_model(&config.model_path, config.intra_threads)?;
        let input_scaler = ScalingTransform::load(&config.input_scaler_path)?;
        let output_scaler = ScalingTransform::load(&config.output_scaler_path)?;

        Self::new(Arc::new(OnnxRegressor::new(session)), input_scaler, output_scaler)
    }

    /// Runs normalization, inference and denormalization for one window.
    pub fn predict(&self, pair: &SignalPair) -> Result<Array2<f64>, InferenceError> {
        let flat = pair.to_flat()?;
        let scaled = self
            .input_scaler
            .forward(&flat)?
            .into_shape_with_order((1, SAMPLE_LEN, CHANNELS))?;
        tracing::debug!(shape = ?scaled.shape(), "scaled input");

        let input = scaled.mapv(|v| v as f32);
        let raw = self.model.predict(input.view())?;
        tracing::debug!(shape = ?raw.shape(), "raw prediction");

        let prediction = self.output_scaler.inverse(&raw.mapv(f64::from))?;
        tracing::debug!(shape = ?prediction.shape(), "final prediction");
        Ok(prediction)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use ndarray::{ArrayView3, Axis};

    /// Emits the per-timestep mean of both channels, one value per timestep.
    pub struct ChannelMean;

    impl Regressor for ChannelMean {
        fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Array2<f32>, InferenceError> {
            input
                .mean_axis(Axis(2))
                .ok_or(InferenceError::FeatureMismatch {
                    expected: CHANNELS,
                    got: 0,
                })
        }
    }

    pub fn identity(features: usize) -> ScalingTransform {
        ScalingTransform::Standard {
            mean: vec![0.0; features],
            scale: vec![1.0; features],
        }
    }

    /// A bundle with non-trivial scalers around [`ChannelMean`].
    pub fn bundle() -> ModelBundle {
        let input_scaler = ScalingTransform::Standard {
            mean: vec![1.0; FLAT_LEN],
            scale: vec![2.0; FLAT_LEN],
        };
        let output_scaler = ScalingTransform::Standard {
            mean: vec![100.0; SAMPLE_LEN],
            scale: vec![10.0; SAMPLE_LEN],
        };
        ModelBundle::new(Arc::new(ChannelMean), input_scaler, output_scaler).unwrap()
    }
}
