use crate::error::InferenceError;
use ndarray::{Array2, ArrayView3};
use ort::session::Session;
use ort::value::Value;
use std::sync::Mutex;

/// A pre-trained model mapping a normalized `(batch, timesteps, channels)` window
/// to a `(batch, width)` prediction in normalized units.
pub trait Regressor: Send + Sync {
    fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Array2<f32>, InferenceError>;
}

/// [`Regressor`] backed by an ONNX Runtime session.
pub struct OnnxRegressor {
    // `Session::run` needs exclusive access.
    session: Mutex<Session>,
}

impl OnnxRegressor {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl Regressor for OnnxRegressor {
    fn predict(&self, input: ArrayView3<'_, f32>) -> Result<Array2<f32>, InferenceError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::SessionPoisoned)?;
        let input_name = session.inputs[0].name.clone();
        let shape = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        let input_value = Value::from_array((shape, data.into_boxed_slice()))?;
        let outputs = session.run(ort::inputs![input_name => input_value])?;

        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        to_rows(&dims, data.to_vec())
    }
}

/// Collapses a model output of any rank into `(batch, width)`.
pub fn to_rows(dims: &[usize], data: Vec<f32>) -> Result<Array2<f32>, InferenceError> {
    let (batch, width) = match dims {
        [] => (1, 1),
        [n] => (1, *n),
        [batch, rest @ ..] => (*batch, rest.iter().product()),
    };
    Ok(Array2::from_shape_vec((batch, width), data)?)
}
