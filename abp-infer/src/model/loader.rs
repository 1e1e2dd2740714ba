use crate::error::InferenceError;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), InferenceError> {
    ort::init().with_name("abp-infer").commit()?;
    Ok(())
}

/// Loads an ONNX model from disk and creates an inference session.
///
/// # Arguments
/// * `model_path` - Path to the .onnx file
/// * `intra_threads` - Parallelism within a single operator
pub fn load_model(
    model_path: impl AsRef<Path>,
    intra_threads: usize,
) -> Result<Session, InferenceError> {
    let path = model_path.as_ref();
    if !path.exists() {
        return Err(InferenceError::ModelNotFound(path.display().to_string()));
    }

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)?;

    tracing::info!(path = %path.display(), "loaded model");
    for (i, input) in session.inputs.iter().enumerate() {
        tracing::info!(index = i, name = %input.name, input_type = ?input.input_type, "model input");
    }
    for (i, output) in session.outputs.iter().enumerate() {
        tracing::info!(index = i, name = %output.name, output_type = ?output.output_type, "model output");
    }

    Ok(session)
}
