use crate::error::InferenceError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Locations of the persisted model and scalers produced by the training toolchain.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub input_scaler_path: PathBuf,
    pub output_scaler_path: PathBuf,
    pub intra_threads: usize,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("CNN_LSTM_Model_256.onnx"),
            input_scaler_path: PathBuf::from("scaler_X.json"),
            output_scaler_path: PathBuf::from("scaler_y.json"),
            intra_threads: 4,
        }
    }
}

impl AppConfig {
    /// Reads the YAML config at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| InferenceError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, InferenceError> {
        serde_yaml::from_str(content).map_err(|e| InferenceError::Config(e.to_string()))
    }

    /// Applies `HOST` and `PORT` overrides taken from `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, InferenceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| InferenceError::Config(format!("PORT must be a valid port number, got '{}'", port)))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.artifacts.intra_threads, 4);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("server:\n  port: 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.artifacts.model_path,
            PathBuf::from("CNN_LSTM_Model_256.onnx")
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "artifacts:\n  model_path: models/abp.onnx\n  input_scaler_path: x.json\n  output_scaler_path: y.json\n  intra_threads: 2"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.artifacts.model_path, PathBuf::from("models/abp.onnx"));
        assert_eq!(config.artifacts.intra_threads, 2);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.yaml").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let result = AppConfig::from_yaml("server: [1, 2");
        assert!(matches!(result, Err(InferenceError::Config(_))));
    }

    #[test]
    fn test_port_override() {
        let env: HashMap<&str, &str> = [("PORT", "9090"), ("HOST", "127.0.0.1")].into();
        let config = AppConfig::default()
            .with_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_port_override() {
        let result = AppConfig::default().with_env_overrides(|key| {
            (key == "PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(InferenceError::Config(_))));
    }
}
