pub mod bundle;
pub mod loader;
pub mod regressor;

pub use bundle::ModelBundle;
pub use regressor::{OnnxRegressor, Regressor};
