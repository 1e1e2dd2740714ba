pub mod scaler;
pub mod signal;

pub use scaler::ScalingTransform;
pub use signal::SignalPair;
