//! Prediction strategies built on a [`Forecaster`](crate::models::Forecaster)
//!
//! - [`direct`]: one model call producing the model's full output width
//! - [`iterative`]: autoregressive rollout for arbitrary horizons
//! - [`auxiliary`]: direct count forecasts for Cases, Deaths and Tests

pub mod auxiliary;
pub mod direct;
pub mod iterative;

pub use auxiliary::{predict_auxiliary, AuxiliaryForecast};
pub use direct::predict_direct;
pub use iterative::predict_iterative;
