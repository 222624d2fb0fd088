//! Integration module for connecting inference backends with the
//! post-processing pipeline.
//!
//! This module provides the engine trait, the input features and the
//! predictor that ties them to [`crate::postprocess`].

mod config;
mod engine;
mod feature;
mod predictor;
pub mod transform;

pub use config::PredictorConfig;
pub use engine::{InferenceEngine, RawOutput};
pub use feature::{ArrayFeature, Feature, ImageFeature};
pub use predictor::SsdLitePredictor;
pub use transform::AspectMode;

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnEngine, BurnEngineError, BurnSsdModel};
