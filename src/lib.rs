//! SSD Lite detection post-processing.
//!
//! Turns the raw class-score and box-regression tensors of an SSD Lite
//! detector into a flat list of labeled, non-overlapping detections.
//!
//! The [`postprocess`] module holds the pure pipeline (decode, filter,
//! suppress, assemble). The [`integration`] module binds it to an
//! inference engine behind [`SsdLitePredictor`].

pub mod error;
pub mod integration;
pub mod postprocess;

pub use error::{PredictorError, Result};
pub use integration::{
    AspectMode, ArrayFeature, Feature, ImageFeature, InferenceEngine, PredictorConfig, RawOutput,
    SsdLitePredictor,
};
pub use postprocess::{
    Detection, InputShape, Postprocessor, Rect, RectTransform, non_max_suppression,
};
