//! Trait for SSD inference backends.

use ndarray::ArrayView3;

use crate::postprocess::InputShape;

/// Raw model outputs for one call.
///
/// Both views borrow the engine, so they cannot outlive the call that
/// produced them and the engine is free to recycle the storage.
#[derive(Debug, Clone, Copy)]
pub struct RawOutput<'a> {
    /// Class scores, shaped `(1, P, C)` with background at class 0
    pub scores: ArrayView3<'a, f32>,
    /// Box regressions, shaped `(1, P, 4)`
    pub boxes: ArrayView3<'a, f32>,
}

/// Trait for SSD inference backends.
///
/// Implement this trait to run any SSD Lite model behind
/// [`SsdLitePredictor`](crate::SsdLitePredictor).
///
/// # Example
///
/// ```ignore
/// use ndarray::{Array3, ArrayView3};
/// use ssdlite_rs::{InferenceEngine, RawOutput};
/// use ssdlite_rs::postprocess::InputShape;
///
/// struct MyEngine {
///     scores: Array3<f32>,
///     boxes: Array3<f32>,
/// }
///
/// impl InferenceEngine for MyEngine {
///     type Error = std::io::Error;
///
///     fn input_shape(&self) -> InputShape {
///         InputShape::new(300, 300, 3)
///     }
///
///     fn num_classes(&self) -> usize {
///         21
///     }
///
///     fn infer(&mut self, input: ArrayView3<'_, f32>) -> Result<RawOutput<'_>, Self::Error> {
///         // Run the model, writing into self.scores / self.boxes
///         Ok(RawOutput { scores: self.scores.view(), boxes: self.boxes.view() })
///     }
/// }
/// ```
pub trait InferenceEngine {
    /// Error type for inference failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Model input shape, fixed for the engine's lifetime.
    fn input_shape(&self) -> InputShape;

    /// Number of classes `C` in the score output, background included.
    fn num_classes(&self) -> usize;

    /// Run the model on a `(H, W, C)` input matching [`input_shape`](Self::input_shape).
    fn infer(&mut self, input: ArrayView3<'_, f32>) -> Result<RawOutput<'_>, Self::Error>;
}
