//! Burn inference backend for SSD Lite models.
//!
//! This module provides a `BurnEngine` that implements `InferenceEngine`
//! for SSD Lite models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use burn::backend::NdArray;
//! use ssdlite_rs::integration::{BurnEngine, BurnSsdModel};
//! use ssdlite_rs::SsdLitePredictor;
//!
//! // Implement BurnSsdModel for your model
//! struct MobileNetV2SsdLite { /* ... */ }
//!
//! let model = MobileNetV2SsdLite::load("ssdlite.mpk");
//! let engine = BurnEngine::<NdArray, _>::new(model, Default::default());
//! let predictor = SsdLitePredictor::with_default_config(engine, labels)?;
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use ndarray::{Array3, ArrayView3};
use thiserror::Error;
use tracing::trace;

use super::{InferenceEngine, RawOutput};
use crate::postprocess::InputShape;

/// Error type for Burn inference failures.
#[derive(Debug, Error)]
pub enum BurnEngineError {
    /// Output tensor could not be read back as `f32`.
    #[error("failed to read output tensor: {0}")]
    Readback(String),
    /// Output tensor has an unexpected shape.
    #[error("unexpected output shape {got:?}, expected (1, P, {expected_last})")]
    OutputShape { got: [usize; 3], expected_last: usize },
}

/// Trait for Burn-based SSD Lite models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnSsdModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    ///
    /// # Returns
    /// Class scores `(1, P, C)` and box regressions `(1, P, 4)`.
    fn forward(&self, input: Tensor<B, 4>) -> (Tensor<B, 3>, Tensor<B, 3>);

    /// Get the expected input shape.
    fn input_shape(&self) -> InputShape {
        InputShape::new(300, 300, 3) // MobileNetV2 SSD Lite
    }

    /// Number of classes, background included.
    fn num_classes(&self) -> usize {
        21 // Pascal VOC
    }
}

/// Burn-based engine implementing `InferenceEngine`.
///
/// Outputs are copied into engine-owned buffers that are overwritten on
/// every call.
pub struct BurnEngine<B: Backend, M: BurnSsdModel<B>> {
    model: M,
    device: B::Device,
    scores: Array3<f32>,
    boxes: Array3<f32>,
}

impl<B: Backend, M: BurnSsdModel<B>> BurnEngine<B, M> {
    /// Create a new Burn engine with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            scores: Array3::zeros((1, 0, 0)),
            boxes: Array3::zeros((1, 0, 4)),
        }
    }

    /// Convert an `(H, W, C)` view into a `[1, C, H, W]` tensor.
    fn preprocess(&self, input: ArrayView3<'_, f32>) -> Tensor<B, 4> {
        let (height, width, channels) = input.dim();
        let data: Vec<f32> = input.iter().copied().collect();
        Tensor::<B, 1>::from_floats(data.as_slice(), &self.device)
            .reshape([1, height, width, channels])
            .permute([0, 3, 1, 2])
    }
}

/// Copy a rank-3 output tensor into `dst`, checking its last dimension.
fn read_back<B: Backend>(
    tensor: Tensor<B, 3>,
    expected_last: usize,
    dst: &mut Array3<f32>,
) -> Result<(), BurnEngineError> {
    let dims = tensor.dims();
    if dims[0] != 1 || dims[2] != expected_last {
        return Err(BurnEngineError::OutputShape {
            got: dims,
            expected_last,
        });
    }
    let values = tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| BurnEngineError::Readback(format!("{e:?}")))?;
    store_output(dst, (dims[0], dims[1], dims[2]), values)
}

/// Copy `values` into `dst`, reallocating only when the shape changed.
fn store_output(
    dst: &mut Array3<f32>,
    dim: (usize, usize, usize),
    values: Vec<f32>,
) -> Result<(), BurnEngineError> {
    if dst.dim() == dim {
        if let Some(slice) = dst.as_slice_mut() {
            if slice.len() == values.len() {
                slice.copy_from_slice(&values);
                return Ok(());
            }
        }
    }
    *dst = Array3::from_shape_vec(dim, values)
        .map_err(|e| BurnEngineError::Readback(e.to_string()))?;
    Ok(())
}

impl<B: Backend, M: BurnSsdModel<B>> InferenceEngine for BurnEngine<B, M> {
    type Error = BurnEngineError;

    fn input_shape(&self) -> InputShape {
        self.model.input_shape()
    }

    fn num_classes(&self) -> usize {
        self.model.num_classes()
    }

    fn infer(&mut self, input: ArrayView3<'_, f32>) -> Result<RawOutput<'_>, Self::Error> {
        let tensor = self.preprocess(input);
        let (scores, boxes) = self.model.forward(tensor);
        read_back(scores, self.model.num_classes(), &mut self.scores)?;
        read_back(boxes, 4, &mut self.boxes)?;
        trace!(anchors = self.scores.len_of(ndarray::Axis(1)), "burn forward done");

        Ok(RawOutput {
            scores: self.scores.view(),
            boxes: self.boxes.view(),
        })
    }
}
