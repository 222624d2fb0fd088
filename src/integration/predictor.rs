//! SsdLitePredictor binding an inference engine to post-processing.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{PredictorError, Result};
use crate::integration::config::PredictorConfig;
use crate::integration::engine::InferenceEngine;
use crate::integration::feature::Feature;
use crate::postprocess::{BoxDecoder, Detection, Postprocessor};

/// SSD Lite predictor for general object detection.
///
/// Accepts one image or array feature per call and returns detections
/// with normalized rects, class labels and scores.
///
/// The predictor keeps scratch buffers between calls, so `predict` takes
/// `&mut self` and an instance must not be shared between threads while
/// predicting. Dropping it releases the engine.
pub struct SsdLitePredictor<E: InferenceEngine> {
    engine: Option<E>,
    labels: Vec<Arc<str>>,
    postprocessor: Postprocessor,
}

impl<E: InferenceEngine> SsdLitePredictor<E> {
    /// Create a predictor over `engine`.
    ///
    /// `labels` must hold one name per score class, background included.
    pub fn new<I, S>(engine: E, labels: I, config: PredictorConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        config.validate()?;
        let labels: Vec<Arc<str>> = labels.into_iter().map(|s| Arc::from(s.as_ref())).collect();
        let num_classes = engine.num_classes();
        if labels.len() != num_classes {
            return Err(PredictorError::invalid(format!(
                "model has {num_classes} classes, got {} labels",
                labels.len()
            )));
        }

        info!(
            classes = num_classes,
            min_score = config.min_score,
            max_iou = config.max_iou,
            "created SSD Lite predictor"
        );
        Ok(Self {
            engine: Some(engine),
            labels,
            postprocessor: Postprocessor::new(config.min_score, config.max_iou),
        })
    }

    /// Create a predictor with default thresholds.
    pub fn with_default_config<I, S>(engine: E, labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(engine, labels, PredictorConfig::default())
    }

    /// Detect objects in a single input feature.
    ///
    /// Image features are fit into the model input by their aspect mode
    /// and the detections are mapped back to image coordinates. Array
    /// features must already match the model input shape.
    pub fn predict(&mut self, inputs: &[Feature]) -> Result<Vec<Detection>> {
        let engine = self.engine.as_mut().ok_or(PredictorError::Released)?;
        let [input] = inputs else {
            return Err(PredictorError::invalid(format!(
                "SSD Lite predictor expects a single feature, got {}",
                inputs.len()
            )));
        };

        let shape = engine.input_shape();
        let prepared;
        let mapping;
        let (tensor, decoder) = match input {
            Feature::Image(image) => {
                prepared = image.create(&shape)?;
                mapping = image.rect_mapping(&shape);
                (prepared.view(), BoxDecoder::with_transform(&mapping, shape))
            }
            Feature::Array(array) => {
                array.check_shape(&shape)?;
                (array.view(), BoxDecoder::new())
            }
        };

        let output = engine
            .infer(tensor)
            .map_err(|e| PredictorError::Inference(Box::new(e)))?;
        let detections =
            self.postprocessor
                .process(output.scores, output.boxes, &self.labels, &decoder);

        debug!(detections = detections.len(), "predict finished");
        Ok(detections)
    }

    /// Class labels, indexed by class id.
    pub fn labels(&self) -> &[Arc<str>] {
        &self.labels
    }

    pub fn min_score(&self) -> f32 {
        self.postprocessor.min_score()
    }

    pub fn max_iou(&self) -> f32 {
        self.postprocessor.max_iou()
    }

    /// Get a reference to the underlying engine, if not yet released.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.engine.is_none()
    }

    /// Release the inference engine. Calling this again is a no-op.
    pub fn release(&mut self) {
        if let Some(engine) = self.engine.take() {
            drop(engine);
            info!("released SSD Lite predictor");
        }
    }
}

impl<E: InferenceEngine> Drop for SsdLitePredictor<E> {
    fn drop(&mut self) {
        self.release();
    }
}
