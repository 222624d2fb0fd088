use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{Array3, ArrayView3, array};
use ssdlite_rs::{
    ArrayFeature, AspectMode, Feature, ImageFeature, InferenceEngine, InputShape, PredictorConfig,
    PredictorError, RawOutput, SsdLitePredictor,
};

const LABELS: [&str; 3] = ["background", "cat", "dog"];

#[derive(Debug, thiserror::Error)]
#[error("engine failure")]
struct EngineFailure;

struct MockEngine {
    scores: Array3<f32>,
    boxes: Array3<f32>,
    fail: bool,
    calls: usize,
    drops: Arc<AtomicUsize>,
}

impl MockEngine {
    /// C = 3, P = 4: a cat with a duplicate, a low-score cat and a dog.
    fn scene() -> Self {
        Self {
            scores: array![[
                [0.05, 0.9, 0.0],
                [0.1, 0.8, 0.0],
                [0.7, 0.3, 0.0],
                [0.0, 0.0, 0.95],
            ]],
            boxes: array![[
                [0.0, 0.0, 1.0, 1.0],
                [0.0, 0.0, 1.0, 0.7],
                [0.1, 0.1, 0.2, 0.2],
                [0.6, 0.6, 0.9, 0.9],
            ]],
            fail: false,
            calls: 0,
            drops: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl InferenceEngine for MockEngine {
    type Error = EngineFailure;

    fn input_shape(&self) -> InputShape {
        InputShape::new(4, 4, 3)
    }

    fn num_classes(&self) -> usize {
        self.scores.dim().2
    }

    fn infer(&mut self, input: ArrayView3<'_, f32>) -> Result<RawOutput<'_>, Self::Error> {
        assert_eq!(input.dim(), (4, 4, 3));
        self.calls += 1;
        if self.fail {
            return Err(EngineFailure);
        }
        Ok(RawOutput {
            scores: self.scores.view(),
            boxes: self.boxes.view(),
        })
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

fn array_input() -> Feature {
    ArrayFeature::new(Array3::zeros((4, 4, 3))).into()
}

fn predictor() -> SsdLitePredictor<MockEngine> {
    let config = PredictorConfig::default().with_min_score(0.5);
    SsdLitePredictor::new(MockEngine::scene(), LABELS, config).unwrap()
}

#[test]
fn test_predict_scene() {
    let mut predictor = predictor();
    let detections = predictor.predict(&[array_input()]).unwrap();

    assert_eq!(detections.len(), 2);
    assert_eq!(&*detections[0].label, "cat");
    assert_eq!(detections[0].score, 0.9);
    assert_eq!(&*detections[1].label, "dog");
    assert_eq!(detections[1].score, 0.95);
    // Labels are shared with the predictor's table.
    assert!(Arc::ptr_eq(&detections[0].label, &predictor.labels()[1]));
}

#[test]
fn test_predict_is_repeatable() {
    let mut predictor = predictor();
    let first = predictor.predict(&[array_input()]).unwrap();
    let second = predictor.predict(&[array_input()]).unwrap();
    assert_eq!(first, second);
    assert_eq!(predictor.engine().map(|e| e.calls), Some(2));
}

#[test]
fn test_default_thresholds() {
    let mut predictor = SsdLitePredictor::with_default_config(MockEngine::scene(), LABELS).unwrap();
    assert_eq!(predictor.min_score(), 0.6);
    assert_eq!(predictor.max_iou(), 0.5);

    let detections = predictor.predict(&[array_input()]).unwrap();
    assert_eq!(detections.len(), 2);
}

#[test]
fn test_image_input_is_mapped_back() {
    let mut predictor = predictor();
    // 8x4 image letterboxed into the 4x4 input: model rows 1..3 hold the image.
    let image = ImageFeature::new(Array3::zeros((4, 8, 3))).with_aspect_mode(AspectMode::AspectFit);
    let detections = predictor.predict(&[image.into()]).unwrap();

    // The full-frame cat box covers the padding too.
    let cat = detections[0].rect;
    assert!((cat.x_min - 0.0).abs() < 1e-5);
    assert!((cat.x_max - 1.0).abs() < 1e-5);
    assert!((cat.y_min + 0.5).abs() < 1e-5);
    assert!((cat.y_max - 1.5).abs() < 1e-5);
}

#[test]
fn test_rejects_wrong_input_count() {
    let mut predictor = predictor();
    let err = predictor.predict(&[]).unwrap_err();
    assert!(matches!(err, PredictorError::InvalidArgument(_)));

    let err = predictor.predict(&[array_input(), array_input()]).unwrap_err();
    assert!(matches!(err, PredictorError::InvalidArgument(_)));
    assert_eq!(predictor.engine().map(|e| e.calls), Some(0));
}

#[test]
fn test_rejects_wrong_array_shape() {
    let mut predictor = predictor();
    let input = ArrayFeature::new(Array3::zeros((3, 4, 3))).into();
    let err = predictor.predict(&[input]).unwrap_err();
    assert!(matches!(err, PredictorError::InvalidArgument(_)));
}

#[test]
fn test_rejects_label_mismatch() {
    let err = SsdLitePredictor::with_default_config(MockEngine::scene(), ["background", "cat"])
        .err()
        .unwrap();
    assert!(matches!(err, PredictorError::InvalidArgument(_)));
}

#[test]
fn test_rejects_invalid_config() {
    let config = PredictorConfig::default().with_max_iou(0.0);
    let err = SsdLitePredictor::new(MockEngine::scene(), LABELS, config)
        .err()
        .unwrap();
    assert!(matches!(err, PredictorError::InvalidArgument(_)));
}

#[test]
fn test_engine_error_is_passed_through() {
    let mut engine = MockEngine::scene();
    engine.fail = true;
    let mut predictor = SsdLitePredictor::with_default_config(engine, LABELS).unwrap();

    let err = predictor.predict(&[array_input()]).unwrap_err();
    assert!(matches!(err, PredictorError::Inference(_)));
    assert_eq!(
        std::error::Error::source(&err).map(|s| s.to_string()),
        Some("engine failure".to_string())
    );
}

#[test]
fn test_release_is_idempotent() {
    let engine = MockEngine::scene();
    let drops = Arc::clone(&engine.drops);
    let mut predictor = SsdLitePredictor::with_default_config(engine, LABELS).unwrap();

    predictor.release();
    assert!(predictor.is_released());
    assert_eq!(drops.load(Ordering::SeqCst), 1);

    predictor.release();
    drop(predictor);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_predict_after_release() {
    let mut predictor = predictor();
    predictor.release();
    let err = predictor.predict(&[array_input()]).unwrap_err();
    assert!(matches!(err, PredictorError::Released));
}

#[test]
fn test_drop_releases_engine() {
    let engine = MockEngine::scene();
    let drops = Arc::clone(&engine.drops);
    {
        let _predictor = SsdLitePredictor::with_default_config(engine, LABELS).unwrap();
    }
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}
