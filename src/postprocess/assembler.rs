//! Detection assembly across classes.

use std::sync::Arc;

use ndarray::{ArrayView3, Axis};
use tracing::trace;

use crate::postprocess::candidates::CandidateBuffers;
use crate::postprocess::decode::BoxDecoder;
use crate::postprocess::detection::Detection;

/// Initial scratch capacity, enough for a typical frame.
const CANDIDATE_CAPACITY: usize = 1 << 4;

/// Turns one call's raw tensors into labeled detections.
///
/// Owns the thresholds and the reusable candidate buffers. Not safe for
/// concurrent use: `process` takes `&mut self`.
#[derive(Debug)]
pub struct Postprocessor {
    min_score: f32,
    max_iou: f32,
    buffers: CandidateBuffers,
}

impl Postprocessor {
    pub fn new(min_score: f32, max_iou: f32) -> Self {
        Self {
            min_score,
            max_iou,
            buffers: CandidateBuffers::with_capacity(CANDIDATE_CAPACITY),
        }
    }

    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    pub fn max_iou(&self) -> f32 {
        self.max_iou
    }

    /// Decode, filter and suppress every foreground class.
    ///
    /// `scores` is shaped `(1, P, C)`, `boxes` `(1, P, 4)` and `labels`
    /// holds one name per class. Class 0 is background and is skipped.
    /// Detections come out by ascending class, then descending score.
    pub fn process(
        &mut self,
        scores: ArrayView3<'_, f32>,
        boxes: ArrayView3<'_, f32>,
        labels: &[Arc<str>],
        decoder: &BoxDecoder<'_>,
    ) -> Vec<Detection> {
        let num_classes = scores.len_of(Axis(2));
        debug_assert_eq!(labels.len(), num_classes);

        let mut detections = Vec::new();
        for class in 1..num_classes {
            let found = self
                .buffers
                .collect(scores, boxes, class, self.min_score, decoder);
            if found == 0 {
                continue;
            }

            let kept = self.buffers.suppress(self.max_iou);
            trace!(class, candidates = found, kept, "class suppressed");

            let buffers = &self.buffers;
            detections.extend(buffers.kept().iter().map(|&idx| {
                trace!(
                    class,
                    anchor = buffers.anchor(idx),
                    score = buffers.score(idx),
                    "kept candidate"
                );
                Detection::new(
                    buffers.rect(idx),
                    Arc::clone(&labels[class]),
                    buffers.score(idx),
                )
            }));
        }
        detections
    }
}
