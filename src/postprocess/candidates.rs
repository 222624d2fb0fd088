//! Per-class candidate scratch buffers.

use ndarray::{ArrayView3, Axis, s};

use crate::postprocess::decode::BoxDecoder;
use crate::postprocess::nms;
use crate::postprocess::rect::Rect;

/// Reusable per-class candidate storage.
///
/// Holds the candidates of one class at a time as parallel buffers, plus
/// the scratch space used by suppression. Every buffer is cleared before
/// it is refilled, so nothing carries over between classes or calls. The
/// buffers are owned by one predictor and must not be shared across
/// threads.
#[derive(Debug, Default)]
pub struct CandidateBuffers {
    rects: Vec<Rect>,
    scores: Vec<f32>,
    anchors: Vec<usize>,
    order: Vec<usize>,
    keep: Vec<usize>,
}

impl CandidateBuffers {
    /// Create empty buffers with room for `capacity` candidates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rects: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
            anchors: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            keep: Vec::with_capacity(capacity),
        }
    }

    /// Collect every anchor of `class` scoring at least `min_score`.
    ///
    /// `scores` is shaped `(1, P, C)` and `boxes` `(1, P, 4)`. Boxes are
    /// decoded only for anchors that pass the threshold. Returns the number
    /// of candidates collected.
    pub fn collect(
        &mut self,
        scores: ArrayView3<'_, f32>,
        boxes: ArrayView3<'_, f32>,
        class: usize,
        min_score: f32,
        decoder: &BoxDecoder<'_>,
    ) -> usize {
        self.clear();

        let class_scores = scores.slice(s![0, .., class]);
        let boxes = boxes.index_axis(Axis(0), 0);
        for (anchor, &score) in class_scores.iter().enumerate() {
            if score >= min_score {
                let raw = boxes.row(anchor);
                let rect = decoder.decode([raw[0], raw[1], raw[2], raw[3]]);
                self.rects.push(rect);
                self.scores.push(score);
                self.anchors.push(anchor);
            }
        }
        self.len()
    }

    /// Run non-maximum suppression over the collected candidates.
    ///
    /// Returns the number of survivors, see [`kept`](Self::kept).
    pub fn suppress(&mut self, max_iou: f32) -> usize {
        nms::suppress_into(
            &self.rects,
            &self.scores,
            max_iou,
            &mut self.order,
            &mut self.keep,
        );
        self.keep.len()
    }

    /// Survivors of the last [`suppress`](Self::suppress), in descending
    /// score order.
    pub fn kept(&self) -> &[usize] {
        &self.keep
    }

    pub fn clear(&mut self) {
        self.rects.clear();
        self.scores.clear();
        self.anchors.clear();
        self.order.clear();
        self.keep.clear();
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rect(&self, idx: usize) -> Rect {
        self.rects[idx]
    }

    pub fn score(&self, idx: usize) -> f32 {
        self.scores[idx]
    }

    /// Anchor position the candidate was read from.
    pub fn anchor(&self, idx: usize) -> usize {
        self.anchors[idx]
    }
}
