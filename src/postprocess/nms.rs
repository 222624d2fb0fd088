//! Greedy non-maximum suppression.

use std::cmp::Ordering;

use crate::postprocess::rect::Rect;

/// Suppress overlapping candidates of a single class.
///
/// Candidates are visited by descending score, ties broken by ascending
/// index. A candidate is kept unless its IoU with an already kept rect
/// exceeds `max_iou`. Returns indices into `rects`/`scores` in the order
/// they were kept, which is descending score.
///
/// `rects` and `scores` must have the same length.
pub fn non_max_suppression(rects: &[Rect], scores: &[f32], max_iou: f32) -> Vec<usize> {
    let mut order = Vec::with_capacity(rects.len());
    let mut keep = Vec::new();
    suppress_into(rects, scores, max_iou, &mut order, &mut keep);
    keep
}

/// [`non_max_suppression`] writing into caller-owned buffers.
///
/// Both buffers are cleared first.
pub(crate) fn suppress_into(
    rects: &[Rect],
    scores: &[f32],
    max_iou: f32,
    order: &mut Vec<usize>,
    keep: &mut Vec<usize>,
) {
    debug_assert_eq!(rects.len(), scores.len());
    order.clear();
    keep.clear();

    order.extend(0..rects.len());
    // `sort_by` is stable, so equal scores stay in index order.
    order.sort_by(|&a, &b| descending(scores[a], scores[b]));

    for &idx in order.iter() {
        let rect = &rects[idx];
        let suppressed = keep.iter().any(|&k| rects[k].iou(rect) > max_iou);
        if !suppressed {
            keep.push(idx);
        }
    }
}

/// Descending score order with NaN last.
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}
