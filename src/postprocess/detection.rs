use std::sync::Arc;

use serde::Serialize;

use crate::postprocess::rect::Rect;

/// One detected object.
///
/// `label` is shared with the predictor's label table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Normalized rectangle, top-left origin
    pub rect: Rect,
    /// Class name
    pub label: Arc<str>,
    /// Detection confidence score
    pub score: f32,
}

impl Detection {
    pub fn new(rect: Rect, label: Arc<str>, score: f32) -> Self {
        Self { rect, label, score }
    }
}
