//! Raw box decoding.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::postprocess::rect::Rect;

/// Spatial shape of the model input, `(height, width, channels)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl InputShape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }
}

/// Maps a rectangle in model-input space back to source-image space.
///
/// Implemented by input features that were letterboxed or cropped before
/// being fed to the model.
pub trait RectTransform {
    fn transform_rect(&self, rect: Rect, input: &InputShape) -> Rect;
}

/// Decode one raw `(x0, y0, x1, y1)` box into a top-left-origin [`Rect`].
///
/// The model emits a bottom-left-origin encoding, so the vertical axis is
/// flipped: `left = x0`, `bottom = 1 - y1`, `right = x1`, `top = 1 - y0`.
#[inline]
pub fn decode_box(raw: [f32; 4]) -> Rect {
    let [x0, y0, x1, y1] = raw;
    Rect::from_corners((x0, 1.0 - y1), (x1, 1.0 - y0))
}

/// Box decoder bound to the optional coordinate transform of one call.
#[derive(Clone, Copy)]
pub struct BoxDecoder<'a> {
    transform: Option<(&'a dyn RectTransform, InputShape)>,
}

impl<'a> BoxDecoder<'a> {
    /// Decoder that leaves rects in model-input space.
    pub fn new() -> Self {
        Self { transform: None }
    }

    /// Decoder that remaps every rect through `transform`.
    pub fn with_transform(transform: &'a dyn RectTransform, input: InputShape) -> Self {
        Self {
            transform: Some((transform, input)),
        }
    }

    pub fn decode(&self, raw: [f32; 4]) -> Rect {
        let rect = decode_box(raw);
        let rect = match self.transform {
            Some((transform, ref input)) => transform.transform_rect(rect, input),
            None => rect,
        };
        if !rect.is_finite() {
            warn!(?raw, ?rect, "decoded box is not finite");
        }
        rect
    }
}

impl Default for BoxDecoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
