//! Aspect-mode coordinate mapping between source image and model input.

use nalgebra::{Matrix3, Point2};
use serde::{Deserialize, Serialize};

use crate::postprocess::{InputShape, Rect, RectTransform};

/// How an image is fit into a model input of a different aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectMode {
    /// Stretch the image to the input, ignoring aspect ratio
    #[default]
    ScaleToFit,
    /// Letterbox: scale to fit inside the input, pad the rest
    AspectFit,
    /// Scale to cover the input, crop the overflow
    AspectFill,
}

/// Affine map from image-normalized to model-normalized coordinates.
///
/// `image` is `(width, height)` in pixels.
pub fn image_to_model(image: (usize, usize), input: &InputShape, mode: AspectMode) -> Matrix3<f32> {
    let (iw, ih) = (image.0 as f32, image.1 as f32);
    let (mw, mh) = (input.width as f32, input.height as f32);
    let scale = match mode {
        AspectMode::ScaleToFit => return Matrix3::identity(),
        AspectMode::AspectFit => (mw / iw).min(mh / ih),
        AspectMode::AspectFill => (mw / iw).max(mh / ih),
    };
    // Fraction of the model input covered by the scaled image, per axis.
    let fx = iw * scale / mw;
    let fy = ih * scale / mh;
    Matrix3::new(
        fx, 0.0, (1.0 - fx) / 2.0,
        0.0, fy, (1.0 - fy) / 2.0,
        0.0, 0.0, 1.0,
    )
}

/// Inverse of [`image_to_model`].
pub fn model_to_image(image: (usize, usize), input: &InputShape, mode: AspectMode) -> Matrix3<f32> {
    let m = image_to_model(image, input, mode);
    // Diagonal scale plus translation, inverted in closed form.
    let (fx, fy) = (m[(0, 0)], m[(1, 1)]);
    let (ox, oy) = (m[(0, 2)], m[(1, 2)]);
    Matrix3::new(
        1.0 / fx, 0.0, -ox / fx,
        0.0, 1.0 / fy, -oy / fy,
        0.0, 0.0, 1.0,
    )
}

/// Apply an affine map to both corners of `rect`.
///
/// The result is not clamped to `[0, 1]`.
pub fn transform_rect(m: &Matrix3<f32>, rect: Rect) -> Rect {
    let a = m.transform_point(&Point2::new(rect.x_min, rect.y_min));
    let b = m.transform_point(&Point2::new(rect.x_max, rect.y_max));
    Rect::from_corners((a.x, a.y), (b.x, b.y))
}

/// Model-to-image map computed once for one image and input shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectMapping {
    to_image: Matrix3<f32>,
}

impl RectMapping {
    pub fn new(image: (usize, usize), input: &InputShape, mode: AspectMode) -> Self {
        Self {
            to_image: model_to_image(image, input, mode),
        }
    }
}

impl RectTransform for RectMapping {
    fn transform_rect(&self, rect: Rect, _input: &InputShape) -> Rect {
        transform_rect(&self.to_image, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rect_eq(a: Rect, b: Rect) {
        let d = [
            a.x_min - b.x_min,
            a.y_min - b.y_min,
            a.x_max - b.x_max,
            a.y_max - b.y_max,
        ];
        assert!(d.iter().all(|v| v.abs() < 1e-5), "{a:?} != {b:?}");
    }

    #[test]
    fn test_scale_to_fit_is_identity() {
        let input = InputShape::new(300, 300, 3);
        let m = model_to_image((640, 480), &input, AspectMode::ScaleToFit);
        let rect = Rect::new(0.1, 0.2, 0.3, 0.4);
        assert_rect_eq(transform_rect(&m, rect), rect);
    }

    #[test]
    fn test_aspect_fit_letterbox() {
        // 640x320 into 300x300: content covers the middle half vertically.
        let input = InputShape::new(300, 300, 3);
        let fwd = image_to_model((640, 320), &input, AspectMode::AspectFit);
        let full = transform_rect(&fwd, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_rect_eq(full, Rect::new(0.0, 0.25, 1.0, 0.75));

        let inv = model_to_image((640, 320), &input, AspectMode::AspectFit);
        assert_rect_eq(transform_rect(&inv, full), Rect::new(0.0, 0.0, 1.0, 1.0));
        // Padding maps outside the image and is kept unclamped.
        let top_pad = transform_rect(&inv, Rect::new(0.0, 0.0, 1.0, 0.25));
        assert_rect_eq(top_pad, Rect::new(0.0, -0.5, 1.0, 0.0));
    }

    #[test]
    fn test_mapping_matches_matrix() {
        let input = InputShape::new(300, 300, 3);
        let mapping = RectMapping::new((640, 320), &input, AspectMode::AspectFit);
        let m = model_to_image((640, 320), &input, AspectMode::AspectFit);
        let rect = Rect::new(0.1, 0.3, 0.6, 0.7);
        assert_eq!(mapping.transform_rect(rect, &input), transform_rect(&m, rect));
    }

    #[test]
    fn test_aspect_fill_crop() {
        // 640x320 into 300x300: only the middle half is visible horizontally.
        let input = InputShape::new(300, 300, 3);
        let inv = model_to_image((640, 320), &input, AspectMode::AspectFill);
        let visible = transform_rect(&inv, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_rect_eq(visible, Rect::new(0.25, 0.0, 0.75, 1.0));
    }
}
