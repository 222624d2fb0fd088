//! Predictor input features.

use nalgebra::Point2;
use ndarray::{Array3, ArrayView3, Axis};

use crate::error::{PredictorError, Result};
use crate::integration::transform::{self, AspectMode, RectMapping};
use crate::postprocess::{InputShape, Rect, RectTransform};

/// Input accepted by [`SsdLitePredictor::predict`](crate::SsdLitePredictor::predict).
#[derive(Debug, Clone)]
pub enum Feature {
    /// Source image, fit to the model input and mapped back afterwards
    Image(ImageFeature),
    /// Tensor already shaped like the model input
    Array(ArrayFeature),
}

impl From<ImageFeature> for Feature {
    fn from(image: ImageFeature) -> Self {
        Feature::Image(image)
    }
}

impl From<ArrayFeature> for Feature {
    fn from(array: ArrayFeature) -> Self {
        Feature::Array(array)
    }
}

/// Image in `(H, W, C)` layout with float pixel values.
#[derive(Debug, Clone)]
pub struct ImageFeature {
    pixels: Array3<f32>,
    aspect_mode: AspectMode,
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl ImageFeature {
    pub fn new(pixels: Array3<f32>) -> Self {
        Self {
            pixels,
            aspect_mode: AspectMode::default(),
            mean: Vec::new(),
            std: Vec::new(),
        }
    }

    /// Create from interleaved 8-bit pixels, scaled to `[0, 1]`.
    pub fn from_u8(data: &[u8], width: usize, height: usize, channels: usize) -> Result<Self> {
        let expected_len = width * height * channels;
        if data.len() != expected_len {
            return Err(PredictorError::invalid(format!(
                "expected {expected_len} bytes for {width}x{height}x{channels}, got {}",
                data.len()
            )));
        }
        let pixels = data.iter().map(|&x| x as f32 / 255.0).collect::<Vec<_>>();
        let pixels = Array3::from_shape_vec((height, width, channels), pixels)
            .map_err(|e| PredictorError::invalid(e.to_string()))?;
        Ok(Self::new(pixels))
    }

    pub fn with_aspect_mode(mut self, aspect_mode: AspectMode) -> Self {
        self.aspect_mode = aspect_mode;
        self
    }

    /// Per-channel normalization applied as `(v - mean) / std`.
    pub fn with_normalization(mut self, mean: Vec<f32>, std: Vec<f32>) -> Self {
        self.mean = mean;
        self.std = std;
        self
    }

    pub fn width(&self) -> usize {
        self.pixels.len_of(Axis(1))
    }

    pub fn height(&self) -> usize {
        self.pixels.len_of(Axis(0))
    }

    pub fn channels(&self) -> usize {
        self.pixels.len_of(Axis(2))
    }

    pub fn aspect_mode(&self) -> AspectMode {
        self.aspect_mode
    }

    /// Fit the image into a model input of shape `input`.
    ///
    /// Pixels are sampled nearest-neighbour through the aspect-mode map;
    /// letterbox padding is left at zero before normalization.
    pub fn create(&self, input: &InputShape) -> Result<Array3<f32>> {
        let channels = self.channels();
        if self.width() == 0 || self.height() == 0 {
            return Err(PredictorError::invalid("image is empty"));
        }
        if channels != input.channels {
            return Err(PredictorError::invalid(format!(
                "model expects {} channels, image has {channels}",
                input.channels
            )));
        }
        let has_norm = !self.mean.is_empty() || !self.std.is_empty();
        if has_norm && (self.mean.len() != channels || self.std.len() != channels) {
            return Err(PredictorError::invalid(format!(
                "normalization needs {channels} mean and std values"
            )));
        }

        let (iw, ih) = (self.width(), self.height());
        let to_image = transform::model_to_image((iw, ih), input, self.aspect_mode);
        let mut out = Array3::zeros((input.height, input.width, channels));
        for row in 0..input.height {
            for col in 0..input.width {
                let u = (col as f32 + 0.5) / input.width as f32;
                let v = (row as f32 + 0.5) / input.height as f32;
                let p = to_image.transform_point(&Point2::new(u, v));
                if !(0.0..1.0).contains(&p.x) || !(0.0..1.0).contains(&p.y) {
                    continue;
                }
                let x = ((p.x * iw as f32) as usize).min(iw - 1);
                let y = ((p.y * ih as f32) as usize).min(ih - 1);
                for c in 0..channels {
                    out[[row, col, c]] = self.pixels[[y, x, c]];
                }
            }
        }

        if has_norm {
            for (c, mut plane) in out.axis_iter_mut(Axis(2)).enumerate() {
                let (mean, std) = (self.mean[c], self.std[c]);
                plane.mapv_inplace(|v| (v - mean) / std);
            }
        }
        Ok(out)
    }

    /// Precompute the map from model-input rects back to this image.
    pub fn rect_mapping(&self, input: &InputShape) -> RectMapping {
        RectMapping::new((self.width(), self.height()), input, self.aspect_mode)
    }
}

impl RectTransform for ImageFeature {
    fn transform_rect(&self, rect: Rect, input: &InputShape) -> Rect {
        self.rect_mapping(input).transform_rect(rect, input)
    }
}

/// Raw `(H, W, C)` tensor passed to the engine unchanged.
#[derive(Debug, Clone)]
pub struct ArrayFeature {
    data: Array3<f32>,
}

impl ArrayFeature {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// Ensure the tensor matches the model input shape.
    pub fn check_shape(&self, input: &InputShape) -> Result<()> {
        let expected = (input.height, input.width, input.channels);
        if self.data.dim() != expected {
            return Err(PredictorError::invalid(format!(
                "array feature has shape {:?}, model expects {:?}",
                self.data.dim(),
                expected
            )));
        }
        Ok(())
    }
}
