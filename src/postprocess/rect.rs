use serde::{Deserialize, Serialize};

/// Normalized axis-aligned rectangle.
///
/// Stored as min/max corners with `x_min <= x_max` and `y_min <= y_max`.
/// Coordinates are nominally in `[0, 1]` with a top-left origin, but are
/// never clamped: a rect remapped out of a letterboxed input may extend
/// past the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Rect {
    /// Create a Rect from min/max corners, as given.
    #[inline]
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Create a Rect from two opposite corners in any order.
    #[inline]
    pub fn from_corners(a: (f32, f32), b: (f32, f32)) -> Self {
        Self {
            x_min: a.0.min(b.0),
            y_min: a.1.min(b.1),
            x_max: a.0.max(b.0),
            y_max: a.1.max(b.1),
        }
    }

    /// Create a Rect from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_corners((x, y), (x + width, y + height))
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether all four coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
    }

    /// Area of the overlap with `other`, zero when they are disjoint.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let h = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        w * h
    }

    /// Calculate Intersection over Union (IoU) with another rectangle.
    ///
    /// Returns 0 when either rectangle has zero area.
    pub fn iou(&self, other: &Rect) -> f32 {
        let area_a = self.area();
        let area_b = other.area();
        if area_a <= 0.0 || area_b <= 0.0 {
            return 0.0;
        }

        let inter_area = self.intersection_area(other);
        inter_area / (area_a + area_b - inter_area)
    }

    /// Scale a normalized rect to pixel coordinates of a `width` x `height` image.
    #[inline]
    pub fn to_pixels(&self, width: u32, height: u32) -> [f32; 4] {
        let (w, h) = (width as f32, height as f32);
        [self.x_min * w, self.y_min * h, self.x_max * w, self.y_max * h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_sorts() {
        let rect = Rect::from_corners((0.8, 0.1), (0.2, 0.6));
        assert_eq!(rect, Rect::new(0.2, 0.1, 0.8, 0.6));
    }

    #[test]
    fn test_from_tlwh() {
        let rect = Rect::from_tlwh(0.1, 0.2, 0.3, 0.4);
        assert!((rect.x_max - 0.4).abs() < 1e-6);
        assert!((rect.y_max - 0.6).abs() < 1e-6);
        assert!((rect.width() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_iou() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);

        // Intersection: 5x5 = 25
        // Union: 100 + 100 - 25 = 175
        let iou = a.iou(&b);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_same_box() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_zero_area() {
        let line = Rect::new(0.0, 0.5, 1.0, 0.5);
        let full = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(line.iou(&full), 0.0);
        assert_eq!(line.iou(&line), 0.0);
    }

    #[test]
    fn test_to_pixels() {
        let rect = Rect::new(0.25, 0.5, 0.75, 1.0);
        assert_eq!(rect.to_pixels(640, 480), [160.0, 240.0, 480.0, 480.0]);
    }
}
