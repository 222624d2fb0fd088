//! Predictor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Thresholds applied by [`SsdLitePredictor`](crate::SsdLitePredictor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Minimum candidate score, inclusive
    pub min_score: f32,
    /// Maximum IoU allowed between two kept detections of the same class
    pub max_iou: f32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_score: 0.6,
            max_iou: 0.5,
        }
    }
}

impl PredictorConfig {
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_max_iou(mut self, max_iou: f32) -> Self {
        self.max_iou = max_iou;
        self
    }

    /// Check that `min_score` is in `[0, 1]` and `max_iou` in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(PredictorError::invalid(format!(
                "min_score must be in [0, 1], got {}",
                self.min_score
            )));
        }
        if !(self.max_iou > 0.0 && self.max_iou <= 1.0) {
            return Err(PredictorError::invalid(format!(
                "max_iou must be in (0, 1], got {}",
                self.max_iou
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.min_score, 0.6);
        assert_eq!(config.max_iou, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ranges() {
        let base = PredictorConfig::default();
        assert!(base.with_min_score(0.0).validate().is_ok());
        assert!(base.with_min_score(1.0).validate().is_ok());
        assert!(base.with_max_iou(1.0).validate().is_ok());

        assert!(base.with_min_score(-0.1).validate().is_err());
        assert!(base.with_min_score(f32::NAN).validate().is_err());
        assert!(base.with_max_iou(0.0).validate().is_err());
        assert!(base.with_max_iou(1.5).validate().is_err());
        assert!(base.with_max_iou(f32::NAN).validate().is_err());
    }
}
