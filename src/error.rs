//! Error types for the predictor boundary.

use thiserror::Error;

/// Errors reported by [`SsdLitePredictor`](crate::SsdLitePredictor).
///
/// The post-processing core itself is infallible; every variant here is
/// raised at the boundary before or around it.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// A caller-side precondition was violated (input count, input shape,
    /// label table length, configuration range).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// `predict` was called after the predictor was released.
    #[error("predictor has been released")]
    Released,
    /// The inference engine failed to run the model.
    #[error("inference failed")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PredictorError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;
