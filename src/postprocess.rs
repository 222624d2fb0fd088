//! Pure post-processing pipeline: decode, filter, suppress, assemble.

mod assembler;
mod candidates;
mod decode;
mod detection;
mod nms;
mod rect;

pub use assembler::Postprocessor;
pub use candidates::CandidateBuffers;
pub use decode::{BoxDecoder, InputShape, RectTransform, decode_box};
pub use detection::Detection;
pub use nms::non_max_suppression;
pub use rect::Rect;
