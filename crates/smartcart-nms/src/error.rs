use crate::bbox::BBox;
use thiserror::Error;

/// Request-level failures of the suppression engine. None of them leave
/// partial output behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuppressionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Detection {index} has class id {class_id} with no known label")]
    UnknownClass { index: usize, class_id: usize },

    #[error("Detection {index} has malformed box {bbox}")]
    MalformedBox { index: usize, bbox: BBox },

    #[error("Detection {index} has confidence {confidence} outside [0, 1]")]
    InvalidConfidence { index: usize, confidence: f64 },
}
