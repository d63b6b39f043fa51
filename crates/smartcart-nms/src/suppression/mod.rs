//! Per-class duplicate suppression

pub mod config;
pub mod engine;
pub mod pipeline;

pub use config::{PipelineConfig, SuppressionConfig};
pub use engine::{SuppressionEngine, select_survivors, suppress_duplicates};
pub use pipeline::DetectionPipeline;
