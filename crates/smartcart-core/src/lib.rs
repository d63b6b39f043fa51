//! SmartCart core data
//!
//! Class label sets shared by the detector front end and the suppression
//! engine, plus the report handed back to the serving layer.

pub mod labels;
pub mod report;

// Re-export commonly used types
pub use labels::ClassNames;
pub use report::PredictionReport;

// Error handling
pub type Result<T> = anyhow::Result<T>;
