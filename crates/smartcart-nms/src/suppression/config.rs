//! Suppression and pipeline configuration

use crate::SuppressionError;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// IoU above which two boxes of one class count as the same object
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.15;

/// Scores below this are dropped before suppression
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    pub iou_threshold: f64,
}

impl SuppressionConfig {
    pub fn with_iou_threshold(iou_threshold: f64) -> Self {
        Self { iou_threshold }
    }

    /// The threshold must lie in (0, 1]; it is never clamped
    pub fn validate(&self) -> crate::Result<()> {
        validate_iou_threshold(self.iou_threshold)
    }
}

impl Default for SuppressionConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

pub(crate) fn validate_iou_threshold(iou_threshold: f64) -> crate::Result<()> {
    if iou_threshold > 0.0 && iou_threshold <= 1.0 {
        Ok(())
    } else {
        Err(SuppressionError::InvalidConfig(format!(
            "IoU threshold must be in (0, 1], got {}",
            iou_threshold
        )))
    }
}

/// Everything applied to one image between the model and the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub suppression: SuppressionConfig,
    pub min_confidence: f64,
    /// Report each product once, in order of first appearance
    pub unique_labels: bool,
}

impl PipelineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        config
            .validate()
            .with_context(|| format!("Rejected config: {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.suppression.validate()?;

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(SuppressionError::InvalidConfig(format!(
                "Minimum confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            suppression: SuppressionConfig::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            unique_labels: false,
        }
    }
}
