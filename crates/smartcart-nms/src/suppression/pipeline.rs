//! Per-image pipeline: confidence cut-off, suppression, report

use super::config::PipelineConfig;
use super::engine::{SuppressionEngine, validate_detection};
use crate::{Result, SuppressionError};
use crate::bbox::{Detection, DetectionSet};
use crate::traits::{ClassLabels, NonMaxSuppression};
use crate::utils::batch::map_images;
use smartcart_core::PredictionReport;
use std::time::Instant;
use tracing::debug;

/// Turns the raw detections of an image into a prediction report
#[derive(Debug, Clone)]
pub struct DetectionPipeline {
    config: PipelineConfig,
    engine: SuppressionEngine,
}

impl DetectionPipeline {
    /// Create new pipeline
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let engine = SuppressionEngine::new(config.suppression)?;
        Ok(Self { config, engine })
    }

    /// Process the detections of a single image
    pub fn process<L: ClassLabels + ?Sized>(
        &self,
        detections: &[Detection],
        labels: &L,
    ) -> Result<PredictionReport> {
        let start_time = Instant::now();

        // Everything is checked before the cut-off can hide a bad detection.
        for (index, detection) in detections.iter().enumerate() {
            validate_detection(index, detection)?;
            if labels.label(detection.class_id).is_none() {
                return Err(SuppressionError::UnknownClass {
                    index,
                    class_id: detection.class_id,
                });
            }
        }

        let confident = detections
            .iter()
            .cloned()
            .collect::<DetectionSet>()
            .filter_by_confidence(self.config.min_confidence);

        let kept = self.engine.suppress(confident.as_slice(), labels)?;

        debug!(
            "Processed {} detections ({} above {:.2} confidence) into {} labels in {:?}",
            detections.len(),
            confident.len(),
            self.config.min_confidence,
            kept.len(),
            start_time.elapsed()
        );

        let report = PredictionReport::new(kept);
        Ok(if self.config.unique_labels {
            report.into_unique()
        } else {
            report
        })
    }

    /// Process several independent images, one result per image in input order
    pub fn process_batch<L: ClassLabels + Sync + ?Sized>(
        &self,
        images: &[DetectionSet],
        labels: &L,
    ) -> Vec<Result<PredictionReport>> {
        map_images(images, |image| self.process(image.as_slice(), labels))
    }
}
