//! Prediction front end: config assembly, file loading and reporting

use anyhow::{Context, Result};
use serde::Serialize;
use smartcart_core::{ClassNames, PredictionReport};
use smartcart_nms::{DetectionPipeline, DetectionSet, PipelineConfig};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub iou_threshold: Option<f64>,
    pub min_confidence: Option<f64>,
    pub unique_labels: bool,
}

/// One report for a single image, an array for several
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Single(PredictionReport),
    Batch(Vec<PredictionReport>),
}

/// Defaults, then the config file, then command-line overrides
pub fn build_config(config_path: Option<&Path>, overrides: &Overrides) -> Result<PipelineConfig> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(iou_threshold) = overrides.iou_threshold {
        config.suppression.iou_threshold = iou_threshold;
    }
    if let Some(min_confidence) = overrides.min_confidence {
        config.min_confidence = min_confidence;
    }
    if overrides.unique_labels {
        config.unique_labels = true;
    }

    config.validate().context("Invalid command-line configuration")?;
    Ok(config)
}

/// Load names and detections, run the pipeline on every image
pub fn run(config: &PipelineConfig, names_path: &Path, detection_paths: &[PathBuf]) -> Result<Output> {
    let names = ClassNames::load(names_path)?;
    if names.is_empty() {
        warn!("Class names file {:?} has no entries", names_path);
    }

    let pipeline = DetectionPipeline::new(config.clone())?;

    let images = detection_paths
        .iter()
        .map(DetectionSet::load)
        .collect::<Result<Vec<_>>>()?;

    let mut reports = Vec::with_capacity(images.len());
    for (path, result) in detection_paths
        .iter()
        .zip(pipeline.process_batch(&images, &names))
    {
        let report = result.with_context(|| format!("Prediction failed for {:?}", path))?;
        info!("{:?}: {} product(s) detected", path, report.count);
        reports.push(report);
    }

    Ok(if reports.len() == 1 {
        Output::Single(reports.remove(0))
    } else {
        Output::Batch(reports)
    })
}
