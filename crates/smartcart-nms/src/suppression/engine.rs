//! Greedy per-class non-maximum suppression

use super::config::{SuppressionConfig, validate_iou_threshold};
use crate::bbox::Detection;
use crate::traits::{ClassLabels, NonMaxSuppression};
use crate::{Result, SuppressionError};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Detections of one class, as indices into the request's detection list
struct ClassGroup {
    class_id: usize,
    members: Vec<usize>,
}

/// Labels of the detections that survive suppression.
///
/// Classes appear in the order they are first seen in `detections`; within a
/// class labels follow descending confidence. Every detection must resolve to
/// a label, including ones that end up suppressed.
pub fn suppress_duplicates<L: ClassLabels + ?Sized>(
    detections: &[Detection],
    class_names: &L,
    iou_threshold: f64,
) -> Result<Vec<String>> {
    validate_iou_threshold(iou_threshold)?;

    let mut labels = Vec::with_capacity(detections.len());
    for (index, detection) in detections.iter().enumerate() {
        validate_detection(index, detection)?;
        let label = class_names
            .label(detection.class_id)
            .ok_or(SuppressionError::UnknownClass {
                index,
                class_id: detection.class_id,
            })?;
        labels.push(label);
    }

    Ok(survivors(detections, iou_threshold)
        .into_iter()
        .map(|index| labels[index].to_string())
        .collect())
}

/// Indices of the detections that survive suppression, in output order
pub fn select_survivors(detections: &[Detection], iou_threshold: f64) -> Result<Vec<usize>> {
    validate_iou_threshold(iou_threshold)?;

    for (index, detection) in detections.iter().enumerate() {
        validate_detection(index, detection)?;
    }

    Ok(survivors(detections, iou_threshold))
}

pub(crate) fn validate_detection(index: usize, detection: &Detection) -> Result<()> {
    if !detection.bbox.is_well_formed() {
        return Err(SuppressionError::MalformedBox {
            index,
            bbox: detection.bbox,
        });
    }
    // Rejecting NaN keeps the confidence ordering total.
    if !(0.0..=1.0).contains(&detection.confidence) {
        return Err(SuppressionError::InvalidConfidence {
            index,
            confidence: detection.confidence,
        });
    }
    Ok(())
}

/// Suppression over already validated input
fn survivors(detections: &[Detection], iou_threshold: f64) -> Vec<usize> {
    if detections.is_empty() {
        return Vec::new();
    }

    let groups = group_by_class(detections);
    let class_count = groups.len();

    let mut kept = Vec::with_capacity(detections.len());
    for group in groups {
        let class_kept = suppress_class(detections, group.members, iou_threshold);
        debug!(
            "class {}: kept {} detection(s)",
            group.class_id,
            class_kept.len()
        );
        kept.extend(class_kept);
    }

    debug!(
        "NMS kept {}/{} detections across {} classes (iou > {} suppressed)",
        kept.len(),
        detections.len(),
        class_count,
        iou_threshold
    );
    kept
}

/// Group by class id in first-seen order; members stay in input order
fn group_by_class(detections: &[Detection]) -> Vec<ClassGroup> {
    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<ClassGroup> = Vec::new();

    for (index, detection) in detections.iter().enumerate() {
        let slot = *slots.entry(detection.class_id).or_insert_with(|| {
            groups.push(ClassGroup {
                class_id: detection.class_id,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(index);
    }

    groups
}

fn suppress_class(detections: &[Detection], mut members: Vec<usize>, iou_threshold: f64) -> Vec<usize> {
    // Stable sort: equal confidences keep input order.
    members.sort_by(|&a, &b| {
        detections[b]
            .confidence
            .partial_cmp(&detections[a].confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<usize> = Vec::new();
    for candidate in members {
        let bbox = &detections[candidate].bbox;
        let duplicate = kept
            .iter()
            .any(|&k| detections[k].bbox.overlaps(bbox, iou_threshold));

        if !duplicate {
            kept.push(candidate);
        }
    }

    kept
}

/// Suppression with a validated configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuppressionEngine {
    config: SuppressionConfig,
}

impl SuppressionEngine {
    /// Create new engine, rejecting an out-of-range threshold
    pub fn new(config: SuppressionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_iou_threshold(iou_threshold: f64) -> Result<Self> {
        Self::new(SuppressionConfig::with_iou_threshold(iou_threshold))
    }

    pub fn iou_threshold(&self) -> f64 {
        self.config.iou_threshold
    }
}

impl Default for SuppressionEngine {
    fn default() -> Self {
        Self {
            config: SuppressionConfig::default(),
        }
    }
}

impl NonMaxSuppression for SuppressionEngine {
    fn apply_nms(&self, detections: &[Detection]) -> Result<Vec<usize>> {
        select_survivors(detections, self.config.iou_threshold)
    }

    fn suppress<L: ClassLabels + ?Sized>(
        &self,
        detections: &[Detection],
        labels: &L,
    ) -> Result<Vec<String>> {
        suppress_duplicates(detections, labels, self.config.iou_threshold)
    }
}
