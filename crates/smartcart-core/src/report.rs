//! Prediction report returned to the serving layer

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const SUCCESS_MESSAGE: &str = "Prediction successful";

/// Labels detected in one image, in the order the engine kept them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub message: String,
    pub products_detected: Vec<String>,
    pub count: usize,
    pub product_counts: BTreeMap<String, usize>,
}

impl PredictionReport {
    /// Build a successful report from the kept labels
    pub fn new(products_detected: Vec<String>) -> Self {
        let mut product_counts = BTreeMap::new();
        for label in &products_detected {
            *product_counts.entry(label.clone()).or_insert(0) += 1;
        }

        Self {
            message: SUCCESS_MESSAGE.to_string(),
            count: products_detected.len(),
            products_detected,
            product_counts,
        }
    }

    /// Collapse repeated labels, keeping the first occurrence of each
    pub fn into_unique(self) -> Self {
        Self::new(retain_first_occurrences(self.products_detected))
    }
}

/// Drop repeated labels while preserving the order of first appearance
pub fn retain_first_occurrences(labels: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(label.clone()))
        .collect()
}
