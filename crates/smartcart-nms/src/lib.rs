//! SmartCart suppression engine
//!
//! Reduces raw model detections for one image to the list of products in it,
//! dropping overlapping detections of the same class with per-class greedy
//! non-maximum suppression.

pub mod bbox;
pub mod error;
pub mod suppression;
pub mod utils;

// Re-export commonly used types
pub use bbox::{BBox, Detection, DetectionSet, intersection_over_union};
pub use error::SuppressionError;
pub use suppression::{
    DetectionPipeline, PipelineConfig, SuppressionConfig, SuppressionEngine, select_survivors,
    suppress_duplicates,
};
pub use traits::{ClassLabels, NonMaxSuppression};

// Error handling
pub type Result<T> = std::result::Result<T, SuppressionError>;

/// Core traits for the suppression system
pub mod traits {
    use super::*;
    use smartcart_core::ClassNames;
    use std::collections::{BTreeMap, HashMap};

    /// Anything that can turn a class id into a display label
    pub trait ClassLabels {
        fn label(&self, class_id: usize) -> Option<&str>;
    }

    /// Trait for non-maximum suppression implementations
    pub trait NonMaxSuppression {
        /// Indices of surviving detections, in output order
        fn apply_nms(&self, detections: &[Detection]) -> Result<Vec<usize>>;

        /// Labels of surviving detections, in output order
        fn suppress<L: ClassLabels + ?Sized>(
            &self,
            detections: &[Detection],
            labels: &L,
        ) -> Result<Vec<String>>;
    }

    impl ClassLabels for ClassNames {
        fn label(&self, class_id: usize) -> Option<&str> {
            self.get(class_id)
        }
    }

    impl<S: AsRef<str>> ClassLabels for [S] {
        fn label(&self, class_id: usize) -> Option<&str> {
            self.get(class_id).map(AsRef::as_ref)
        }
    }

    impl<S: AsRef<str>> ClassLabels for Vec<S> {
        fn label(&self, class_id: usize) -> Option<&str> {
            self.as_slice().label(class_id)
        }
    }

    impl<S: AsRef<str>> ClassLabels for HashMap<usize, S> {
        fn label(&self, class_id: usize) -> Option<&str> {
            self.get(&class_id).map(AsRef::as_ref)
        }
    }

    impl<S: AsRef<str>> ClassLabels for BTreeMap<usize, S> {
        fn label(&self, class_id: usize) -> Option<&str> {
            self.get(&class_id).map(AsRef::as_ref)
        }
    }

    impl<T: ClassLabels + ?Sized> ClassLabels for &T {
        fn label(&self, class_id: usize) -> Option<&str> {
            (**self).label(class_id)
        }
    }
}
