//! Batch helpers for several images at once
//!
//! With the `parallel` feature images are spread over the rayon thread pool;
//! otherwise they run one after another. Output order always matches input.

use crate::bbox::DetectionSet;
use crate::traits::{ClassLabels, NonMaxSuppression};
use crate::Result;

/// Apply `f` to every image, keeping input order
pub fn map_images<T, R, F>(images: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        images.par_iter().map(f).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        images.iter().map(f).collect()
    }
}

/// Suppress duplicates in each image independently
pub fn suppress_batch<N, L>(engine: &N, images: &[DetectionSet], labels: &L) -> Vec<Result<Vec<String>>>
where
    N: NonMaxSuppression + Sync,
    L: ClassLabels + Sync + ?Sized,
{
    map_images(images, |image| engine.suppress(image.as_slice(), labels))
}
