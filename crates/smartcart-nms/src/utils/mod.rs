//! Utility modules

pub mod batch;

pub use batch::{map_images, suppress_batch};
