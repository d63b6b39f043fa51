//! Class-id to display-name mapping and its file loaders

mod names;

pub use names::ClassNames;
