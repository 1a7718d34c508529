//! Buoyscan Computer Vision Library
//!
//! Histogram backprojection for locating a colored buoy: build a color model from
//! annotated training images, score new images against it, and clean the
//! thresholded result into an object mask.

pub mod classify;
pub mod dataset;
pub mod model;
pub mod utils;

// Re-export commonly used types
pub use classify::{
    BuoyFinder, ClassifierConfig, FindResult, FinderConfig, MapperConfig, MaskClassifier,
    RelevanceMapper, RescaleMode,
};
pub use dataset::DatasetLoader;
pub use model::{HistogramModelBuilder, JsonCodec, TrainingPair};
pub use utils::ImageUtils;

pub use buoyscan_core::{ColorModel, HsvImage, Mask, RelevanceMap, ScanError};

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Seams between the engine and its collaborators
pub mod traits {
    use super::*;

    /// Byte encoding of a persisted color model
    pub trait ModelCodec {
        fn encode(&self, model: &ColorModel) -> buoyscan_core::Result<Vec<u8>>;
        fn decode(&self, bytes: &[u8]) -> buoyscan_core::Result<ColorModel>;
    }

    /// Supplier of annotated training pairs
    pub trait TrainingSource {
        fn training_pairs(&self) -> Result<Vec<TrainingPair>>;
    }
}
