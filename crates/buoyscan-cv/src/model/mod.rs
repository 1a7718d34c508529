//! Color model construction and persistence

pub mod builder;
pub mod codec;

pub use builder::{ClassHistograms, HistogramModelBuilder, PairHistograms};
pub use codec::{load_model, save_model, JsonCodec, DEFAULT_MODEL_FILE};

use buoyscan_core::{HsvImage, Mask};

/// An annotated training image
#[derive(Debug, Clone)]
pub struct TrainingPair {
    pub name: String,
    pub image: HsvImage,
    pub mask: Mask,
}

impl TrainingPair {
    pub fn new(name: impl Into<String>, image: HsvImage, mask: Mask) -> Self {
        Self {
            name: name.into(),
            image,
            mask,
        }
    }
}
