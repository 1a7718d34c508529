//! Buoyscan core data model
//!
//! Pixel grids, HSV pixels, per-channel histograms and the persisted color model
//! shared by the training and classification stages.

pub mod error;
pub mod grid;
pub mod histogram;

pub use error::{Result, ScanError};
pub use grid::{Grid, Hsv, HsvImage, Mask, RelevanceMap, RELEVANCE_CEILING};
pub use histogram::{
    Channel, ChannelHistogram, ColorModel, DifferenceHistogram, NormalizedHistogram,
};
