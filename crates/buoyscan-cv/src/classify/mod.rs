//! Relevance mapping and mask classification

pub mod classifier;
pub mod config;
pub mod finder;
pub mod mapper;
pub mod morphology;

pub use classifier::MaskClassifier;
pub use config::{ClassifierConfig, FinderConfig, MapperConfig, RescaleMode};
pub use finder::{BuoyFinder, FindResult, FindStats, ImageReport};
pub use mapper::RelevanceMapper;
pub use morphology::StructuringElement;
