//! Classification configuration

use super::morphology::StructuringElement;
use crate::Result;
use anyhow::Context;
use buoyscan_core::{ScanError, RELEVANCE_CEILING};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for scoring and classifying query images
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub mapper: MapperConfig,
    pub classifier: ClassifierConfig,
}

/// How raw scores are stretched onto `0..=RELEVANCE_CEILING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RescaleMode {
    /// Lowest score in the image maps to 0, highest to the ceiling
    #[default]
    PerImage,
    /// Fixed range spanned by the model's lowest and highest possible scores
    ModelRange,
}

/// Relevance mapper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub rescale: RescaleMode,
    /// Median window is `2 * median_radius + 1` pixels wide; 0 disables it
    pub median_radius: u32,
}

/// Mask classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub threshold: u8,
    pub open_element: StructuringElement,
    pub close_element: StructuringElement,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            rescale: RescaleMode::PerImage,
            median_radius: 3,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: Self::threshold_from_ratio(0.8),
            open_element: StructuringElement::new(2, 2),
            close_element: StructuringElement::new(12, 12),
        }
    }
}

impl ClassifierConfig {
    /// Threshold at `ratio` of the relevance ceiling, clamped to `0.0..=1.0`
    pub fn threshold_from_ratio(ratio: f64) -> u8 {
        (ratio.clamp(0.0, 1.0) * RELEVANCE_CEILING as f64).round() as u8
    }

    pub fn validate(&self) -> buoyscan_core::Result<()> {
        for (name, element) in [("opening", self.open_element), ("closing", self.close_element)] {
            element.validate().map_err(|e| {
                ScanError::InvalidConfig(format!("{} element: {}", name, e))
            })?;
        }
        Ok(())
    }
}

impl FinderConfig {
    /// Load a JSON configuration; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: FinderConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> buoyscan_core::Result<()> {
        self.classifier.validate()
    }
}
