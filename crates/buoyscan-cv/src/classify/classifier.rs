//! Threshold and denoise a relevance map into an object mask

use super::config::ClassifierConfig;
use super::morphology::{self, StructuringElement};
use buoyscan_core::{Mask, RelevanceMap, Result};

/// Binary thresholding followed by opening and closing
#[derive(Debug, Clone)]
pub struct MaskClassifier {
    open_element: StructuringElement,
    close_element: StructuringElement,
}

impl MaskClassifier {
    fn new(open_element: StructuringElement, close_element: StructuringElement) -> Self {
        Self {
            open_element,
            close_element,
        }
    }

    /// Build from a configuration, rejecting empty or oversized elements
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.open_element, config.close_element))
    }

    /// Object iff `relevance >= threshold`, then open and close
    pub fn classify(&self, map: &RelevanceMap, threshold: u8) -> Mask {
        let mask = Self::threshold(map, threshold);
        let mask = morphology::open(&mask, self.open_element);
        morphology::close(&mask, self.close_element)
    }

    /// Plain binary thresholding without cleanup
    pub fn threshold(map: &RelevanceMap, threshold: u8) -> Mask {
        map.map(|&relevance| relevance >= threshold)
    }
}

impl Default for MaskClassifier {
    fn default() -> Self {
        let config = ClassifierConfig::default();
        Self::new(config.open_element, config.close_element)
    }
}
