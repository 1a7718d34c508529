//! High-level buoy finder: model + mapper + classifier

use super::classifier::MaskClassifier;
use super::config::FinderConfig;
use super::mapper::RelevanceMapper;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use buoyscan_core::{ColorModel, HsvImage, Mask, RelevanceMap};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Relevance map, final mask and summary for one query image
#[derive(Debug, Clone)]
pub struct FindResult {
    pub relevance: RelevanceMap,
    pub mask: Mask,
    pub stats: FindStats,
}

/// Summary of one classified image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindStats {
    pub width: u32,
    pub height: u32,
    pub object_pixels: usize,
    pub coverage: f64,
    pub threshold: u8,
    pub processing_time_ms: u64,
}

/// Summary tagged with the file it came from, for reports
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub image: PathBuf,
    #[serde(flatten)]
    pub stats: FindStats,
}

/// Scores and classifies query images against one color model
pub struct BuoyFinder {
    model: ColorModel,
    config: FinderConfig,
    mapper: RelevanceMapper,
    classifier: MaskClassifier,
}

impl BuoyFinder {
    /// Create a finder; the configuration is validated
    pub fn new(model: ColorModel, config: FinderConfig) -> buoyscan_core::Result<Self> {
        let classifier = MaskClassifier::from_config(&config.classifier)?;
        let mapper = RelevanceMapper::new(config.mapper.clone());

        Ok(Self {
            model,
            config,
            mapper,
            classifier,
        })
    }

    pub fn model(&self) -> &ColorModel {
        &self.model
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Score and classify an HSV image
    pub fn find(&self, image: &HsvImage) -> buoyscan_core::Result<FindResult> {
        let start_time = Instant::now();

        let relevance = self.mapper.score(image, &self.model);
        let threshold = self.config.classifier.threshold;
        let mask = self.classifier.classify(&relevance, threshold);

        let stats = FindStats {
            width: image.width(),
            height: image.height(),
            object_pixels: mask.count_set(),
            coverage: mask.coverage(),
            threshold,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(FindResult {
            relevance,
            mask,
            stats,
        })
    }

    /// Decode an image file, then score and classify it
    pub fn find_from_file<P: AsRef<Path>>(&self, image_path: P) -> Result<FindResult> {
        let image = ImageUtils::load_hsv(&image_path)?;
        let result = self
            .find(&image)
            .with_context(|| format!("Failed to classify image: {:?}", image_path.as_ref()))?;

        info!(
            "{:?}: {} object px ({:.2}%) in {}ms",
            image_path.as_ref(),
            result.stats.object_pixels,
            result.stats.coverage * 100.0,
            result.stats.processing_time_ms
        );
        Ok(result)
    }

    /// Process several files; the first failure aborts the batch
    pub fn batch_find<P: AsRef<Path> + Sync>(&self, image_paths: &[P]) -> Result<Vec<FindResult>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            image_paths
                .par_iter()
                .map(|path| self.find_from_file(path))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            image_paths
                .iter()
                .map(|path| self.find_from_file(path))
                .collect()
        }
    }

    /// Write the relevance map and mask as `relevance.<name>.png` and `found.<name>.png`
    pub fn save_outputs<P: AsRef<Path>>(
        &self,
        result: &FindResult,
        output_dir: P,
        name: &str,
    ) -> Result<(PathBuf, PathBuf)> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        let relevance_path = output_dir.join(format!("relevance.{}.png", stem));
        let mask_path = output_dir.join(format!("found.{}.png", stem));

        ImageUtils::save_luma(&ImageUtils::relevance_to_luma(&result.relevance), &relevance_path)?;
        ImageUtils::save_luma(&ImageUtils::mask_to_luma(&result.mask), &mask_path)?;

        Ok((relevance_path, mask_path))
    }

    /// Export per-image summaries in JSON format
    pub fn export_json(&self, reports: &[ImageReport], output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(reports)
            .context("Failed to serialize find results")?;

        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write JSON to: {:?}", output_path))?;

        Ok(())
    }
}
