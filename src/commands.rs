//! CLI commands built on buoyscan-cv

use anyhow::Context;
use buoyscan_core::Channel;
use buoyscan_cv::classify::{ImageReport, StructuringElement};
use buoyscan_cv::model::{load_model, save_model};
use buoyscan_cv::traits::TrainingSource;
use buoyscan_cv::{BuoyFinder, DatasetLoader, FinderConfig, HistogramModelBuilder, JsonCodec};
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub threshold: Option<u8>,
    pub open: Option<StructuringElement>,
    pub close: Option<StructuringElement>,
}

pub struct FindArgs {
    pub input: PathBuf,
    pub model: PathBuf,
    pub config: Option<PathBuf>,
    pub overrides: Overrides,
    pub output_dir: PathBuf,
    pub report: Option<PathBuf>,
}

/// Build a color model from a dataset and save it
pub fn analyze(base_path: &Path, output: &Path, mask_threshold: u8) -> anyhow::Result<()> {
    let loader = DatasetLoader::new(base_path).with_mask_threshold(mask_threshold);
    let pairs = loader.training_pairs()?;

    let model = HistogramModelBuilder::new()
        .build(&pairs)
        .with_context(|| format!("Failed to build a color model from {:?}", base_path))?;

    for channel in Channel::ALL {
        if let Some((bucket, value)) = model.peak(channel) {
            info!("Most buoy-like {}: bucket {} ({:+.4})", channel, bucket, value);
        }
    }

    save_model(&model, output, &JsonCodec::pretty())
}

/// Score and classify one image or a whole dataset
pub fn find(args: &FindArgs) -> anyhow::Result<()> {
    let model = load_model(&args.model, &JsonCodec::default())?;
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    let finder = BuoyFinder::new(model, config)?;

    let images = if args.input.is_dir() {
        let loader = DatasetLoader::new(&args.input);
        loader.check_directories(false)?;
        loader.image_paths()?
    } else {
        vec![args.input.clone()]
    };

    let results = finder.batch_find(&images)?;

    let mut reports = Vec::with_capacity(images.len());
    for (path, result) in images.iter().zip(&results) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let (relevance_path, mask_path) = finder.save_outputs(result, &args.output_dir, &name)?;
        info!("Wrote {:?} and {:?}", relevance_path, mask_path);

        reports.push(ImageReport {
            image: path.clone(),
            stats: result.stats.clone(),
        });
    }

    if let Some(report) = &args.report {
        finder.export_json(&reports, report)?;
        info!("Report saved: {:?}", report);
    }

    info!("Processed {} images", reports.len());
    Ok(())
}

fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<FinderConfig> {
    let mut config = match path {
        Some(path) => FinderConfig::from_file(path)?,
        None => FinderConfig::default(),
    };

    if let Some(threshold) = overrides.threshold {
        config.classifier.threshold = threshold;
    }
    if let Some(open) = overrides.open {
        config.classifier.open_element = open;
    }
    if let Some(close) = overrides.close {
        config.classifier.close_element = close;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() -> anyhow::Result<()> {
        let overrides = Overrides {
            threshold: Some(90),
            open: Some(StructuringElement::square(3)),
            close: None,
        };
        let config = resolve_config(None, &overrides)?;
        assert_eq!(config.classifier.threshold, 90);
        assert_eq!(config.classifier.open_element, StructuringElement::square(3));
        assert_eq!(config.classifier.close_element, StructuringElement::square(12));
        Ok(())
    }
}
