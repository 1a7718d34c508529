//! Backprojection of a color model onto a query image

use super::config::{MapperConfig, RescaleMode};
use crate::utils::median_filter;
use buoyscan_core::{ColorModel, Grid, HsvImage, RelevanceMap, RELEVANCE_CEILING};
use tracing::debug;

/// Scores every pixel of an image against a `ColorModel`
#[derive(Debug, Clone, Default)]
pub struct RelevanceMapper {
    config: MapperConfig,
}

impl RelevanceMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Relevance map with the same dimensions as `image`
    pub fn score(&self, image: &HsvImage, model: &ColorModel) -> RelevanceMap {
        let raw = Self::raw_scores(image, model);
        let (low, high) = match self.config.rescale {
            RescaleMode::PerImage => min_max(raw.as_slice()),
            RescaleMode::ModelRange => model.score_bounds(),
        };
        debug!("Raw relevance range [{:.4}, {:.4}]", low, high);

        let map = rescale(&raw, low, high);
        median_filter(&map, self.config.median_radius)
    }

    /// Sum of the three channel lookups per pixel; may be negative
    fn raw_scores(image: &HsvImage, model: &ColorModel) -> Grid<f64> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let mut raw = Grid::filled(image.width(), image.height(), 0.0);
            raw.as_mut_slice()
                .par_iter_mut()
                .zip(image.as_slice().par_iter())
                .for_each(|(score, &pixel)| *score = model.score(pixel));
            raw
        }

        #[cfg(not(feature = "parallel"))]
        {
            image.map(|&pixel| model.score(pixel))
        }
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Linear map of `[low, high]` onto `0..=RELEVANCE_CEILING`. A degenerate range
/// sends every pixel to the ceiling.
fn rescale(raw: &Grid<f64>, low: f64, high: f64) -> RelevanceMap {
    let span = high - low;
    if !(span > f64::EPSILON) {
        return raw.map(|_| RELEVANCE_CEILING);
    }

    let ceiling = RELEVANCE_CEILING as f64;
    raw.map(|&v| (((v - low) / span) * ceiling).round().clamp(0.0, ceiling) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buoyscan_core::{Channel, DifferenceHistogram, Hsv};

    fn model_with(hot_hue: usize, value: Vec<f64>) -> ColorModel {
        let mut hue = vec![0.0; Channel::Hue.bins()];
        hue[hot_hue] = 1.0;
        ColorModel::new(
            DifferenceHistogram::new(Channel::Hue, hue),
            DifferenceHistogram::new(Channel::Saturation, vec![0.0; 256]),
            DifferenceHistogram::new(Channel::Value, value),
        )
        .unwrap()
    }

    fn hue_model(hot_bucket: usize) -> ColorModel {
        model_with(hot_bucket, vec![0.0; 256])
    }

    fn unfiltered(rescale: RescaleMode) -> RelevanceMapper {
        RelevanceMapper::new(MapperConfig {
            rescale,
            median_radius: 0,
        })
    }

    #[test]
    fn test_per_image_rescale_spans_full_range() {
        let image = Grid::from_fn(4, 1, |x, _| Hsv::new(if x == 0 { 30 } else { 90 }, 0, 0));
        let map = unfiltered(RescaleMode::PerImage).score(&image, &hue_model(30));
        assert_eq!(map.as_slice(), &[255, 0, 0, 0]);
    }

    #[test]
    fn test_uniform_image_maps_to_ceiling() {
        let image = Grid::filled(5, 5, Hsv::new(90, 10, 10));
        let map = RelevanceMapper::default().score(&image, &hue_model(30));
        assert!(map.iter().all(|&v| v == RELEVANCE_CEILING));
    }

    #[test]
    fn test_model_range_is_fixed() {
        let mapper = unfiltered(RescaleMode::ModelRange);
        let model = hue_model(30);
        let lone = mapper.score(&Grid::filled(2, 2, Hsv::new(90, 0, 0)), &model);
        assert!(lone.iter().all(|&v| v == 0));

        let mixed = Grid::from_fn(2, 1, |x, _| Hsv::new(if x == 0 { 30 } else { 90 }, 0, 0));
        assert_eq!(mapper.score(&mixed, &model).as_slice(), &[255, 0]);
    }

    #[test]
    fn test_negative_scores_are_allowed() {
        let mut value = vec![0.0; 256];
        value[200] = -0.5;
        let model = model_with(30, value);
        let raw = RelevanceMapper::raw_scores(&Grid::filled(1, 1, Hsv::new(0, 0, 200)), &model);
        assert_eq!(raw.as_slice(), &[-0.5]);
    }

    #[test]
    fn test_dimensions_preserved() {
        let image = Grid::from_fn(13, 7, |x, y| Hsv::new((x * 13) as u8, (y * 30) as u8, 200));
        let map = RelevanceMapper::default().score(&image, &hue_model(26));
        assert_eq!(map.dimensions(), (13, 7));
    }
}
