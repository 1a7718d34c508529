//! Histogram model builder
//!
//! Each training pair is reduced to six raw histograms (three channels, object
//! and background). The per-pair results are merged with bucket-wise addition,
//! then each of the six totals is normalized and the background is subtracted
//! from the object per channel.

use super::TrainingPair;
use buoyscan_core::{
    Channel, ChannelHistogram, ColorModel, DifferenceHistogram, Hsv, Result, ScanError,
};
use tracing::{debug, info, warn};

/// Raw hue, saturation and value histograms for one pixel class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHistograms {
    pub hue: ChannelHistogram,
    pub saturation: ChannelHistogram,
    pub value: ChannelHistogram,
}

impl ClassHistograms {
    pub fn new() -> Self {
        Self {
            hue: ChannelHistogram::new(Channel::Hue),
            saturation: ChannelHistogram::new(Channel::Saturation),
            value: ChannelHistogram::new(Channel::Value),
        }
    }

    pub fn add(&mut self, pixel: Hsv) {
        self.hue.add(pixel);
        self.saturation.add(pixel);
        self.value.add(pixel);
    }

    pub fn merge(self, other: &ClassHistograms) -> Self {
        Self {
            hue: self.hue.merge(&other.hue),
            saturation: self.saturation.merge(&other.saturation),
            value: self.value.merge(&other.value),
        }
    }

    /// Number of pixels counted (identical for all three channels)
    pub fn pixels(&self) -> u64 {
        self.hue.total()
    }

    fn channel(&self, channel: Channel) -> &ChannelHistogram {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Value => &self.value,
        }
    }
}

impl Default for ClassHistograms {
    fn default() -> Self {
        Self::new()
    }
}

/// Object and background histograms accumulated over one or more pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairHistograms {
    pub object: ClassHistograms,
    pub background: ClassHistograms,
}

impl PairHistograms {
    /// Histograms of a single pair. Fails before counting anything if the
    /// mask does not match the image.
    pub fn from_pair(pair: &TrainingPair) -> Result<Self> {
        pair.image.ensure_same_size(&pair.mask)?;

        let mut histograms = Self::default();
        for (&pixel, &is_object) in pair.image.iter().zip(pair.mask.iter()) {
            if is_object {
                histograms.object.add(pixel);
            } else {
                histograms.background.add(pixel);
            }
        }

        debug!(
            "Pair '{}': {} object px, {} background px",
            pair.name,
            histograms.object.pixels(),
            histograms.background.pixels()
        );
        Ok(histograms)
    }

    /// Bucket-wise sum; associative and commutative
    pub fn merge(self, other: PairHistograms) -> Self {
        Self {
            object: self.object.merge(&other.object),
            background: self.background.merge(&other.background),
        }
    }

    /// Normalize all six histograms and take the per-channel differences
    pub fn into_model(self) -> Result<ColorModel> {
        if self.object.pixels() == 0 {
            warn!("Training set has no object pixels; the model only penalizes background colors");
        }
        if self.background.pixels() == 0 {
            warn!("Training set has no background pixels; the model only rewards object colors");
        }

        let difference = |channel: Channel| -> Result<DifferenceHistogram> {
            let object = self.object.channel(channel).normalized();
            let background = self.background.channel(channel).normalized();
            object.difference(&background)
        };

        ColorModel::new(
            difference(Channel::Hue)?,
            difference(Channel::Saturation)?,
            difference(Channel::Value)?,
        )
    }
}

/// Builds a `ColorModel` from annotated training pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct HistogramModelBuilder;

impl HistogramModelBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the model. Any mismatched pair fails the whole build.
    pub fn build(&self, pairs: &[TrainingPair]) -> Result<ColorModel> {
        if pairs.is_empty() {
            return Err(ScanError::NoTrainingData);
        }

        let totals = self.accumulate(pairs)?;
        info!(
            "Accumulated {} pairs: {} object px, {} background px",
            pairs.len(),
            totals.object.pixels(),
            totals.background.pixels()
        );

        totals.into_model()
    }

    /// Raw histograms summed over every pair
    pub fn accumulate(&self, pairs: &[TrainingPair]) -> Result<PairHistograms> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            pairs
                .par_iter()
                .map(PairHistograms::from_pair)
                .try_reduce(PairHistograms::default, |a, b| Ok(a.merge(b)))
        }

        #[cfg(not(feature = "parallel"))]
        {
            pairs
                .iter()
                .map(PairHistograms::from_pair)
                .try_fold(PairHistograms::default(), |acc, pair| Ok(acc.merge(pair?)))
        }
    }
}
