//! Per-channel histograms
//!
//! Raw histograms hold integer counts so that merging accumulations from
//! several training pairs is exactly associative and commutative. Normalized
//! and difference histograms hold `f64` values.

pub mod channel;
pub mod model;

pub use channel::Channel;
pub use model::{ColorModel, DifferenceHistogram};

use crate::error::{Result, ScanError};
use crate::grid::Hsv;

/// Bucketed pixel counts for one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistogram {
    channel: Channel,
    counts: Vec<u64>,
}

impl ChannelHistogram {
    /// Empty histogram with `channel.bins()` buckets
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            counts: vec![0; channel.bins()],
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Count one pixel
    pub fn add(&mut self, pixel: Hsv) {
        let bucket = self.channel.bucket(pixel.channel(self.channel));
        self.counts[bucket] += 1;
    }

    /// Bucket-wise sum with another histogram of the same channel
    pub fn merge(mut self, other: &ChannelHistogram) -> Self {
        debug_assert_eq!(self.channel, other.channel);
        for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
            *count += extra;
        }
        self
    }

    /// Total number of counted pixels
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Scale to unit L2 norm. A histogram with no counts stays all zeros.
    pub fn normalized(&self) -> NormalizedHistogram {
        let norm = self
            .counts
            .iter()
            .map(|&c| (c as f64) * (c as f64))
            .sum::<f64>()
            .sqrt();

        let values = if norm > 0.0 {
            self.counts.iter().map(|&c| c as f64 / norm).collect()
        } else {
            vec![0.0; self.counts.len()]
        };

        NormalizedHistogram {
            channel: self.channel,
            values,
        }
    }
}

/// A channel histogram rescaled so object and background variants are comparable
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistogram {
    channel: Channel,
    values: Vec<f64>,
}

impl NormalizedHistogram {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `self - background`, bucket by bucket
    pub fn difference(&self, background: &NormalizedHistogram) -> Result<DifferenceHistogram> {
        if self.channel != background.channel || self.values.len() != background.values.len() {
            return Err(ScanError::InvalidModel(format!(
                "cannot subtract a {} histogram from a {} histogram",
                background.channel, self.channel
            )));
        }

        let values = self
            .values
            .iter()
            .zip(&background.values)
            .map(|(object, other)| object - other)
            .collect();

        Ok(DifferenceHistogram::new(self.channel, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram_of(channel: Channel, pixels: &[Hsv]) -> ChannelHistogram {
        let mut hist = ChannelHistogram::new(channel);
        for &pixel in pixels {
            hist.add(pixel);
        }
        hist
    }

    #[test]
    fn test_bucket_counts() {
        let hist = histogram_of(
            Channel::Hue,
            &[Hsv::new(0, 0, 0), Hsv::new(0, 9, 9), Hsv::new(120, 0, 0)],
        );
        assert_eq!(hist.counts().len(), 180);
        assert_eq!(hist.counts()[0], 2);
        assert_eq!(hist.counts()[120], 1);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = histogram_of(Channel::Value, &[Hsv::new(0, 0, 3), Hsv::new(0, 0, 200)]);
        let b = histogram_of(Channel::Value, &[Hsv::new(0, 0, 3)]);
        assert_eq!(a.clone().merge(&b), b.clone().merge(&a));
        assert_eq!(a.merge(&b).counts()[3], 2);
    }

    #[test]
    fn test_normalized_has_unit_norm() {
        let hist = histogram_of(
            Channel::Saturation,
            &[Hsv::new(0, 1, 0), Hsv::new(0, 1, 0), Hsv::new(0, 2, 0)],
        );
        let norm: f64 = hist.normalized().values().iter().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_histogram_normalizes_to_zero() {
        let hist = ChannelHistogram::new(Channel::Hue);
        assert!(hist.normalized().values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_difference_rejects_mixed_channels() {
        let hue = ChannelHistogram::new(Channel::Hue).normalized();
        let sat = ChannelHistogram::new(Channel::Saturation).normalized();
        assert!(hue.difference(&sat).is_err());
    }
}
