//! The persisted color model

use super::Channel;
use crate::error::{Result, ScanError};
use crate::grid::Hsv;
use serde::{Deserialize, Serialize};

/// Object-normalized minus background-normalized counts for one channel.
/// Positive buckets are more characteristic of the object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferenceHistogram {
    channel: Channel,
    values: Vec<f64>,
}

impl DifferenceHistogram {
    /// Shape is checked when the histogram is placed in a `ColorModel`
    pub fn new(channel: Channel, values: Vec<f64>) -> Self {
        Self { channel, values }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value stored for a raw channel value. Only called on validated histograms.
    pub(crate) fn lookup(&self, value: u8) -> f64 {
        self.values[self.channel.bucket(value)]
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Bucket with the largest value (first one on ties)
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (bucket, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((bucket, value)),
            })
    }

    fn validate(&self, expected: Channel) -> Result<()> {
        if self.channel != expected {
            return Err(ScanError::InvalidModel(format!(
                "{} slot holds a {} histogram",
                expected, self.channel
            )));
        }
        if self.values.is_empty() {
            return Err(ScanError::InvalidModel(format!(
                "{} histogram is empty",
                expected
            )));
        }
        if self.values.len() != expected.bins() {
            return Err(ScanError::InvalidModel(format!(
                "{} histogram has {} buckets, expected {}",
                expected,
                self.values.len(),
                expected.bins()
            )));
        }
        if let Some(bucket) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(ScanError::InvalidModel(format!(
                "{} histogram bucket {} is not finite",
                expected, bucket
            )));
        }
        Ok(())
    }
}

/// Three difference histograms that fully parameterize classification.
/// Every instance has passed `validate`, including deserialized ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModelFields")]
pub struct ColorModel {
    hue: DifferenceHistogram,
    saturation: DifferenceHistogram,
    value: DifferenceHistogram,
}

#[derive(Deserialize)]
struct ModelFields {
    hue: DifferenceHistogram,
    saturation: DifferenceHistogram,
    value: DifferenceHistogram,
}

impl TryFrom<ModelFields> for ColorModel {
    type Error = ScanError;

    fn try_from(fields: ModelFields) -> Result<Self> {
        Self::new(fields.hue, fields.saturation, fields.value)
    }
}

impl ColorModel {
    /// Assemble and validate a model
    pub fn new(
        hue: DifferenceHistogram,
        saturation: DifferenceHistogram,
        value: DifferenceHistogram,
    ) -> Result<Self> {
        let model = Self {
            hue,
            saturation,
            value,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check bucket counts, channel slots and finiteness
    fn validate(&self) -> Result<()> {
        for channel in Channel::ALL {
            self.histogram(channel).validate(channel)?;
        }
        Ok(())
    }

    pub fn histogram(&self, channel: Channel) -> &DifferenceHistogram {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Value => &self.value,
        }
    }

    /// Raw relevance of a pixel: the sum of the three channel lookups
    pub fn score(&self, pixel: Hsv) -> f64 {
        self.hue.lookup(pixel.h) + self.saturation.lookup(pixel.s) + self.value.lookup(pixel.v)
    }

    /// Smallest and largest raw score any pixel could get
    pub fn score_bounds(&self) -> (f64, f64) {
        Channel::ALL.iter().fold((0.0, 0.0), |(lo, hi), &channel| {
            let hist = self.histogram(channel);
            (lo + hist.min(), hi + hist.max())
        })
    }

    /// Most object-characteristic bucket of a channel
    pub fn peak(&self, channel: Channel) -> Option<(usize, f64)> {
        self.histogram(channel).peak()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(channel: Channel, value: f64) -> DifferenceHistogram {
        DifferenceHistogram::new(channel, vec![value; channel.bins()])
    }

    #[test]
    fn test_new_validates_shape() {
        assert!(ColorModel::new(
            flat(Channel::Hue, 0.0),
            flat(Channel::Saturation, 0.0),
            flat(Channel::Value, 0.0),
        )
        .is_ok());

        let short = DifferenceHistogram::new(Channel::Hue, vec![0.0; 10]);
        assert!(matches!(
            ColorModel::new(short, flat(Channel::Saturation, 0.0), flat(Channel::Value, 0.0)),
            Err(ScanError::InvalidModel(_))
        ));

        let empty = DifferenceHistogram::new(Channel::Value, Vec::new());
        assert!(matches!(
            ColorModel::new(flat(Channel::Hue, 0.0), flat(Channel::Saturation, 0.0), empty),
            Err(ScanError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_swapped_slots_are_rejected() {
        let result = ColorModel::new(
            flat(Channel::Hue, 0.0),
            flat(Channel::Value, 0.0),
            flat(Channel::Saturation, 0.0),
        );
        assert!(matches!(result, Err(ScanError::InvalidModel(_))));
    }

    #[test]
    fn test_non_finite_bucket_is_rejected() {
        let mut hue = flat(Channel::Hue, 0.0);
        hue.values[3] = f64::NAN;
        let result = ColorModel::new(hue, flat(Channel::Saturation, 0.0), flat(Channel::Value, 0.0));
        assert!(matches!(result, Err(ScanError::InvalidModel(_))));
    }

    #[test]
    fn test_score_and_bounds() {
        let mut hue = flat(Channel::Hue, 0.0);
        hue.values[10] = 0.5;
        let mut value = flat(Channel::Value, 0.0);
        value.values[255] = -0.25;
        let model = ColorModel::new(hue, flat(Channel::Saturation, 0.1), value).unwrap();

        assert!((model.score(Hsv::new(10, 0, 255)) - 0.35).abs() < 1e-12);
        let (lo, hi) = model.score_bounds();
        assert!((lo - (-0.15)).abs() < 1e-12);
        assert!((hi - 0.6).abs() < 1e-12);
        assert_eq!(model.peak(Channel::Hue), Some((10, 0.5)));
    }

    #[test]
    fn test_deserialize_validates() {
        let short = r#"{
            "hue": {"channel": "Hue", "values": [0.0, 1.0]},
            "saturation": {"channel": "Saturation", "values": []},
            "value": {"channel": "Value", "values": []}
        }"#;
        let err = serde_json::from_str::<ColorModel>(short).unwrap_err();
        assert!(err.is_data());
        assert!(err.to_string().contains("buckets"));
    }
}
