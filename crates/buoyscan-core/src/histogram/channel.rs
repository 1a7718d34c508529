use serde::{Deserialize, Serialize};
use std::fmt;

/// One coordinate of an HSV pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Hue,
    Saturation,
    Value,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Value];

    /// Number of histogram buckets: one per quantized channel value
    pub const fn bins(self) -> usize {
        match self {
            Channel::Hue => 180,
            Channel::Saturation | Channel::Value => 256,
        }
    }

    /// Bucket holding a raw channel value
    pub fn bucket(self, value: u8) -> usize {
        (value as usize).min(self.bins() - 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Hue => "hue",
            Channel::Saturation => "saturation",
            Channel::Value => "value",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
