//! 8-bit HSV pixels
//!
//! Hue is stored as degrees / 2 so it fits a byte (`0..=179`); saturation and
//! value use the full `0..=255` range.

use crate::histogram::Channel;
use palette::{FromColor, Srgb};
use serde::{Deserialize, Serialize};

/// Largest stored hue value
pub const HUE_MAX: u8 = 179;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    /// Convert an 8-bit RGB triple. Grays get hue 0.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let rgb = Srgb::new(r, g, b).into_format::<f32>();
        let hsv: palette::Hsv = palette::Hsv::from_color(rgb);

        let s = to_byte(hsv.saturation);
        let h = if s == 0 {
            0
        } else {
            let half = (hsv.hue.into_positive_degrees() / 2.0).round() as u16;
            // 359.x degrees rounds up to a full turn
            if half > u16::from(HUE_MAX) { 0 } else { half as u8 }
        };

        Self { h, s, v: r.max(g).max(b) }
    }

    /// Value of a single channel
    pub fn channel(self, channel: Channel) -> u8 {
        match channel {
            Channel::Hue => self.h,
            Channel::Saturation => self.s,
            Channel::Value => self.v,
        }
    }
}

fn to_byte(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}
