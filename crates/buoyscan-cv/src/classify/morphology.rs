//! Binary morphology with rectangular structuring elements
//!
//! Masks are run through `imageproc`'s grayscale morphology as 0/255 images.
//! Pixels outside the image are ignored: erosion never eats into the mask from
//! the image border and dilation never grows a region from outside it.
//! Dilation uses the reflected element, so `open` and `close` are idempotent.

use crate::utils::ImageUtils;
use buoyscan_core::{Mask, ScanError};
use image::{GrayImage, Luma};
use imageproc::morphology::{self as imgmorph, Mask as Footprint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest supported side length
pub const MAX_ELEMENT_SIDE: u32 = 511;

/// Rectangular structuring element anchored at `(width / 2, height / 2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuringElement {
    pub width: u32,
    pub height: u32,
}

impl StructuringElement {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn anchor(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// Reject zero-sized elements and sides above `MAX_ELEMENT_SIDE`
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.is_empty() {
            return Err(ScanError::InvalidConfig(format!(
                "structuring element must be at least 1x1, got {}",
                self
            )));
        }
        if self.width > MAX_ELEMENT_SIDE || self.height > MAX_ELEMENT_SIDE {
            return Err(ScanError::InvalidConfig(format!(
                "structuring element {} exceeds {}x{}",
                self, MAX_ELEMENT_SIDE, MAX_ELEMENT_SIDE
            )));
        }
        Ok(())
    }

    /// Element as an `imageproc` footprint around its anchor
    fn footprint(&self) -> Footprint {
        let (ax, ay) = self.anchor();
        Self::rectangle(self.width, self.height, ax, ay)
    }

    /// Point reflection of `footprint` through the anchor
    fn reflected_footprint(&self) -> Footprint {
        let (ax, ay) = self.anchor();
        Self::rectangle(self.width, self.height, self.width - 1 - ax, self.height - 1 - ay)
    }

    fn rectangle(width: u32, height: u32, center_x: u32, center_y: u32) -> Footprint {
        let block = GrayImage::from_pixel(width, height, Luma([u8::MAX]));
        Footprint::from_image(&block, center_x as u8, center_y as u8)
    }
}

impl fmt::Display for StructuringElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for StructuringElement {
    type Err = ScanError;

    /// Parses `"12x12"` or a single side length such as `"12"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                ScanError::InvalidConfig(format!("invalid structuring element: '{}'", s))
            })
        };

        let element = match s.split_once(['x', 'X']) {
            Some((w, h)) => Self::new(parse(w)?, parse(h)?),
            None => Self::square(parse(s)?),
        };

        element.validate()?;
        Ok(element)
    }
}

/// A pixel stays set only if every in-image pixel under the element is set.
/// An empty element leaves the mask unchanged.
pub(crate) fn erode(mask: &Mask, element: StructuringElement) -> Mask {
    if element.is_empty() || mask.is_empty() {
        return mask.clone();
    }
    let luma = ImageUtils::mask_to_luma(mask);
    ImageUtils::luma_to_mask(&imgmorph::grayscale_erode(&luma, &element.footprint()), 0)
}

/// A pixel becomes set if any in-image pixel under the reflected element is set
pub(crate) fn dilate(mask: &Mask, element: StructuringElement) -> Mask {
    if element.is_empty() || mask.is_empty() {
        return mask.clone();
    }
    let luma = ImageUtils::mask_to_luma(mask);
    ImageUtils::luma_to_mask(
        &imgmorph::grayscale_dilate(&luma, &element.reflected_footprint()),
        0,
    )
}

/// Erosion then dilation: removes specks smaller than the element
pub(crate) fn open(mask: &Mask, element: StructuringElement) -> Mask {
    dilate(&erode(mask, element), element)
}

/// Dilation then erosion: fills holes smaller than the element
pub(crate) fn close(mask: &Mask, element: StructuringElement) -> Mask {
    erode(&dilate(mask, element), element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buoyscan_core::Grid;

    fn block(size: u32, x0: u32, y0: u32, w: u32, h: u32) -> Mask {
        Grid::from_fn(size, size, |x, y| {
            (x0..x0 + w).contains(&x) && (y0..y0 + h).contains(&y)
        })
    }

    #[test]
    fn test_parse_element() {
        assert_eq!("12x12".parse::<StructuringElement>().unwrap(), StructuringElement::square(12));
        assert_eq!("3X5".parse::<StructuringElement>().unwrap(), StructuringElement::new(3, 5));
        assert_eq!("2".parse::<StructuringElement>().unwrap(), StructuringElement::square(2));
        assert!("0x4".parse::<StructuringElement>().is_err());
        assert!("wide".parse::<StructuringElement>().is_err());
        assert!("600x2".parse::<StructuringElement>().is_err());
    }

    #[test]
    fn test_erode_dilate_single_pixel() {
        let mask = block(7, 3, 3, 1, 1);
        let element = StructuringElement::square(3);
        assert_eq!(erode(&mask, element).count_set(), 0);
        assert_eq!(dilate(&mask, element), block(7, 2, 2, 3, 3));
    }

    #[test]
    fn test_even_element_is_adjoint() {
        // dilating an eroded mask never adds pixels, eroding a dilated one never removes any
        let mask = Grid::from_fn(9, 9, |x, y| (x + 2 * y) % 3 == 0 || (2..6).contains(&x));
        for element in [StructuringElement::square(2), StructuringElement::new(4, 3)] {
            let opened = open(&mask, element);
            let closed = close(&mask, element);
            for ((&orig, &o), &c) in mask.iter().zip(opened.iter()).zip(closed.iter()) {
                assert!(!o || orig);
                assert!(!orig || c);
            }
        }
    }

    #[test]
    fn test_opening_removes_speck_keeps_block() {
        let mut mask = block(10, 3, 3, 2, 2);
        if let Some(px) = mask.get_mut(8, 1) {
            *px = true;
        }
        let opened = open(&mask, StructuringElement::square(2));
        assert_eq!(opened, block(10, 3, 3, 2, 2));
    }

    #[test]
    fn test_closing_fills_hole() {
        let mut mask = Grid::filled(20, 20, true);
        if let Some(px) = mask.get_mut(10, 10) {
            *px = false;
        }
        let closed = close(&mask, StructuringElement::square(12));
        assert_eq!(closed.count_set(), 400);
    }

    #[test]
    fn test_border_is_not_eroded() {
        let mask = Grid::filled(5, 5, true);
        assert_eq!(erode(&mask, StructuringElement::square(3)), mask);
        assert_eq!(open(&mask, StructuringElement::square(12)), mask);
    }

    #[test]
    fn test_open_close_idempotent() {
        let mask = Grid::from_fn(16, 16, |x, y| (x * 7 + y * 3) % 5 < 2 || (4..11).contains(&x));
        for element in [StructuringElement::square(2), StructuringElement::new(3, 4)] {
            let opened = open(&mask, element);
            assert_eq!(open(&opened, element), opened);
            let closed = close(&mask, element);
            assert_eq!(close(&closed, element), closed);
        }
    }
}
