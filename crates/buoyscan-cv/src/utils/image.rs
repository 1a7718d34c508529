//! Conversions between `image` buffers and the engine's grids

use crate::Result;
use anyhow::Context;
use buoyscan_core::{Grid, Hsv, HsvImage, Mask, RelevanceMap, ScanError};
use image::{GrayImage, Luma, RgbImage};
use std::path::Path;

/// Luma level above which a mask pixel counts as object
pub const DEFAULT_MASK_THRESHOLD: u8 = 127;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Decode a color image and convert it to HSV
    pub fn load_hsv<P: AsRef<Path>>(path: P) -> Result<HsvImage> {
        let rgb = Self::decode(path.as_ref())?.to_rgb8();
        Ok(Self::rgb_to_hsv(&rgb))
    }

    /// Decode a mask image; pixels brighter than `threshold` are object
    pub fn load_mask<P: AsRef<Path>>(path: P, threshold: u8) -> Result<Mask> {
        let luma = Self::decode(path.as_ref())?.to_luma8();
        Ok(Self::luma_to_mask(&luma, threshold))
    }

    /// Convert an RGB buffer to an HSV grid
    pub fn rgb_to_hsv(rgb_image: &RgbImage) -> HsvImage {
        let (width, height) = rgb_image.dimensions();
        Grid::from_fn(width, height, |x, y| {
            let [r, g, b] = rgb_image.get_pixel(x, y).0;
            Hsv::from_rgb(r, g, b)
        })
    }

    /// Binarize a grayscale buffer
    pub fn luma_to_mask(luma: &GrayImage, threshold: u8) -> Mask {
        let (width, height) = luma.dimensions();
        Grid::from_fn(width, height, |x, y| luma.get_pixel(x, y).0[0] > threshold)
    }

    /// Relevance map as an 8-bit grayscale buffer
    pub fn relevance_to_luma(map: &RelevanceMap) -> GrayImage {
        GrayImage::from_fn(map.width(), map.height(), |x, y| Luma([map[(x, y)]]))
    }

    /// Grayscale buffer back to a relevance map
    pub fn luma_to_relevance(luma: &GrayImage) -> RelevanceMap {
        let (width, height) = luma.dimensions();
        Grid::from_fn(width, height, |x, y| luma.get_pixel(x, y).0[0])
    }

    /// Mask as a black/white grayscale buffer
    pub fn mask_to_luma(mask: &Mask) -> GrayImage {
        Self::relevance_to_luma(&mask.to_relevance())
    }

    /// Save a grayscale buffer; the format follows the file extension
    pub fn save_luma<P: AsRef<Path>>(luma: &GrayImage, path: P) -> Result<()> {
        luma.save(path.as_ref())
            .with_context(|| format!("Failed to save image: {:?}", path.as_ref()))
    }

    fn decode(path: &Path) -> Result<image::DynamicImage> {
        image::open(path)
            .map_err(|e| ScanError::DecodeFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
            .with_context(|| format!("Failed to open image: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_keeps_dimensions() {
        let rgb_img = RgbImage::from_pixel(7, 3, image::Rgb([255, 0, 0]));
        let hsv = ImageUtils::rgb_to_hsv(&rgb_img);

        assert_eq!(hsv.dimensions(), (7, 3));
        assert!(hsv.iter().all(|&px| px == Hsv::new(0, 255, 255)));
    }

    #[test]
    fn test_luma_to_mask_threshold() {
        let luma = GrayImage::from_raw(3, 1, vec![0, 127, 255]).unwrap();
        let mask = ImageUtils::luma_to_mask(&luma, DEFAULT_MASK_THRESHOLD);
        assert_eq!(mask.as_slice(), &[false, false, true]);
    }

    #[test]
    fn test_mask_to_luma() {
        let mask = Grid::from_fn(2, 2, |x, y| x == y);
        let luma = ImageUtils::mask_to_luma(&mask);
        assert_eq!(luma.as_raw(), &vec![255, 0, 0, 255]);
        assert_eq!(ImageUtils::luma_to_mask(&luma, 0), mask);
    }

    #[test]
    fn test_relevance_luma_keeps_layout() {
        let map = Grid::from_fn(3, 2, |x, y| (x * 10 + y * 100) as u8);
        let luma = ImageUtils::relevance_to_luma(&map);
        assert_eq!(luma.get_pixel(2, 1).0[0], 120);
        assert_eq!(ImageUtils::luma_to_relevance(&luma), map);
    }

    #[test]
    fn test_decode_failure_is_typed() {
        let path = std::env::temp_dir().join("buoyscan-missing-image.png");
        let err = ImageUtils::load_hsv(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::DecodeFailure { .. })
        ));
    }
}
