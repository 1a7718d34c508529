//! Dataset loading
//!
//! Layout of a dataset directory:
//!
//! ```text
//! <base>/BUOY_PRESENT/<name>                 training / query images
//! <base>/BUOY_MASK_IMAGES/mask.<name>        operator-drawn masks
//! ```

use crate::model::TrainingPair;
use crate::traits::TrainingSource;
use crate::utils::image::{ImageUtils, DEFAULT_MASK_THRESHOLD};
use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory holding images that contain a buoy
pub const IMAGE_DIR: &str = "BUOY_PRESENT";
/// Directory holding the masks for `IMAGE_DIR`
pub const MASK_DIR: &str = "BUOY_MASK_IMAGES";
/// Mask file name is this prefix followed by the image file name
pub const MASK_PREFIX: &str = "mask.";

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset directory {0:?} doesn't exist")]
    MissingBase(PathBuf),
    #[error("Image directory {0:?} doesn't exist; sort captured images into it first")]
    MissingImages(PathBuf),
    #[error("Mask directory {0:?} doesn't exist; annotate the images first")]
    MissingMasks(PathBuf),
}

/// Reads images and masks from a dataset directory
pub struct DatasetLoader {
    base_path: PathBuf,
    supported_extensions: Vec<String>,
    mask_threshold: u8,
}

impl DatasetLoader {
    /// Create new dataset loader
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            supported_extensions: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "bmp".to_string(),
            ],
            mask_threshold: DEFAULT_MASK_THRESHOLD,
        }
    }

    /// Luma level above which mask pixels count as object
    pub fn with_mask_threshold(mut self, threshold: u8) -> Self {
        self.mask_threshold = threshold;
        self
    }

    pub fn image_dir(&self) -> PathBuf {
        self.base_path.join(IMAGE_DIR)
    }

    pub fn mask_dir(&self) -> PathBuf {
        self.base_path.join(MASK_DIR)
    }

    pub fn mask_path(&self, image_name: &str) -> PathBuf {
        self.mask_dir().join(format!("{}{}", MASK_PREFIX, image_name))
    }

    /// Ensure the base and image directories exist, and the mask directory
    /// too when `require_masks` is set
    pub fn check_directories(&self, require_masks: bool) -> std::result::Result<(), DatasetError> {
        if !self.base_path.is_dir() {
            return Err(DatasetError::MissingBase(self.base_path.clone()));
        }
        if !self.image_dir().is_dir() {
            return Err(DatasetError::MissingImages(self.image_dir()));
        }
        if require_masks && !self.mask_dir().is_dir() {
            return Err(DatasetError::MissingMasks(self.mask_dir()));
        }
        Ok(())
    }

    /// Sorted file names of the supported images in the image directory
    pub fn image_names(&self) -> Result<Vec<String>> {
        let dir = self.image_dir();
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory: {:?}", dir))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && self.is_supported(&path) {
                if let Some(name) = path.file_name() {
                    names.push(name.to_string_lossy().into_owned());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Full paths of the images in the image directory
    pub fn image_paths(&self) -> Result<Vec<PathBuf>> {
        let dir = self.image_dir();
        Ok(self
            .image_names()?
            .into_iter()
            .map(|name| dir.join(name))
            .collect())
    }

    /// Decode one image together with its mask
    pub fn load_pair(&self, image_name: &str) -> Result<TrainingPair> {
        let image = ImageUtils::load_hsv(self.image_dir().join(image_name))?;
        let mask = ImageUtils::load_mask(self.mask_path(image_name), self.mask_threshold)?;
        debug!("Loaded pair '{}' ({}x{})", image_name, image.width(), image.height());
        Ok(TrainingPair::new(image_name, image, mask))
    }

    /// Every image that has a mask; images without one are skipped
    pub fn load_pairs(&self) -> Result<Vec<TrainingPair>> {
        self.check_directories(true)?;

        let mut pairs = Vec::new();
        for name in self.image_names()? {
            if !self.mask_path(&name).is_file() {
                warn!("No mask for '{}', skipping", name);
                continue;
            }
            pairs.push(self.load_pair(&name)?);
        }

        info!("Loaded {} training pairs from {:?}", pairs.len(), self.base_path);
        Ok(pairs)
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.supported_extensions.contains(&ext))
    }
}

impl TrainingSource for DatasetLoader {
    fn training_pairs(&self) -> Result<Vec<TrainingPair>> {
        self.load_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn temp_dataset(tag: &str) -> PathBuf {
        let base = std::env::temp_dir().join(format!("buoyscan-dataset-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(base.join(IMAGE_DIR)).unwrap();
        fs::create_dir_all(base.join(MASK_DIR)).unwrap();
        base
    }

    #[test]
    fn test_missing_directories() {
        let loader = DatasetLoader::new("/nonexistent/buoyscan");
        assert!(matches!(
            loader.check_directories(true),
            Err(DatasetError::MissingBase(_))
        ));
    }

    #[test]
    fn test_load_pairs_skips_unmasked_images() -> Result<()> {
        let base = temp_dataset("pairs");
        let loader = DatasetLoader::new(&base);

        RgbImage::from_pixel(6, 4, Rgb([255, 120, 0])).save(base.join(IMAGE_DIR).join("b.png"))?;
        RgbImage::from_pixel(6, 4, Rgb([0, 0, 255])).save(base.join(IMAGE_DIR).join("a.png"))?;
        fs::write(base.join(IMAGE_DIR).join("notes.txt"), "not an image")?;
        GrayImage::from_fn(6, 4, |x, _| Luma([if x < 3 { 255 } else { 0 }]))
            .save(loader.mask_path("b.png"))?;

        assert_eq!(loader.image_names()?, vec!["a.png", "b.png"]);

        let pairs = loader.training_pairs()?;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].name, "b.png");
        assert_eq!(pairs[0].mask.count_set(), 12);

        fs::remove_dir_all(&base)?;
        Ok(())
    }

    #[test]
    fn test_mask_naming() {
        let loader = DatasetLoader::new("/data");
        assert_eq!(
            loader.mask_path("2019-11-14_10-40_43.png"),
            PathBuf::from("/data/BUOY_MASK_IMAGES/mask.2019-11-14_10-40_43.png")
        );
    }
}
