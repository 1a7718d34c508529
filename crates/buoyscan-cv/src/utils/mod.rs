//! Utility modules

pub mod filter;
pub mod image;

pub use self::filter::median_filter;
pub use self::image::ImageUtils;
