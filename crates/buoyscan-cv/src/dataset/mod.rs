//! Training and query image supply

pub mod loader;

pub use loader::{DatasetError, DatasetLoader, IMAGE_DIR, MASK_DIR, MASK_PREFIX};
