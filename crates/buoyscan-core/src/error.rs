use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

// Errors raised by the histogram engine

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No training data: at least one (image, mask) pair is required")]
    NoTrainingData,
    #[error(
        "Dimension mismatch: expected {}x{}, found {}x{}",
        .expected.0, .expected.1, .found.0, .found.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("Invalid color model: {0}")]
    InvalidModel(String),
    #[error("Failed to decode {}: {reason}", .path.display())]
    DecodeFailure { path: PathBuf, reason: String },
    #[error("Model codec error: {0}")]
    Codec(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScanError {
    pub fn dimension_mismatch(expected: (u32, u32), found: (u32, u32)) -> Self {
        ScanError::DimensionMismatch { expected, found }
    }
}
