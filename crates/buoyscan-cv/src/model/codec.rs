//! Model persistence
//!
//! The classification code never sees bytes; codecs implement `ModelCodec`
//! and the helpers here move the bytes to and from files.

use crate::traits::ModelCodec;
use crate::Result;
use anyhow::Context;
use buoyscan_core::{ColorModel, ScanError};
use std::fs;
use std::path::Path;
use tracing::info;

/// File name used when no model path is given
pub const DEFAULT_MODEL_FILE: &str = "buoy_histogram.json";

/// JSON encoding; `f64` bucket values round-trip exactly
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl JsonCodec {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ModelCodec for JsonCodec {
    fn encode(&self, model: &ColorModel) -> buoyscan_core::Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(model)
        } else {
            serde_json::to_vec(model)
        };
        encoded.map_err(|e| ScanError::Codec(e.to_string()))
    }

    /// Malformed JSON is a `Codec` error; well-formed JSON of the wrong shape is
    /// an `InvalidModel`
    fn decode(&self, bytes: &[u8]) -> buoyscan_core::Result<ColorModel> {
        serde_json::from_slice(bytes).map_err(|e| {
            if e.is_data() {
                ScanError::InvalidModel(e.to_string())
            } else {
                ScanError::Codec(e.to_string())
            }
        })
    }
}

/// Encode `model` and write it to `path`
pub fn save_model<P: AsRef<Path>>(model: &ColorModel, path: P, codec: &dyn ModelCodec) -> Result<()> {
    let path = path.as_ref();
    let bytes = codec.encode(model)?;
    fs::write(path, bytes).with_context(|| format!("Failed to write model to: {:?}", path))?;
    info!("Color model saved: {:?}", path);
    Ok(())
}

/// Read and decode a model from `path`
pub fn load_model<P: AsRef<Path>>(path: P, codec: &dyn ModelCodec) -> Result<ColorModel> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read model: {:?}", path))?;
    codec
        .decode(&bytes)
        .with_context(|| format!("Failed to decode model: {:?}", path))
}
