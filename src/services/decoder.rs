//! Raster decoding into RGBA pixel buffers.

use palette_pack::PixelBuffer;
use std::path::Path;

use crate::error::PipelineError;

/// Decode an encoded image (PNG, JPEG, BMP or the first GIF frame).
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, PipelineError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, bytes = bytes.len(), "Decoded image");
    Ok(PixelBuffer::new(
        width as usize,
        height as usize,
        rgba.into_raw(),
    )?)
}

/// Read and decode an image file.
pub fn decode_file(path: &Path) -> Result<PixelBuffer, PipelineError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}
