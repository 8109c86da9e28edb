use crate::error::PipelineError;
use palette_pack::{ColorDepth, ImageMetadata};
use std::io::Cursor;

/// Encode the packed image as an indexed PNG.
///
/// The PLTE chunk carries the full output palette (including zero padding)
/// and pixel data uses the same bit depth as the packed image, so the
/// preview decodes to exactly what the generated source describes.
pub fn encode_preview(metadata: &ImageMetadata) -> Result<Vec<u8>, PipelineError> {
    let width = metadata.width();
    let height = metadata.height();
    let depth = metadata.depth();

    let plte: Vec<u8> = metadata
        .palette()
        .entries()
        .iter()
        .flat_map(|&c| [(c >> 16) as u8, (c >> 8) as u8, c as u8])
        .collect();

    let indices = metadata.indices();
    let data = match depth {
        ColorDepth::Eight => indices,
        _ => pack_rows(&indices, width, depth.bits()),
    };

    let bit_depth = match depth {
        ColorDepth::One => png::BitDepth::One,
        ColorDepth::Four => png::BitDepth::Four,
        ColorDepth::Eight => png::BitDepth::Eight,
    };

    let width = u32::try_from(width).map_err(|e| PipelineError::PngEncode(e.to_string()))?;
    let height = u32::try_from(height).map_err(|e| PipelineError::PngEncode(e.to_string()))?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_palette(plte);
        let mut writer = encoder
            .write_header()
            .map_err(|e| PipelineError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| PipelineError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack indices into PNG scanlines: MSB first, each row starting on a byte
/// boundary.
fn pack_rows(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width.max(1)));

    for row in indices.chunks(width) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
