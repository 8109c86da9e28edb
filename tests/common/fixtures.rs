//! Test fixtures: small encoded images.

use std::io::Cursor;

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
pub const WHITE: [u8; 3] = [255, 255, 255];
pub const BLACK: [u8; 3] = [0, 0, 0];

/// Encode `pixels` (row-major) as a PNG
pub fn png_bytes(width: u32, height: u32, pixels: &[[u8; 3]]) -> Vec<u8> {
    assert_eq!(pixels.len(), (width * height) as usize);
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb(pixels[(y * width + x) as usize])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}

/// The 2x2 [red, red, blue, green] image
pub fn rrbg_png() -> Vec<u8> {
    png_bytes(2, 2, &[RED, RED, BLUE, GREEN])
}

/// Horizontal gradient with many distinct colors
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let pixels: Vec<[u8; 3]> = (0..height)
        .flat_map(|_| (0..width).map(move |x| {
            let v = (x * 255 / (width - 1).max(1)) as u8;
            [v, 255 - v, v / 2]
        }))
        .collect();
    png_bytes(width, height, &pixels)
}
