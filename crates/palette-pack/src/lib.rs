#![allow(clippy::module_inception)]

//! palette-pack: fixed-palette image reforming for embedded displays
//!
//! This library turns an arbitrary RGBA image into the representation small
//! display drivers expect: a palette of `2^depth` 24-bit colors and pixel
//! indices packed at 1, 4 or 8 bits per pixel, plus a C source rendering of
//! both.
//!
//! # Quick Start
//!
//! The [`Reformer`] builder is the primary entry point:
//!
//! ```
//! use palette_pack::{BracketStyle, ColorDepth, PixelBuffer, Reformer, Rgb};
//!
//! let image = PixelBuffer::filled(8, 8, Rgb::new(200, 30, 30));
//! let reformed = Reformer::new(ColorDepth::One, 8, 8)
//!     .unwrap()
//!     .reform(&image)
//!     .unwrap();
//!
//! assert_eq!(reformed.metadata().pixels().len(), 8);
//! let source = reformed.to_source("badge", BracketStyle::NextLine);
//! assert!(source.ends_with("reference the image."));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGBA input
//!     |
//!     v
//! quantize()              (median cut palette, optional error diffusion)
//!     |
//!     v
//! IndexedBuffer -> RGBA   (palette colors only)
//!     |
//!     v
//! resize_nearest()        (no blending, no new colors)
//!     |
//!     v
//! pack_indexed()          (first-occurrence palette, 1/4/8 bpp bytes)
//!     |
//!     v
//! ImageMetadata -> render_source()
//! ```
//!
//! The quantizer's [`QuantPalette`] and the packer's [`OutputPalette`] are
//! separate types. Only the latter, rebuilt from the resized image, is
//! serialized.
//!
//! # Color Distance
//!
//! Nearest-color matching uses squared RGB distance weighted by Rec. 709
//! luma coefficients (0.2126, 0.7152, 0.0722). Ties resolve to the lowest
//! palette index, so results are deterministic.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod pack;
pub mod palette;
pub mod serialize;

mod quantize;
mod resample;


pub use api::{ReformError, Reformed, Reformer};
pub use color::{PixelBuffer, Rgb};
pub use dither::DitherKernel;
pub use output::IndexedBuffer;
pub use pack::{pack_indexed, pack_indices, unpack_indices, ColorDepth, ImageMetadata, OutputPalette};
pub use palette::QuantPalette;
pub use quantize::quantize;
pub use resample::resize_nearest;
pub use serialize::{render_source, BracketStyle};
