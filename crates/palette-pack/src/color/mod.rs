//! Color and pixel buffer types
//!
//! - [`Rgb`]: 8-bit RGB triple, the unit of every palette
//! - [`PixelBuffer`]: owned row-major RGBA8 image handed between stages
//!
//! # Example
//!
//! ```
//! use palette_pack::{PixelBuffer, Rgb};
//!
//! let buffer = PixelBuffer::filled(2, 1, Rgb::new(255, 0, 0));
//! assert_eq!(buffer.rgb_at(1, 0), Rgb::new(255, 0, 0));
//! ```

mod buffer;
mod rgb;

pub use buffer::PixelBuffer;
pub(crate) use rgb::distance_sq_f32;
pub use rgb::Rgb;
