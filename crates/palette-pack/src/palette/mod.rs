//! Palette construction
//!
//! [`QuantPalette`] is the color list the quantizer maps pixels onto. It is
//! either supplied by the caller, fixed (`[black, white]` at 1bpp) or derived
//! from an exact histogram of the image by weighted median cut.

mod histogram;
mod median_cut;
mod palette;

pub use palette::QuantPalette;

pub(crate) use histogram::build_histogram;
pub(crate) use median_cut::median_cut;
