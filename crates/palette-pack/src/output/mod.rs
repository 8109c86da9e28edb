//! Quantizer output
//!
//! [`IndexedBuffer`] is the canonical result of [`quantize`](crate::quantize):
//! indices into a [`QuantPalette`](crate::QuantPalette), renderable back to
//! RGBA for resizing and packing.

mod indexed;

pub use indexed::IndexedBuffer;
