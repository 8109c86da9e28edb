//! Indexing and bit-packing of the resized image.
//!
//! - [`ColorDepth`]: the 1/4/8 bpp output format
//! - [`pack_indexed`]: first-occurrence palette + packed bytes
//! - [`pack_indices`] / [`unpack_indices`]: the raw bit layout
//! - [`ImageMetadata`]: the result handed to the serializer

mod depth;
mod metadata;
mod packer;

pub use depth::ColorDepth;
pub use metadata::ImageMetadata;
pub use packer::{pack_indexed, pack_indices, unpack_indices, OutputPalette};
