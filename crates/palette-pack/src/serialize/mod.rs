//! C source serialization
//!
//! [`render_source`] turns [`ImageMetadata`](crate::ImageMetadata) into a
//! self-contained C file; [`BracketStyle`] controls brace placement.

mod source;
mod style;

pub use source::render_source;
pub use style::BracketStyle;
