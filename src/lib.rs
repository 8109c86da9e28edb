//! imgreform - indexed-color image reformatting
//!
//! Command-line and HTTP front end for [`palette_pack`]: decodes raster
//! images, reduces them to 2, 16 or 256 colors and emits C source for
//! embedded displays. This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
