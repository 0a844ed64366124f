//! PolyDraw Render Library
//!
//! CPU raster implementation of the core drawing surface, built on
//! `tiny-skia`, with `rusttype` text and PNG import/export.

mod error;
pub mod fonts;
mod image_io;
mod surface;

pub use error::{RenderError, RenderResult};
pub use fonts::FontBook;
pub use image_io::{decode_png, encode_png};
pub use surface::SkiaSurface;
