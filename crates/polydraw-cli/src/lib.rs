//! PolyDraw script replay.
//!
//! Scripts are JSON lists of editor operations. Replaying one drives a
//! [`polydraw_core::Editor`] over raster surfaces and yields the drawing.

pub mod replay;
pub mod script;

pub use replay::{FontChoice, ReplayOptions, apply, replay};
pub use script::{PointerStep, Script, Step, parse_color};
