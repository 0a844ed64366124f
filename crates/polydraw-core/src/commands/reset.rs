//! Canvas size reset.

use super::DrawCommand;
use crate::surface::DrawingSurface;

/// Re-establishes the canvas dimensions.
///
/// Resizing a surface wipes it to its background, so history replays start
/// with this command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeCanvasCommand {
    width: u32,
    height: u32,
}

impl ResizeCanvasCommand {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl DrawCommand for ResizeCanvasCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        surface.resize(self.width, self.height);
    }
}
