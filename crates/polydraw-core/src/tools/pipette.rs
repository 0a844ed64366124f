//! Color picker.

use super::{Tool, ToolContext, ToolKind};
use crate::input::{MouseButton, PointerEvent};

/// Reads a pixel from the base surface into the palette. Never commits.
#[derive(Debug, Default)]
pub struct PipetteTool;

impl PipetteTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for PipetteTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pipette
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        let p = event.position;
        if p.x < 0.0 || p.y < 0.0 {
            return;
        }
        let Some(color) = ctx.base.pixel(p.x.floor() as u32, p.y.floor() as u32) else {
            return;
        };
        log::debug!("Picked {} with {:?}", color.hex(), event.button);
        match event.button {
            MouseButton::Left => ctx.palette.set_primary(color),
            _ => ctx.palette.set_secondary(color),
        }
    }

    fn on_pointer_move(&mut self, _event: &PointerEvent, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_up(&mut self, _event: &PointerEvent, _ctx: &mut ToolContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::tools::testing::{Harness, pointer};

    #[test]
    fn test_pick_primary_and_secondary() {
        let mut h = Harness::new();
        let red = Rgba::new(255, 0, 0, 255);
        h.base.set_pixel(12, 7, red);
        let mut tool = PipetteTool::new();

        h.down(&mut tool, 12.6, 7.2);
        assert_eq!(h.palette.primary(), red);

        let right = pointer(0.0, 0.0).with_button(MouseButton::Right);
        tool.on_pointer_down(&right, &mut h.ctx());
        assert_eq!(h.palette.secondary(), Rgba::white());
        assert_eq!(h.history.undo_len(), 0);
    }

    #[test]
    fn test_outside_canvas_keeps_palette() {
        let mut h = Harness::new();
        let mut tool = PipetteTool::new();
        h.down(&mut tool, -1.0, 5.0);
        h.down(&mut tool, 500.0, 5.0);
        assert_eq!(h.palette.primary(), Rgba::black());
    }
}
