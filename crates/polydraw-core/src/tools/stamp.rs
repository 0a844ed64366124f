//! Stamp an image under the cursor.

use super::{Tool, ToolContext, ToolKind};
use crate::color::RasterImage;
use crate::commands::{DrawCommand, StampCommand};
use crate::input::PointerEvent;
use kurbo::Point;
use std::sync::Arc;

/// Degrees per wheel notch.
pub const ROTATION_STEP: f64 = 15.0;
/// Degrees per wheel notch with alt held.
pub const ROTATION_FINE_STEP: f64 = 1.0;

#[derive(Debug)]
pub struct StampTool {
    image: Option<Arc<RasterImage>>,
    position: Point,
    scale: f64,
    angle: f64,
    preview: Option<StampCommand>,
}

impl Default for StampTool {
    fn default() -> Self {
        Self {
            image: None,
            position: Point::ZERO,
            scale: 1.0,
            angle: 0.0,
            preview: None,
        }
    }
}

impl StampTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<Arc<RasterImage>> {
        self.image.clone()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation in degrees, in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    fn track(&mut self, event: &PointerEvent, ctx: &ToolContext<'_>) {
        self.position = event.position;
        self.scale = ctx.settings.stamp_scale;
        if let Some(image) = &ctx.stamp_image {
            if self.image.as_ref().is_none_or(|current| !Arc::ptr_eq(current, image)) {
                self.image = Some(image.clone());
                self.preview = None;
            }
        } else {
            self.image = None;
        }
    }

    fn render_preview(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.preview.clear();
        let preview = match self.preview.take() {
            Some(mut preview) => {
                preview.set_values(self);
                Some(preview)
            }
            None => StampCommand::from_tool(self),
        };
        if let Some(preview) = &preview {
            preview.execute(ctx.preview);
        }
        self.preview = preview;
    }
}

impl Tool for StampTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Stamp
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.track(event, ctx);
        match StampCommand::from_tool(self) {
            Some(command) => ctx.commit(command),
            None => log::warn!("Stamp ignored: no stamp image set"),
        }
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.track(event, ctx);
        self.render_preview(ctx);
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_leave(&mut self, _event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        ctx.clear_preview();
    }

    fn on_wheel(&mut self, event: &PointerEvent, delta: f64, ctx: &mut ToolContext<'_>) {
        let step = if event.modifiers.alt { ROTATION_FINE_STEP } else { ROTATION_STEP };
        self.angle = (self.angle + delta * step).rem_euclid(360.0);
        self.track(event, ctx);
        self.render_preview(ctx);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        ctx.clear_preview();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::commands::Command;
    use crate::input::Modifiers;
    use crate::tools::testing::{Harness, pointer};

    fn harness_with_stamp() -> Harness {
        let mut h = Harness::new();
        h.stamp_image = Some(Arc::new(RasterImage::filled(10, 10, Rgba::black())));
        h
    }

    #[test]
    fn test_no_image_no_command() {
        let mut h = Harness::new();
        let mut tool = StampTool::new();
        h.drag(&mut tool, 5.0, 5.0);
        h.down(&mut tool, 5.0, 5.0);
        assert_eq!(h.history.undo_len(), 0);
        assert!(h.preview.ops_since_clear().is_empty());
    }

    #[test]
    fn test_click_commits_stamp() {
        let mut h = harness_with_stamp();
        let mut tool = StampTool::new();
        h.drag(&mut tool, 50.0, 60.0);
        assert!(!h.preview.ops_since_clear().is_empty());
        h.down(&mut tool, 50.0, 60.0);
        assert!(matches!(h.history.commands()[0], Command::Stamp(_)));
    }

    #[test]
    fn test_wheel_rotates() {
        let mut h = harness_with_stamp();
        let mut tool = StampTool::new();
        tool.on_wheel(&pointer(0.0, 0.0), 1.0, &mut h.ctx());
        assert_eq!(tool.angle(), 15.0);
        let fine = pointer(0.0, 0.0).with_modifiers(Modifiers {
            alt: true,
            ..Modifiers::NONE
        });
        tool.on_wheel(&fine, -20.0, &mut h.ctx());
        assert_eq!(tool.angle(), 355.0);
    }
}
