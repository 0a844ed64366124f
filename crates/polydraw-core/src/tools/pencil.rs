//! Freehand drawing.

use super::{Tool, ToolContext, ToolKind};
use crate::color::Rgba;
use crate::commands::{DrawCommand, PencilCommand};
use crate::input::PointerEvent;
use kurbo::Point;

#[derive(Debug, Default)]
pub struct PencilTool {
    points: Vec<Point>,
    color: Rgba,
    width: f64,
    drawing: bool,
    preview: Option<PencilCommand>,
}

impl PencilTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    fn render_preview(&mut self, ctx: &mut ToolContext<'_>) {
        let mut preview = self.preview.take().unwrap_or_else(|| PencilCommand::from_tool(self));
        preview.set_values(self);
        ctx.preview.clear();
        preview.execute(ctx.preview);
        log::trace!("Pencil preview with {} points", self.points.len());
        self.preview = Some(preview);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        if !self.drawing {
            return;
        }
        self.drawing = false;
        ctx.commit(PencilCommand::from_tool(self));
        self.points.clear();
    }
}

impl Tool for PencilTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pencil
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.points.clear();
        self.points.push(event.position);
        self.color = ctx.color_for(event.button);
        self.width = ctx.settings.line_width;
        self.drawing = true;
        self.render_preview(ctx);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        if !self.drawing || self.points.last() == Some(&event.position) {
            return;
        }
        self.points.push(event.position);
        self.render_preview(ctx);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        if self.drawing && self.points.last() != Some(&event.position) {
            self.points.push(event.position);
        }
        self.finish(ctx);
    }

    fn on_pointer_leave(&mut self, _event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn is_active(&self) -> bool {
        self.drawing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::input::MouseButton;
    use crate::tools::testing::{Harness, pointer};

    #[test]
    fn test_stroke_commits_on_up() {
        let mut h = Harness::new();
        let mut tool = PencilTool::new();
        h.down(&mut tool, 10.0, 10.0);
        h.drag(&mut tool, 20.0, 10.0);
        h.drag(&mut tool, 20.0, 10.0);
        h.drag(&mut tool, 30.0, 15.0);
        assert_eq!(h.history.undo_len(), 0);
        assert!(!h.preview.ops().is_empty());
        h.up(&mut tool, 30.0, 15.0);

        assert_eq!(h.history.undo_len(), 1);
        let Command::Pencil(cmd) = &h.history.commands()[0] else {
            panic!("expected a pencil command");
        };
        assert_eq!(cmd.points().len(), 3);
        assert_eq!(cmd.color(), Rgba::black());
        assert_eq!(cmd.width(), 5.0);
    }

    #[test]
    fn test_right_button_uses_secondary() {
        let mut h = Harness::new();
        let mut tool = PencilTool::new();
        let event = pointer(5.0, 5.0).with_button(MouseButton::Right);
        tool.on_pointer_down(&event, &mut h.ctx());
        tool.on_pointer_up(&event, &mut h.ctx());
        let Command::Pencil(cmd) = &h.history.commands()[0] else {
            panic!("expected a pencil command");
        };
        assert_eq!(cmd.color(), Rgba::white());
        assert_eq!(cmd.points().len(), 1);
    }

    #[test]
    fn test_leave_commits_once() {
        let mut h = Harness::new();
        let mut tool = PencilTool::new();
        h.down(&mut tool, 1.0, 1.0);
        h.drag(&mut tool, 2.0, 2.0);
        tool.on_pointer_leave(&pointer(3.0, 3.0), &mut h.ctx());
        h.up(&mut tool, 3.0, 3.0);
        assert_eq!(h.history.undo_len(), 1);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut h = Harness::new();
        let mut tool = PencilTool::new();
        h.drag(&mut tool, 2.0, 2.0);
        h.up(&mut tool, 2.0, 2.0);
        assert_eq!(h.history.undo_len(), 0);
        assert!(h.preview.ops().is_empty());
    }
}
