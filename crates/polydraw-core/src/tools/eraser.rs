//! Paint with the background color.

use super::{Tool, ToolContext, ToolKind};
use crate::commands::{DrawCommand, EraserCommand};
use crate::input::PointerEvent;
use kurbo::Point;

#[derive(Debug, Default)]
pub struct EraserTool {
    points: Vec<Point>,
    width: f64,
    erasing: bool,
    preview: Option<EraserCommand>,
}

impl EraserTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    fn render_preview(&mut self, ctx: &mut ToolContext<'_>) {
        let mut preview = self.preview.take().unwrap_or_else(|| EraserCommand::from_tool(self));
        preview.set_values(self);
        ctx.preview.clear();
        preview.execute(ctx.preview);
        self.preview = Some(preview);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        if !self.erasing {
            return;
        }
        self.erasing = false;
        ctx.commit(EraserCommand::from_tool(self));
        self.points.clear();
    }
}

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.points.clear();
        self.points.push(event.position);
        self.width = ctx.settings.eraser_width;
        self.erasing = true;
        self.render_preview(ctx);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        if !self.erasing || self.points.last() == Some(&event.position) {
            return;
        }
        self.points.push(event.position);
        self.render_preview(ctx);
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn on_pointer_leave(&mut self, _event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn is_active(&self) -> bool {
        self.erasing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::tools::testing::Harness;

    #[test]
    fn test_erase_uses_eraser_width() {
        let mut h = Harness::new();
        h.settings.eraser_width = 24.0;
        let mut tool = EraserTool::new();
        h.down(&mut tool, 0.0, 0.0);
        h.drag(&mut tool, 50.0, 0.0);
        h.up(&mut tool, 50.0, 0.0);
        let Command::Eraser(cmd) = &h.history.commands()[0] else {
            panic!("expected an eraser command");
        };
        assert_eq!(cmd.points(), &[Point::new(0.0, 0.0), Point::new(50.0, 0.0)]);
        assert!(h.preview.ops_since_clear().is_empty());
    }
}
