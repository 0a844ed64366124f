//! Rectangle, ellipse and polygon tools.
//!
//! One tool type covers the three shapes: they share the drag-box gesture
//! and only differ in the command they build.

use super::{Tool, ToolContext, ToolKind};
use crate::commands::{Command, DrawCommand, EllipseCommand, PolygonCommand, RectangleCommand, ShapeParams};
use crate::input::{Key, MouseButton, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Polygon,
}

#[derive(Debug)]
pub struct ShapeTool {
    shape: ShapeKind,
    params: ShapeParams,
    sides: u32,
    dragging: bool,
    preview: Option<Command>,
}

impl ShapeTool {
    pub fn new(shape: ShapeKind) -> Self {
        Self {
            shape,
            params: ShapeParams::default(),
            sides: 3,
            dragging: false,
            preview: None,
        }
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn params(&self) -> &ShapeParams {
        &self.params
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    fn command(&self) -> Command {
        match self.shape {
            ShapeKind::Rectangle => RectangleCommand::new(self.params.clone()).into(),
            ShapeKind::Ellipse => EllipseCommand::new(self.params.clone()).into(),
            ShapeKind::Polygon => PolygonCommand::new(self.params.clone(), self.sides).into(),
        }
    }

    fn render_preview(&mut self, ctx: &mut ToolContext<'_>) {
        let mut preview = self.preview.take().unwrap_or_else(|| self.command());
        match &mut preview {
            Command::Rectangle(c) => c.set_values(self),
            Command::Ellipse(c) => c.set_values(self),
            Command::Polygon(c) => c.set_values(self),
            _ => {}
        }
        ctx.preview.clear();
        preview.execute(ctx.preview);
        log::trace!("{:?} preview {:?} -> {:?}", self.shape, self.params.start, self.params.end);
        self.preview = Some(preview);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        if self.params.start == self.params.end {
            ctx.clear_preview();
            return;
        }
        ctx.commit(self.command());
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        match self.shape {
            ShapeKind::Rectangle => ToolKind::Rectangle,
            ShapeKind::Ellipse => ToolKind::Ellipse,
            ShapeKind::Polygon => ToolKind::Polygon,
        }
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        let (primary, secondary) = match event.button {
            MouseButton::Left => (ctx.palette.primary(), ctx.palette.secondary()),
            _ => (ctx.palette.secondary(), ctx.palette.primary()),
        };
        self.params = ShapeParams {
            start: event.position,
            end: event.position,
            aspect_locked: event.modifiers.shift,
            fill: ctx.settings.fill,
            primary,
            secondary,
            line_width: ctx.settings.line_width,
        };
        self.sides = ctx.settings.polygon_sides();
        self.dragging = true;
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        if !self.dragging {
            return;
        }
        self.params.end = event.position;
        self.params.aspect_locked = event.modifiers.shift;
        self.render_preview(ctx);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        if self.dragging {
            self.params.end = event.position;
        }
        self.finish(ctx);
    }

    fn on_pointer_leave(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        self.on_pointer_up(event, ctx);
    }

    fn on_key(&mut self, key: Key, pressed: bool, ctx: &mut ToolContext<'_>) {
        match key {
            Key::Shift if self.dragging => {
                self.params.aspect_locked = pressed;
                self.render_preview(ctx);
            }
            Key::Escape if pressed && self.dragging => {
                self.dragging = false;
                ctx.clear_preview();
            }
            _ => {}
        }
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn is_active(&self) -> bool {
        self.dragging
    }
}
