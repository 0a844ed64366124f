//! Rectangular selection: rubber band, move, resize and delete.
//!
//! Releasing a rubber band lifts the covered pixels off the base surface into
//! a floating selection drawn on the preview. The base is untouched until the
//! selection is committed, which records a single [`SelectionCommand`].

use super::{Tool, ToolContext, ToolKind};
use crate::color::{RasterImage, Rgba};
use crate::commands::{SelectionCommand, placement};
use crate::input::{Key, PointerEvent};
use crate::selection::{ResizerHandler, SelectionBox};
use crate::surface::{LineCap, PATH_TOLERANCE, StrokeParams};
use kurbo::{Point, Rect, Shape as KurboShape, Vec2};

/// Arrow key step in pixels when magnetism is off.
pub const NUDGE_STEP: f64 = 3.0;

const OUTLINE_COLOR: Rgba = Rgba::new(0, 120, 215, 255);

#[derive(Debug)]
struct Floating {
    source: Rect,
    image: RasterImage,
    sel: SelectionBox,
    /// Mirroring folded in from finished resize drags.
    flip: (bool, bool),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Idle,
    Selecting { start: Point },
    Moving { start: Point, origin: SelectionBox },
    Resizing,
}

#[derive(Debug)]
pub struct SelectionTool {
    floating: Option<Floating>,
    drag: Drag,
    band: Rect,
    resizer: ResizerHandler,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self {
            floating: None,
            drag: Drag::Idle,
            band: Rect::ZERO,
            resizer: ResizerHandler::default(),
        }
    }
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current placement of the floating selection.
    pub fn selection_box(&self) -> Option<SelectionBox> {
        self.floating.as_ref().map(|f| f.sel)
    }

    /// Where the floating pixels were lifted from.
    pub fn source(&self) -> Option<Rect> {
        self.floating.as_ref().map(|f| f.source)
    }

    pub fn is_floating(&self) -> bool {
        self.floating.is_some()
    }

    pub fn resizer(&self) -> &ResizerHandler {
        &self.resizer
    }

    /// Mirroring the selection would be committed with right now.
    pub fn flip(&self) -> (bool, bool) {
        let Some(floating) = &self.floating else {
            return (false, false);
        };
        let (mx, my) = self.resizer.active_mirrored().unwrap_or((false, false));
        (floating.flip.0 ^ mx, floating.flip.1 ^ my)
    }

    fn render_band(&self, ctx: &mut ToolContext<'_>) {
        ctx.preview.clear();
        let stroke = StrokeParams::new(OUTLINE_COLOR, 1.0)
            .with_cap(LineCap::Butt)
            .with_dash(4.0, 4.0);
        ctx.preview.stroke_path(&self.band.to_path(PATH_TOLERANCE), &stroke);
    }

    fn render_floating(&self, ctx: &mut ToolContext<'_>) {
        let Some(floating) = &self.floating else {
            return;
        };
        ctx.preview.clear();
        let background = ctx.base.background();
        ctx.preview.fill_rect(floating.source, background);
        let dest = floating.sel.rect();
        if dest.area() > 0.0 && !floating.image.is_empty() {
            let (fx, fy) = self.flip();
            ctx.preview.draw_image(&floating.image, placement(&floating.image, dest, fx, fy));
        }
        let outline = StrokeParams::new(OUTLINE_COLOR, 1.0)
            .with_cap(LineCap::Butt)
            .with_dash(4.0, 4.0);
        ctx.preview.stroke_path(&dest.to_path(PATH_TOLERANCE), &outline);

        let border = StrokeParams::new(OUTLINE_COLOR, 1.0).with_cap(LineCap::Butt);
        let size = self.resizer.handle_size();
        for handle in self.resizer.handles().filter(|h| h.visible) {
            let rect = handle.rect(size);
            ctx.preview.fill_rect(rect, Rgba::white());
            ctx.preview.stroke_path(&rect.to_path(PATH_TOLERANCE), &border);
        }
    }

    fn lift(&mut self, rect: Rect, ctx: &mut ToolContext<'_>) {
        let canvas = Rect::new(0.0, 0.0, ctx.base.width() as f64, ctx.base.height() as f64);
        let rect = rect.round().intersect(canvas);
        if rect.width() < 1.0 || rect.height() < 1.0 {
            ctx.clear_preview();
            return;
        }
        if self.resizer.handle_size() != ctx.handle_size {
            self.resizer = ResizerHandler::new(ctx.handle_size);
        }
        let image = ctx.base.read_region(rect);
        log::debug!("Selection lifted {}x{} at ({}, {})", image.width(), image.height(), rect.x0, rect.y0);
        self.floating = Some(Floating {
            source: rect,
            image,
            sel: SelectionBox::from_rect(rect),
            flip: (false, false),
        });
        self.resizer.set_resizer_positions(rect);
        self.render_floating(ctx);
    }

    fn translate(&mut self, delta: Vec2, origin: SelectionBox) {
        if let Some(floating) = &mut self.floating {
            floating.sel = SelectionBox {
                left: origin.left + delta.x,
                top: origin.top + delta.y,
                ..origin
            };
            self.resizer.set_resizer_positions(floating.sel.rect());
        }
    }

    fn nudge(&mut self, direction: (f64, f64), ctx: &mut ToolContext<'_>) {
        let Some(origin) = self.selection_box() else {
            return;
        };
        let magnetic = ctx.magnetism.is_enabled();
        let step = if magnetic { ctx.grid.cell_size() } else { NUDGE_STEP };
        let mut delta = Vec2::new(direction.0 * step, direction.1 * step);
        if magnetic {
            ctx.magnetism.set_transform_delta(delta);
            delta += ctx
                .magnetism
                .magnetize_selection(origin.top_left(), origin.bottom_right(), ctx.grid.cell_size());
            ctx.magnetism.set_transform_delta(Vec2::ZERO);
        }
        self.translate(delta, origin);
        self.render_floating(ctx);
    }

    /// Drop the floating selection into the history if it moved.
    fn commit(&mut self, ctx: &mut ToolContext<'_>) {
        let flip = self.flip();
        self.resizer.release();
        self.resizer.reset_resizers();
        self.drag = Drag::Idle;
        let Some(floating) = self.floating.take() else {
            return;
        };
        let dest = floating.sel.rect();
        if dest == floating.source && flip == (false, false) {
            ctx.clear_preview();
            return;
        }
        log::debug!("Selection committed to {dest:?}");
        ctx.commit(SelectionCommand::moved(floating.source, floating.image, dest).with_flip(flip.0, flip.1));
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.floating = None;
        self.drag = Drag::Idle;
        self.resizer.release();
        self.resizer.reset_resizers();
        ctx.clear_preview();
    }
}

impl Tool for SelectionTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Selection
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        let p = event.position;
        if let Some(floating) = &self.floating {
            if let Some(kind) = self.resizer.hit_test(p) {
                self.resizer.press(kind, &floating.sel);
                self.drag = Drag::Resizing;
                return;
            }
            if floating.sel.contains(p) {
                self.drag = Drag::Moving {
                    start: p,
                    origin: floating.sel,
                };
                ctx.magnetism.set_transform_delta(Vec2::ZERO);
                return;
            }
            self.commit(ctx);
        }
        self.drag = Drag::Selecting { start: p };
        self.band = Rect::from_points(p, p);
        self.render_band(ctx);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        let p = event.position;
        match self.drag {
            Drag::Idle => {}
            Drag::Selecting { start } => {
                self.band = Rect::from_points(start, p);
                self.render_band(ctx);
            }
            Drag::Moving { start, origin } => {
                let mut delta = p - start;
                ctx.magnetism.set_transform_delta(delta);
                if ctx.magnetism.is_enabled() {
                    delta += ctx
                        .magnetism
                        .magnetize_selection(origin.top_left(), origin.bottom_right(), ctx.grid.cell_size());
                }
                self.translate(delta, origin);
                self.render_floating(ctx);
            }
            Drag::Resizing => {
                if let Some(floating) = &mut self.floating {
                    self.resizer.resize(&mut floating.sel, p, event.modifiers.shift);
                }
                self.render_floating(ctx);
            }
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        match self.drag {
            Drag::Idle => {}
            Drag::Selecting { start } => {
                self.drag = Drag::Idle;
                self.lift(Rect::from_points(start, event.position), ctx);
            }
            Drag::Moving { .. } => {
                self.drag = Drag::Idle;
                ctx.magnetism.set_transform_delta(Vec2::ZERO);
            }
            Drag::Resizing => {
                self.drag = Drag::Idle;
                let mirrored = self.resizer.active_mirrored();
                self.resizer.release();
                if let (Some(floating), Some((mx, my))) = (&mut self.floating, mirrored) {
                    floating.flip = (floating.flip.0 ^ mx, floating.flip.1 ^ my);
                }
                self.render_floating(ctx);
            }
        }
    }

    fn on_key(&mut self, key: Key, pressed: bool, ctx: &mut ToolContext<'_>) {
        if key == Key::Shift {
            if self.drag == Drag::Resizing {
                if let Some(floating) = &mut self.floating {
                    self.resizer.resize_square(&mut floating.sel, pressed);
                }
                self.render_floating(ctx);
            }
            return;
        }
        if !pressed {
            return;
        }
        match key {
            Key::Enter => self.commit(ctx),
            Key::Escape => self.cancel(ctx),
            Key::Delete => {
                let Some(floating) = self.floating.take() else {
                    return;
                };
                self.cancel(ctx);
                log::debug!("Selection deleted at {:?}", floating.source);
                ctx.commit(SelectionCommand::deleted(floating.source, floating.image));
            }
            _ => {
                if let Some(direction) = key.arrow_direction() {
                    if self.drag == Drag::Idle {
                        self.nudge(direction, ctx);
                    }
                }
            }
        }
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        if matches!(self.drag, Drag::Selecting { .. }) {
            self.drag = Drag::Idle;
            ctx.clear_preview();
        }
        self.commit(ctx);
    }

    fn is_active(&self) -> bool {
        self.floating.is_some() || self.drag != Drag::Idle
    }
}
