//! Text boxes.
//!
//! A click opens a box at the pointer that spans the rest of the canvas
//! width. Typed text is wrapped to the box with the surface's own font
//! metrics, so the committed command stores the exact lines it draws.

use super::{Tool, ToolContext, ToolKind};
use crate::color::Rgba;
use crate::commands::{DrawCommand, LINE_HEIGHT, TextAlign, TextCommand};
use crate::input::{Key, PointerEvent};
use crate::surface::{DrawingSurface, FontSpec, LineCap, StrokeParams};
use kurbo::{Point, Rect, Shape as KurboShape};

/// Dashed frame drawn around the box being edited.
const FRAME_COLOR: Rgba = Rgba::new(96, 96, 96, 255);

/// Greedy word wrap of `text` to `box_width`. Explicit newlines always
/// break; a word wider than the box is split between characters.
pub fn wrap_text(text: &str, box_width: f64, font: &FontSpec, surface: &dyn DrawingSurface) -> Vec<String> {
    let fits = |s: &str| surface.measure_text(s, font) <= box_width;
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for (i, word) in paragraph.split(' ').enumerate() {
            if i == 0 {
                line.push_str(word);
            } else {
                let candidate = format!("{line} {word}");
                if fits(&candidate) {
                    line = candidate;
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push_str(word);
                }
            }
            while !fits(&line) && line.chars().count() > 1 {
                let split = line
                    .char_indices()
                    .skip(1)
                    .map(|(idx, _)| idx)
                    .take_while(|idx| fits(&line[..*idx]))
                    .last()
                    .unwrap_or_else(|| line.chars().next().map_or(0, char::len_utf8));
                let rest = line.split_off(split);
                lines.push(std::mem::replace(&mut line, rest));
            }
        }
        lines.push(line);
    }
    lines
}

#[derive(Debug)]
pub struct TextTool {
    text: String,
    lines: Vec<String>,
    origin: Point,
    box_width: f64,
    font: FontSpec,
    align: TextAlign,
    color: Rgba,
    editing: bool,
    preview: Option<TextCommand>,
}

impl Default for TextTool {
    fn default() -> Self {
        Self {
            text: String::new(),
            lines: Vec::new(),
            origin: Point::ZERO,
            box_width: 0.0,
            font: FontSpec::default(),
            align: TextAlign::default(),
            color: Rgba::black(),
            editing: false,
            preview: None,
        }
    }
}

impl TextTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw typed text, newlines included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text wrapped to the box.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn box_width(&self) -> f64 {
        self.box_width
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// The box outline: one line tall at least, growing with the text.
    pub fn frame(&self) -> Rect {
        let rows = self.lines.len().max(1) as f64;
        let height = (rows * LINE_HEIGHT + (LINE_HEIGHT - 1.0)) * self.font.size;
        Rect::new(self.origin.x, self.origin.y, self.origin.x + self.box_width, self.origin.y + height)
    }

    fn render_preview(&mut self, ctx: &mut ToolContext<'_>) {
        self.lines = wrap_text(&self.text, self.box_width, &self.font, &*ctx.preview);
        let mut preview = self.preview.take().unwrap_or_else(|| TextCommand::from_tool(self));
        preview.set_values(self);
        ctx.preview.clear();
        let frame = StrokeParams::new(FRAME_COLOR, 1.0).with_cap(LineCap::Butt).with_dash(4.0, 4.0);
        ctx.preview.stroke_path(&self.frame().to_path(0.1), &frame);
        preview.execute(ctx.preview);
        self.preview = Some(preview);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        if !self.editing {
            return;
        }
        self.editing = false;
        if self.text.trim().is_empty() {
            ctx.clear_preview();
        } else {
            self.lines = wrap_text(&self.text, self.box_width, &self.font, &*ctx.base);
            log::debug!("Text committed: {} lines", self.lines.len());
            ctx.commit(TextCommand::from_tool(self));
        }
        self.text.clear();
        self.lines.clear();
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.editing = false;
        self.text.clear();
        self.lines.clear();
        ctx.clear_preview();
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>) {
        if self.editing {
            self.finish(ctx);
            return;
        }
        self.font = ctx.settings.font.clone();
        self.align = ctx.settings.text_align;
        self.color = ctx.color_for(event.button);
        self.origin = event.position;
        self.box_width = (ctx.base.width() as f64 - event.position.x).max(self.font.size);
        self.text.clear();
        self.editing = true;
        self.render_preview(ctx);
    }

    fn on_pointer_move(&mut self, _event: &PointerEvent, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_up(&mut self, _event: &PointerEvent, _ctx: &mut ToolContext<'_>) {}

    fn on_key(&mut self, key: Key, pressed: bool, ctx: &mut ToolContext<'_>) {
        if !pressed || !self.editing {
            return;
        }
        match key {
            Key::Character(c) if !c.is_control() => self.text.push(c),
            Key::Backspace => {
                self.text.pop();
            }
            Key::Enter => self.text.push('\n'),
            Key::Escape => {
                self.cancel(ctx);
                return;
            }
            _ => return,
        }
        self.render_preview(ctx);
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn is_active(&self) -> bool {
        self.editing
    }
}
