//! Text command.

use super::DrawCommand;
use crate::color::Rgba;
use crate::surface::{DrawingSurface, FontSpec};
use crate::tools::TextTool;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Baseline-to-baseline distance as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Pre-wrapped lines of text inside a box of fixed width.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    lines: Vec<String>,
    origin: Point,
    box_width: f64,
    font: FontSpec,
    align: TextAlign,
    color: Rgba,
}

impl TextCommand {
    pub fn new(
        lines: Vec<String>,
        origin: Point,
        box_width: f64,
        font: FontSpec,
        align: TextAlign,
        color: Rgba,
    ) -> Self {
        Self {
            lines,
            origin,
            box_width,
            font,
            align,
            color,
        }
    }

    pub fn from_tool(tool: &TextTool) -> Self {
        Self::new(
            tool.lines().to_vec(),
            tool.origin(),
            tool.box_width(),
            tool.font().clone(),
            tool.align(),
            tool.color(),
        )
    }

    pub fn set_values(&mut self, tool: &TextTool) {
        self.lines.clear();
        self.lines.extend(tool.lines().iter().cloned());
        self.origin = tool.origin();
        self.box_width = tool.box_width();
        self.font.clone_from(tool.font());
        self.align = tool.align();
        self.color = tool.color();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The text box: `box_width` wide, one line height per line plus half a
    /// line for descenders.
    pub fn bounds(&self) -> Rect {
        let height = (self.lines.len() as f64 + 0.5) * self.font.size * LINE_HEIGHT;
        Rect::new(self.origin.x, self.origin.y, self.origin.x + self.box_width, self.origin.y + height)
    }

    /// Baseline origin of line `index` given its measured width.
    pub fn line_origin(&self, index: usize, measured: f64) -> Point {
        let offset = match self.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => (self.box_width - measured) / 2.0,
            TextAlign::Right => self.box_width - measured,
        };
        Point::new(
            self.origin.x + offset,
            self.origin.y + (index as f64 + 1.0) * self.font.size * LINE_HEIGHT,
        )
    }
}

impl DrawCommand for TextCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        if self.lines.iter().all(String::is_empty) {
            return;
        }
        // A glyph wider than the box is cut at its edge.
        surface.set_clip(Some(self.bounds()));
        for (i, line) in self.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let measured = surface.measure_text(line, &self.font);
            let origin = self.line_origin(i, measured);
            surface.fill_text(line, origin, &self.font, self.color);
        }
        surface.set_clip(None);
    }
}
