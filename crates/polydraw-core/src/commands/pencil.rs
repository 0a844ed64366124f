//! Freehand pencil stroke.

use super::{DrawCommand, polyline};
use crate::color::Rgba;
use crate::surface::{DrawingSurface, PATH_TOLERANCE, StrokeParams};
use crate::tools::PencilTool;
use kurbo::{Circle, Point, Shape as KurboShape};

/// A round-capped polyline through the recorded pointer positions.
#[derive(Debug, Clone, PartialEq)]
pub struct PencilCommand {
    points: Vec<Point>,
    color: Rgba,
    width: f64,
}

impl PencilCommand {
    pub fn new(points: Vec<Point>, color: Rgba, width: f64) -> Self {
        Self { points, color, width }
    }

    /// Snapshot a pencil tool's current path.
    pub fn from_tool(tool: &PencilTool) -> Self {
        let mut command = Self::new(Vec::new(), tool.color(), tool.width());
        command.set_values(tool);
        command
    }

    pub fn set_values(&mut self, tool: &PencilTool) {
        self.points.clear();
        self.points.extend_from_slice(tool.points());
        self.color = tool.color();
        self.width = tool.width();
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
}

impl DrawCommand for PencilCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        match self.points.as_slice() {
            [] => {}
            // A click without movement still leaves a dot.
            [p] => {
                let dot = Circle::new(*p, self.width / 2.0);
                surface.fill_path(&dot.to_path(PATH_TOLERANCE), self.color);
            }
            points => {
                surface.stroke_path(&polyline(points), &StrokeParams::new(self.color, self.width));
            }
        }
    }
}
