//! Eraser stroke.

use super::{DrawCommand, polyline};
use crate::surface::{DrawingSurface, LineCap, LineJoin, StrokeParams};
use crate::tools::EraserTool;
use kurbo::{Point, Rect};

/// Paints the surface background along a square-capped path.
///
/// Erasing is simulated by painting, not by clearing alpha, so replaying the
/// undo pile reproduces the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct EraserCommand {
    points: Vec<Point>,
    width: f64,
}

impl EraserCommand {
    pub fn new(points: Vec<Point>, width: f64) -> Self {
        Self { points, width }
    }

    pub fn from_tool(tool: &EraserTool) -> Self {
        let mut command = Self::new(Vec::new(), tool.width());
        command.set_values(tool);
        command
    }

    pub fn set_values(&mut self, tool: &EraserTool) {
        self.points.clear();
        self.points.extend_from_slice(tool.points());
        self.width = tool.width();
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl DrawCommand for EraserCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        let background = surface.background();
        match self.points.as_slice() {
            [] => {}
            [p] => {
                let half = self.width / 2.0;
                surface.fill_rect(Rect::new(p.x - half, p.y - half, p.x + half, p.y + half), background);
            }
            points => {
                let stroke = StrokeParams::new(background, self.width)
                    .with_cap(LineCap::Square)
                    .with_join(LineJoin::Bevel);
                surface.stroke_path(&polyline(points), &stroke);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::surface::{RecordingSurface, SurfaceOp};

    #[test]
    fn test_eraser_uses_background_color() {
        let mut surface = RecordingSurface::with_background(20, 20, Rgba::new(1, 2, 3, 255));
        EraserCommand::new(vec![Point::new(1.0, 1.0), Point::new(10.0, 10.0)], 6.0).execute(&mut surface);
        match surface.ops() {
            [SurfaceOp::Stroke { stroke, .. }] => {
                assert_eq!(stroke.color, Rgba::new(1, 2, 3, 255));
                assert_eq!(stroke.cap, LineCap::Square);
            }
            other => panic!("unexpected ops {other:?}"),
        }
    }

    #[test]
    fn test_single_point_erases_square() {
        let mut surface = RecordingSurface::new(20, 20);
        EraserCommand::new(vec![Point::new(10.0, 10.0)], 4.0).execute(&mut surface);
        assert!(matches!(surface.ops(), [SurfaceOp::Fill { color, .. }] if *color == Rgba::white()));
    }
}
