//! Aerosol spray.

use super::DrawCommand;
use crate::color::Rgba;
use crate::surface::{DrawingSurface, PATH_TOLERANCE};
use crate::tools::AerosolTool;
use kurbo::{BezPath, Circle, Point, Shape as KurboShape};

/// Filled dots recorded by the aerosol tool, grouped per emission.
///
/// Dot positions are sampled once, while spraying; executing only replays
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct AerosolCommand {
    sprays: Vec<Vec<Point>>,
    color: Rgba,
    dot_diameter: f64,
}

impl AerosolCommand {
    pub fn new(sprays: Vec<Vec<Point>>, color: Rgba, dot_diameter: f64) -> Self {
        Self {
            sprays,
            color,
            dot_diameter,
        }
    }

    pub fn from_tool(tool: &AerosolTool) -> Self {
        let mut command = Self::new(Vec::new(), tool.color(), tool.dot_diameter());
        command.set_values(tool);
        command
    }

    pub fn set_values(&mut self, tool: &AerosolTool) {
        self.sprays.clear();
        self.sprays.extend(tool.sprays().iter().cloned());
        self.color = tool.color();
        self.dot_diameter = tool.dot_diameter();
    }

    pub fn sprays(&self) -> &[Vec<Point>] {
        &self.sprays
    }

    pub fn dot_count(&self) -> usize {
        self.sprays.iter().map(Vec::len).sum()
    }
}

impl DrawCommand for AerosolCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        let radius = self.dot_diameter / 2.0;
        for spray in self.sprays.iter().filter(|s| !s.is_empty()) {
            let mut path = BezPath::new();
            for dot in spray {
                path.extend(Circle::new(*dot, radius).path_elements(PATH_TOLERANCE));
            }
            surface.fill_path(&path, self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    #[test]
    fn test_one_fill_per_spray() {
        let command = AerosolCommand::new(
            vec![
                vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
                vec![],
                vec![Point::new(5.0, 5.0)],
            ],
            Rgba::black(),
            2.0,
        );
        assert_eq!(command.dot_count(), 3);
        let mut surface = RecordingSurface::new(10, 10);
        command.execute(&mut surface);
        assert_eq!(surface.ops().len(), 2);
        assert!(surface.ops().iter().all(|op| matches!(op, SurfaceOp::Fill { .. })));
    }

    #[test]
    fn test_replay_is_identical() {
        let command = AerosolCommand::new(vec![vec![Point::new(3.0, 4.0)]], Rgba::black(), 2.0);
        let mut a = RecordingSurface::new(10, 10);
        let mut b = RecordingSurface::new(10, 10);
        command.execute(&mut a);
        command.execute(&mut b);
        assert_eq!(a.ops(), b.ops());
    }
}
