//! Canvas grid overlay.

use crate::color::Rgba;
use crate::surface::{DrawingSurface, LineCap, StrokeParams};
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const CELL_SIZE_RANGE: RangeInclusive<f64> = 5.0..=200.0;
pub const OPACITY_RANGE: RangeInclusive<f64> = 0.1..=1.0;
/// Step used by [`GridSettings::increase`] and [`GridSettings::decrease`].
pub const CELL_SIZE_STEP: f64 = 5.0;

/// Grid visibility and spacing. Magnetism snaps to `cell_size` whether or not
/// the grid is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub visible: bool,
    cell_size: f64,
    opacity: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: false,
            cell_size: 50.0,
            opacity: 0.5,
        }
    }
}

impl GridSettings {
    pub fn new(cell_size: f64, opacity: f64) -> Self {
        let mut grid = Self::default();
        grid.set_cell_size(cell_size);
        grid.set_opacity(opacity);
        grid
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn set_cell_size(&mut self, cell_size: f64) {
        self.cell_size = cell_size.clamp(*CELL_SIZE_RANGE.start(), *CELL_SIZE_RANGE.end());
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(*OPACITY_RANGE.start(), *OPACITY_RANGE.end());
    }

    pub fn increase(&mut self) {
        self.set_cell_size(self.cell_size + CELL_SIZE_STEP);
    }

    pub fn decrease(&mut self) {
        self.set_cell_size(self.cell_size - CELL_SIZE_STEP);
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Re-apply the clamps after deserialising.
    pub(crate) fn normalized(mut self) -> Self {
        self.set_cell_size(self.cell_size);
        self.set_opacity(self.opacity);
        self
    }

    /// All grid lines covering a `width` x `height` area, on pixel centres.
    pub fn lines(&self, width: u32, height: u32) -> BezPath {
        let (w, h) = (width as f64, height as f64);
        let mut path = BezPath::new();
        let mut x = self.cell_size;
        while x < w {
            path.move_to(Point::new(x + 0.5, 0.0));
            path.line_to(Point::new(x + 0.5, h));
            x += self.cell_size;
        }
        let mut y = self.cell_size;
        while y < h {
            path.move_to(Point::new(0.0, y + 0.5));
            path.line_to(Point::new(w, y + 0.5));
            y += self.cell_size;
        }
        path
    }

    /// Draw the grid onto an overlay surface. Does nothing when hidden.
    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        if !self.visible {
            return;
        }
        let path = self.lines(surface.width(), surface.height());
        let stroke = StrokeParams::new(Rgba::black().with_alpha(self.opacity), 1.0).with_cap(LineCap::Butt);
        surface.stroke_path(&path, &stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    #[test]
    fn test_defaults() {
        let grid = GridSettings::default();
        assert!(!grid.visible);
        assert_eq!(grid.cell_size(), 50.0);
        assert_eq!(grid.opacity(), 0.5);
    }

    #[test]
    fn test_steps_clamp() {
        let mut grid = GridSettings::new(198.0, 0.0);
        assert_eq!(grid.opacity(), 0.1);
        grid.increase();
        assert_eq!(grid.cell_size(), 200.0);
        let mut grid = GridSettings::new(7.0, 2.0);
        assert_eq!(grid.opacity(), 1.0);
        grid.decrease();
        assert_eq!(grid.cell_size(), 5.0);
    }

    #[test]
    fn test_lines_count() {
        let grid = GridSettings::new(50.0, 0.5);
        let path = grid.lines(200, 100);
        // x = 50, 100, 150 and y = 50: two elements each.
        assert_eq!(path.elements().len(), 8);
    }

    #[test]
    fn test_draw_only_when_visible() {
        let mut surface = RecordingSurface::new(100, 100);
        let mut grid = GridSettings::default();
        grid.draw(&mut surface);
        assert!(surface.ops().is_empty());
        grid.toggle();
        grid.draw(&mut surface);
        assert!(matches!(&surface.ops()[0], SurfaceOp::Stroke { stroke, .. } if stroke.color.a == 128));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let grid: GridSettings = serde_json::from_str(r#"{"cell_size": 1000}"#).unwrap();
        assert_eq!(grid.normalized().cell_size(), 200.0);
    }
}
