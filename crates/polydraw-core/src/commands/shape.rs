//! Rectangle, ellipse and polygon commands.
//!
//! The three shape tools share the same inputs: two opposite drag corners,
//! an aspect-lock flag, a fill mode and two colors. Outlines are inset by half
//! the line width so the stroke stays inside the dragged box.

use super::DrawCommand;
use crate::color::Rgba;
use crate::surface::{DrawingSurface, LineCap, LineJoin, PATH_TOLERANCE, StrokeParams};
use crate::tools::ShapeTool;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Border width used when the requested width does not fit the shape.
pub const MIN_BORDER_WIDTH: f64 = 1.0;

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Interior only, in the primary color.
    Fill,
    /// Border only, in the secondary color.
    Outline,
    /// Interior in the primary color plus border in the secondary color.
    #[default]
    OutlineFill,
}

impl FillMode {
    pub fn fills(self) -> bool {
        matches!(self, FillMode::Fill | FillMode::OutlineFill)
    }

    pub fn outlines(self) -> bool {
        matches!(self, FillMode::Outline | FillMode::OutlineFill)
    }
}

/// Parameters shared by every shape command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    pub start: Point,
    pub end: Point,
    /// Square/circle variant: both axes take the shorter drag delta.
    pub aspect_locked: bool,
    pub fill: FillMode,
    /// Fill color.
    pub primary: Rgba,
    /// Outline color.
    pub secondary: Rgba,
    pub line_width: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            start: Point::ZERO,
            end: Point::ZERO,
            aspect_locked: false,
            fill: FillMode::default(),
            primary: Rgba::black(),
            secondary: Rgba::black(),
            line_width: 5.0,
        }
    }
}

/// Resolved placement of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeGeometry {
    pub bounds: Rect,
    pub center: Point,
    pub radii: Vec2,
}

impl ShapeParams {
    /// Signed extents of the box from `start`, after aspect locking.
    fn extents(&self, force_square: bool) -> Vec2 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        if self.aspect_locked || force_square {
            let side = dx.abs().min(dy.abs());
            Vec2::new(side.copysign(dx), side.copysign(dy))
        } else {
            Vec2::new(dx, dy)
        }
    }

    fn geometry_with(&self, force_square: bool) -> ShapeGeometry {
        let corner = self.start + self.extents(force_square);
        let bounds = Rect::from_points(self.start, corner);
        ShapeGeometry {
            bounds,
            center: bounds.center(),
            radii: Vec2::new(bounds.width() / 2.0, bounds.height() / 2.0),
        }
    }

    /// Bounds, centre and radii computed from the two drag corners.
    pub fn geometry(&self) -> ShapeGeometry {
        self.geometry_with(false)
    }

    /// Line width and fill mode after the degenerate-shape clamp: a border
    /// wider than the half-extent collapses to [`MIN_BORDER_WIDTH`] and the
    /// shape is drawn outlined and filled.
    pub fn effective_style(&self, half_extent: f64) -> (f64, FillMode) {
        if self.fill.outlines() && self.line_width > half_extent {
            (MIN_BORDER_WIDTH, FillMode::OutlineFill)
        } else {
            (self.line_width, self.fill)
        }
    }

    fn outline(&self, width: f64) -> StrokeParams {
        StrokeParams::new(self.secondary, width)
            .with_cap(LineCap::Butt)
            .with_join(LineJoin::Miter)
    }

    fn paint(&self, surface: &mut dyn DrawingSurface, path: &BezPath, width: f64, mode: FillMode) {
        if mode.fills() {
            surface.fill_path(path, self.primary);
        }
        if mode.outlines() {
            surface.stroke_path(path, &self.outline(width));
        }
    }
}

macro_rules! shape_command {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            params: ShapeParams,
        }

        impl $name {
            pub fn new(params: ShapeParams) -> Self {
                Self { params }
            }

            pub fn params(&self) -> &ShapeParams {
                &self.params
            }

            /// Re-snapshot from the tool's in-progress shape.
            pub fn set_values(&mut self, tool: &ShapeTool) {
                self.params.clone_from(tool.params());
            }
        }
    };
}

shape_command! {
    /// An axis-aligned rectangle (or square when aspect locked).
    RectangleCommand
}

shape_command! {
    /// An axis-aligned ellipse (or circle when aspect locked).
    EllipseCommand
}

impl DrawCommand for RectangleCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        let geom = self.params.geometry();
        let (width, mode) = self.params.effective_style(geom.radii.x.min(geom.radii.y));
        let inset = if mode.outlines() { width / 2.0 } else { 0.0 };
        let rect = geom.bounds.inflate(-inset, -inset).abs();
        self.params.paint(surface, &rect.to_path(PATH_TOLERANCE), width, mode);
    }
}

impl DrawCommand for EllipseCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        let geom = self.params.geometry();
        let (width, mode) = self.params.effective_style(geom.radii.x.min(geom.radii.y));
        let inset = if mode.outlines() { width / 2.0 } else { 0.0 };
        let radii = Vec2::new((geom.radii.x - inset).max(0.0), (geom.radii.y - inset).max(0.0));
        let ellipse = kurbo::Ellipse::new(geom.center, radii, 0.0);
        self.params.paint(surface, &ellipse.to_path(PATH_TOLERANCE), width, mode);
    }
}

/// Smallest and largest number of polygon sides.
pub const POLYGON_SIDES: std::ops::RangeInclusive<u32> = 3..=12;

/// A regular polygon inscribed in the circle of the square drag box.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCommand {
    params: ShapeParams,
    sides: u32,
}

impl PolygonCommand {
    pub fn new(params: ShapeParams, sides: u32) -> Self {
        Self {
            params,
            sides: sides.clamp(*POLYGON_SIDES.start(), *POLYGON_SIDES.end()),
        }
    }

    pub fn params(&self) -> &ShapeParams {
        &self.params
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn set_values(&mut self, tool: &ShapeTool) {
        self.params.clone_from(tool.params());
        self.sides = tool.sides();
    }

    /// Polygon vertices, first one pointing straight up.
    pub fn vertices(&self, radius: f64) -> Vec<Point> {
        let center = self.params.geometry_with(true).center;
        let n = self.sides as f64;
        (0..self.sides)
            .map(|k| {
                let angle = -PI / 2.0 + k as f64 * 2.0 * PI / n;
                Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect()
    }
}

impl DrawCommand for PolygonCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        let geom = self.params.geometry_with(true);
        let radius = geom.radii.x;
        let (width, mode) = self.params.effective_style(radius);
        // Shrinking the circumradius by (w/2)/cos(pi/n) moves every edge in by w/2.
        let inset = if mode.outlines() {
            (width / 2.0) / (PI / self.sides as f64).cos()
        } else {
            0.0
        };
        let vertices = self.vertices((radius - inset).max(0.0));
        let mut path = super::polyline(&vertices);
        path.close_path();
        self.params.paint(surface, &path, width, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    fn params(start: (f64, f64), end: (f64, f64)) -> ShapeParams {
        ShapeParams {
            start: Point::new(start.0, start.1),
            end: Point::new(end.0, end.1),
            line_width: 4.0,
            primary: Rgba::white(),
            secondary: Rgba::black(),
            ..ShapeParams::default()
        }
    }

    #[test]
    fn test_geometry_from_reversed_corners() {
        let geom = params((100.0, 80.0), (20.0, 0.0)).geometry();
        assert_eq!(geom.bounds, Rect::new(20.0, 0.0, 100.0, 80.0));
        assert_eq!(geom.center, Point::new(60.0, 40.0));
        assert_eq!(geom.radii, Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_aspect_lock_takes_shorter_side_towards_end() {
        let mut p = params((50.0, 50.0), (0.0, 130.0));
        p.aspect_locked = true;
        let geom = p.geometry();
        assert_eq!(geom.bounds, Rect::new(0.0, 50.0, 50.0, 100.0));
        assert!((geom.bounds.width() - geom.bounds.height()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fill_modes_emit_expected_ops() {
        let mut p = params((0.0, 0.0), (40.0, 20.0));
        for (mode, fills, strokes) in [
            (FillMode::Fill, 1, 0),
            (FillMode::Outline, 0, 1),
            (FillMode::OutlineFill, 1, 1),
        ] {
            p.fill = mode;
            let mut surface = RecordingSurface::new(50, 50);
            RectangleCommand::new(p.clone()).execute(&mut surface);
            let f = surface.ops().iter().filter(|op| matches!(op, SurfaceOp::Fill { .. })).count();
            let s = surface.ops().iter().filter(|op| matches!(op, SurfaceOp::Stroke { .. })).count();
            assert_eq!((f, s), (fills, strokes), "{mode:?}");
        }
    }

    #[test]
    fn test_outline_is_inset_by_half_width() {
        let mut p = params((0.0, 0.0), (40.0, 20.0));
        p.fill = FillMode::Outline;
        let mut surface = RecordingSurface::new(50, 50);
        RectangleCommand::new(p).execute(&mut surface);
        match &surface.ops()[0] {
            SurfaceOp::Stroke { path, stroke } => {
                assert_eq!(path.bounding_box(), Rect::new(2.0, 2.0, 38.0, 18.0));
                assert_eq!(stroke.color, Rgba::black());
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_shape_clamps_border() {
        let mut p = params((0.0, 0.0), (6.0, 6.0));
        p.fill = FillMode::Outline;
        p.line_width = 10.0;
        assert_eq!(p.effective_style(3.0), (MIN_BORDER_WIDTH, FillMode::OutlineFill));

        let mut surface = RecordingSurface::new(10, 10);
        EllipseCommand::new(p).execute(&mut surface);
        assert_eq!(surface.ops().len(), 2);
        match &surface.ops()[1] {
            SurfaceOp::Stroke { stroke, .. } => assert_eq!(stroke.width, MIN_BORDER_WIDTH),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_fill_only_is_not_clamped() {
        let mut p = params((0.0, 0.0), (2.0, 2.0));
        p.fill = FillMode::Fill;
        p.line_width = 50.0;
        assert_eq!(p.effective_style(1.0), (50.0, FillMode::Fill));
    }

    #[test]
    fn test_polygon_vertices() {
        let polygon = PolygonCommand::new(params((0.0, 0.0), (100.0, 100.0)), 4);
        let v = polygon.vertices(50.0);
        assert_eq!(v.len(), 4);
        assert!((v[0].x - 50.0).abs() < 1e-9);
        assert!(v[0].y.abs() < 1e-9);
        assert!((v[1].x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_sides_clamped() {
        assert_eq!(PolygonCommand::new(ShapeParams::default(), 1).sides(), 3);
        assert_eq!(PolygonCommand::new(ShapeParams::default(), 40).sides(), 12);
    }

    #[test]
    fn test_execute_is_deterministic() {
        let command = EllipseCommand::new(params((3.0, 7.0), (90.0, 41.0)));
        let mut a = RecordingSurface::new(100, 100);
        let mut b = RecordingSurface::new(100, 100);
        command.execute(&mut a);
        command.execute(&mut b);
        assert_eq!(a.ops(), b.ops());
    }
}
