//! Image stamp.

use super::DrawCommand;
use crate::color::RasterImage;
use crate::surface::DrawingSurface;
use crate::tools::StampTool;
use kurbo::{Affine, Point, Vec2};
use std::sync::Arc;

/// A stamp image placed at a centre point, scaled and rotated.
#[derive(Debug, Clone, PartialEq)]
pub struct StampCommand {
    image: Arc<RasterImage>,
    center: Point,
    scale: f64,
    /// Rotation in degrees, clockwise in screen space.
    angle: f64,
}

impl StampCommand {
    pub fn new(image: Arc<RasterImage>, center: Point, scale: f64, angle: f64) -> Self {
        Self {
            image,
            center,
            scale,
            angle,
        }
    }

    /// Snapshot the stamp tool. Returns `None` when no stamp image is set.
    pub fn from_tool(tool: &StampTool) -> Option<Self> {
        let image = tool.image()?;
        Some(Self::new(image, tool.position(), tool.scale(), tool.angle()))
    }

    pub fn set_values(&mut self, tool: &StampTool) {
        if let Some(image) = tool.image() {
            self.image = image;
        }
        self.center = tool.position();
        self.scale = tool.scale();
        self.angle = tool.angle();
    }

    /// Mapping from stamp image pixels to surface pixels.
    pub fn transform(&self) -> Affine {
        let half = Vec2::new(self.image.width() as f64 / 2.0, self.image.height() as f64 / 2.0);
        Affine::translate(self.center.to_vec2())
            * Affine::rotate(self.angle.to_radians())
            * Affine::scale(self.scale)
            * Affine::translate(-half)
    }
}

impl DrawCommand for StampCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        if self.image.is_empty() || self.scale <= 0.0 {
            return;
        }
        surface.draw_image(&self.image, self.transform());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    #[test]
    fn test_stamp_is_centered() {
        let command = StampCommand::new(Arc::new(RasterImage::new(10, 20)), Point::new(50.0, 50.0), 2.0, 0.0);
        let top_left = command.transform() * Point::ZERO;
        assert!((top_left.x - 40.0).abs() < 1e-9);
        assert!((top_left.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_keeps_center_fixed() {
        let command = StampCommand::new(Arc::new(RasterImage::new(10, 10)), Point::new(20.0, 20.0), 1.0, 90.0);
        let center = command.transform() * Point::new(5.0, 5.0);
        assert!((center.x - 20.0).abs() < 1e-9);
        assert!((center.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_image_draws_nothing() {
        let mut surface = RecordingSurface::new(10, 10);
        StampCommand::new(Arc::new(RasterImage::new(0, 0)), Point::ZERO, 1.0, 0.0).execute(&mut surface);
        assert!(surface.ops().is_empty());

        StampCommand::new(Arc::new(RasterImage::new(2, 2)), Point::ZERO, 1.0, 0.0).execute(&mut surface);
        assert!(matches!(surface.ops(), [SurfaceOp::Image { width: 2, height: 2, .. }]));
    }
}
