//! Move, resize or delete a captured region.

use super::DrawCommand;
use crate::color::RasterImage;
use crate::surface::DrawingSurface;
use kurbo::{Affine, Rect};

/// A region lifted from the canvas and dropped somewhere else.
///
/// The source area is painted over with the background, then the captured
/// pixels are drawn scaled into the destination box (mirrored on each flipped
/// axis). Without a destination the region is simply deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCommand {
    source: Rect,
    image: RasterImage,
    destination: Option<Rect>,
    flip_x: bool,
    flip_y: bool,
}

impl SelectionCommand {
    pub fn moved(source: Rect, image: RasterImage, destination: Rect) -> Self {
        Self {
            source,
            image,
            destination: Some(destination),
            flip_x: false,
            flip_y: false,
        }
    }

    pub fn deleted(source: Rect, image: RasterImage) -> Self {
        Self {
            source,
            image,
            destination: None,
            flip_x: false,
            flip_y: false,
        }
    }

    pub fn with_flip(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    pub fn source(&self) -> Rect {
        self.source
    }

    pub fn destination(&self) -> Option<Rect> {
        self.destination
    }

    /// Mirroring on the (horizontal, vertical) axes.
    pub fn flipped(&self) -> (bool, bool) {
        (self.flip_x, self.flip_y)
    }

    /// Mapping from captured pixels into the destination box.
    pub fn placement(&self, destination: Rect) -> Affine {
        placement(&self.image, destination, self.flip_x, self.flip_y)
    }
}

/// Scale `image` into `destination`, mirrored on each flipped axis.
pub fn placement(image: &RasterImage, destination: Rect, flip_x: bool, flip_y: bool) -> Affine {
    let sx = destination.width() / image.width().max(1) as f64;
    let sy = destination.height() / image.height().max(1) as f64;
    let tx = if flip_x { destination.x1 } else { destination.x0 };
    let ty = if flip_y { destination.y1 } else { destination.y0 };
    Affine::translate((tx, ty)) * Affine::scale_non_uniform(if flip_x { -sx } else { sx }, if flip_y { -sy } else { sy })
}

impl DrawCommand for SelectionCommand {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        let background = surface.background();
        surface.fill_rect(self.source, background);
        if let Some(destination) = self.destination {
            if !self.image.is_empty() && destination.area() > 0.0 {
                surface.draw_image(&self.image, self.placement(destination));
            }
        }
    }
}
