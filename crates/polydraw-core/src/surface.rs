//! The immediate-mode drawing surface that commands render into.
//!
//! A surface is a 2D pixel target with path fill/stroke, image blits and text.
//! The raster implementation lives in `polydraw-render`; [`RecordingSurface`]
//! is a pixel-free stand-in that logs every call.

use crate::color::{RasterImage, Rgba};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Path tolerance used when flattening kurbo shapes into paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Width ratio used by surfaces that cannot query font metrics.
pub const FALLBACK_GLYPH_ADVANCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Stroke state applied to a single `stroke_path` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeParams {
    pub color: Rgba,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    /// Dash pattern as (on, off) lengths.
    pub dash: Option<(f64, f64)>,
}

impl StrokeParams {
    pub fn new(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
            dash: None,
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn with_dash(mut self, on: f64, off: f64) -> Self {
        self.dash = Some((on, off));
        self
    }
}

/// Font attributes for text rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    /// Font size in pixels.
    pub size: f64,
    /// Family name, matched against installed fonts by the raster surface.
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size: 20.0,
            family: "sans-serif".to_string(),
            bold: false,
            italic: false,
        }
    }
}

/// A 2D immediate-mode drawing target.
///
/// All coordinates are in surface pixels with the origin at the top-left.
pub trait DrawingSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// The color the surface shows where nothing has been drawn.
    fn background(&self) -> Rgba;

    /// Change the surface dimensions. Existing content is discarded and the
    /// surface is filled with its background.
    fn resize(&mut self, width: u32, height: u32);

    /// Make every pixel fully transparent.
    fn clear(&mut self);

    /// Restrict later drawing to `clip`, or lift the restriction with `None`.
    /// Resizing the surface lifts it too.
    fn set_clip(&mut self, clip: Option<Rect>);

    fn fill_path(&mut self, path: &BezPath, color: Rgba);

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeParams);

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.fill_path(&rect.to_path(PATH_TOLERANCE), color);
    }

    /// Draw an image mapped through `transform` (image pixel space to surface).
    fn draw_image(&mut self, image: &RasterImage, transform: Affine);

    /// Draw one line of text with its baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Rgba);

    /// Horizontal advance of `text` in pixels.
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64;

    /// Read back a single pixel; `None` outside the surface.
    fn pixel(&self, x: u32, y: u32) -> Option<Rgba>;

    /// Copy out the pixels covered by `rect`.
    fn read_region(&self, rect: Rect) -> RasterImage;

    /// Copy out the whole surface.
    fn snapshot(&self) -> RasterImage {
        self.read_region(Rect::new(0.0, 0.0, self.width() as f64, self.height() as f64))
    }
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Resize { width: u32, height: u32 },
    Clear,
    Clip(Option<Rect>),
    Fill { path: BezPath, color: Rgba },
    Stroke { path: BezPath, stroke: StrokeParams },
    Image { width: u32, height: u32, transform: Affine },
    Text { text: String, origin: Point, font: FontSpec, color: Rgba },
}

/// A surface that records calls instead of rasterising them.
///
/// Pixel reads come from an explicit override table, falling back to the
/// background color, which is enough to drive the pipette and selection tools
/// without a rasteriser.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    background: Rgba,
    ops: Vec<SurfaceOp>,
    pixels: HashMap<(u32, u32), Rgba>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Rgba::white())
    }

    pub fn with_background(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            background,
            ops: Vec::new(),
            pixels: HashMap::new(),
        }
    }

    /// Every call recorded since creation or the last [`Self::take_ops`].
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Ops recorded after the most recent `Clear`.
    pub fn ops_since_clear(&self) -> &[SurfaceOp] {
        match self.ops.iter().rposition(|op| matches!(op, SurfaceOp::Clear)) {
            Some(i) => &self.ops[i + 1..],
            None => &self.ops,
        }
    }

    /// Force the color returned by [`DrawingSurface::pixel`] at one location.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        self.pixels.insert((x, y), color);
    }
}

impl DrawingSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn background(&self) -> Rgba {
        self.background
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.ops.push(SurfaceOp::Resize { width, height });
    }

    fn clear(&mut self) {
        self.pixels.clear();
        self.ops.push(SurfaceOp::Clear);
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.ops.push(SurfaceOp::Clip(clip));
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba) {
        self.ops.push(SurfaceOp::Fill {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeParams) {
        self.ops.push(SurfaceOp::Stroke {
            path: path.clone(),
            stroke: stroke.clone(),
        });
    }

    fn draw_image(&mut self, image: &RasterImage, transform: Affine) {
        self.ops.push(SurfaceOp::Image {
            width: image.width(),
            height: image.height(),
            transform,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Rgba) {
        self.ops.push(SurfaceOp::Text {
            text: text.to_string(),
            origin,
            font: font.clone(),
            color,
        });
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> f64 {
        FALLBACK_GLYPH_ADVANCE * font.size * text.chars().count() as f64
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels.get(&(x, y)).copied().unwrap_or(self.background))
    }

    fn read_region(&self, rect: Rect) -> RasterImage {
        let rect = rect.abs().round();
        let width = rect.width().max(0.0) as u32;
        let height = rect.height().max(0.0) as u32;
        let mut image = RasterImage::filled(width, height, self.background);
        for (&(x, y), &color) in &self.pixels {
            let (x, y) = (x as f64, y as f64);
            if x >= rect.x0 && x < rect.x1 && y >= rect.y0 && y < rect.y1 {
                image.set_pixel((x - rect.x0) as u32, (y - rect.y0) as u32, color);
            }
        }
        image
    }
}
