//! [`DrawingSurface`] on a `tiny-skia` pixmap.

use crate::error::{RenderError, RenderResult};
use crate::fonts::FontBook;
use crate::image_io::encode_png;
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape};
use polydraw_core::surface::{FALLBACK_GLYPH_ADVANCE, PATH_TOLERANCE};
use polydraw_core::{DrawingSurface, FontSpec, LineCap, LineJoin, RasterImage, Rgba, StrokeParams};
use rusttype::{OutlineBuilder, Scale, point as rt_point};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash,
    Transform,
};

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn to_skia_stroke(stroke: &StrokeParams) -> Stroke {
    Stroke {
        width: stroke.width as f32,
        line_cap: match stroke.cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        },
        line_join: match stroke.join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        },
        dash: stroke
            .dash
            .and_then(|(on, off)| StrokeDash::new(vec![on as f32, off as f32], 0.0)),
        ..Stroke::default()
    }
}

fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn is_pixel_aligned(affine: Affine) -> bool {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0 && e.fract() == 0.0 && f.fract() == 0.0
}

fn to_pixmap(image: &RasterImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.data().chunks_exact(4)) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Some(pixmap)
}

/// Collects rusttype glyph outlines into a tiny-skia path.
struct GlyphPathBuilder(PathBuilder);

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

/// A CPU raster surface.
pub struct SkiaSurface {
    pixmap: Pixmap,
    background: Rgba,
    fonts: FontBook,
    /// Coverage mask for the active clip rectangle.
    clip: Option<(Rect, Mask)>,
}

impl std::fmt::Debug for SkiaSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkiaSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("background", &self.background)
            .field("fonts", &self.fonts)
            .field("clip", &self.clip.as_ref().map(|(rect, _)| rect))
            .finish()
    }
}

impl SkiaSurface {
    /// A surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> RenderResult<Self> {
        let mut pixmap = Pixmap::new(width.max(1), height.max(1)).ok_or(RenderError::SurfaceAlloc { width, height })?;
        pixmap.fill(tiny_skia::Color::from_rgba8(background.r, background.g, background.b, background.a));
        Ok(Self {
            pixmap,
            background,
            fonts: FontBook::None,
            clip: None,
        })
    }

    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn set_fonts(&mut self, fonts: FontBook) {
        self.fonts = fonts;
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Draw `overlay` on top of this surface at the origin.
    pub fn composite(&mut self, overlay: &SkiaSurface) {
        self.pixmap.draw_pixmap(
            0,
            0,
            overlay.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// The surface content as PNG bytes.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        encode_png(&self.snapshot())
    }

    fn fill_background(&mut self) {
        let bg = self.background;
        self.pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
    }
}

impl DrawingSurface for SkiaSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn background(&self) -> Rgba {
        self.background
    }

    fn resize(&mut self, width: u32, height: u32) {
        match Pixmap::new(width.max(1), height.max(1)) {
            Some(pixmap) => self.pixmap = pixmap,
            None => log::warn!("Resize to {width}x{height} ignored: allocation failed"),
        }
        self.clip = None;
        self.fill_background();
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip.and_then(|rect| {
            let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
            // An empty rectangle leaves the mask blank and keeps nothing.
            if let Some(path) = to_skia_path(&rect.abs().to_path(PATH_TOLERANCE)) {
                mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
            }
            Some((rect, mask))
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba) {
        if let Some(path) = to_skia_path(path) {
            let mask = self.clip.as_ref().map(|(_, mask)| mask);
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), mask);
        }
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeParams) {
        if let Some(path) = to_skia_path(path) {
            self.pixmap.stroke_path(
                &path,
                &paint(stroke.color),
                &to_skia_stroke(stroke),
                Transform::identity(),
                self.clip.as_ref().map(|(_, mask)| mask),
            );
        }
    }

    fn draw_image(&mut self, image: &RasterImage, transform: Affine) {
        let Some(source) = to_pixmap(image) else {
            log::trace!("Skipped drawing an empty image");
            return;
        };
        let quality = if is_pixel_aligned(transform) {
            FilterQuality::Nearest
        } else {
            FilterQuality::Bilinear
        };
        let paint = PixmapPaint {
            quality,
            ..PixmapPaint::default()
        };
        let mask = self.clip.as_ref().map(|(_, mask)| mask);
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, to_skia_transform(transform), mask);
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Rgba) {
        let Some(face) = self.fonts.resolve(font) else {
            log::warn!("Text '{text}' not drawn: no font available");
            return;
        };
        let scale = Scale::uniform(font.size as f32);
        let start = rt_point(origin.x as f32, origin.y as f32);
        let mut builder = GlyphPathBuilder(PathBuilder::new());
        for glyph in face.layout(text, scale, start) {
            glyph.build_outline(&mut builder);
        }
        if let Some(path) = builder.0.finish() {
            let mask = self.clip.as_ref().map(|(_, mask)| mask);
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), mask);
        }
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> f64 {
        match self.fonts.resolve(font) {
            Some(face) => {
                let scale = Scale::uniform(font.size as f32);
                face.layout(text, scale, rt_point(0.0, 0.0))
                    .last()
                    .map_or(0.0, |g| {
                        (g.position().x + g.unpositioned().h_metrics().advance_width) as f64
                    })
            }
            None => FALLBACK_GLYPH_ADVANCE * font.size * text.chars().count() as f64,
        }
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let px = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(px.red(), px.green(), px.blue(), px.alpha()))
    }

    fn read_region(&self, rect: Rect) -> RasterImage {
        let rect = rect.abs().round();
        let width = rect.width().max(0.0) as u32;
        let height = rect.height().max(0.0) as u32;
        let mut out = RasterImage::new(width, height);
        for dy in 0..height {
            for dx in 0..width {
                let sx = rect.x0 as i64 + dx as i64;
                let sy = rect.y0 as i64 + dy as i64;
                if sx < 0 || sy < 0 {
                    continue;
                }
                if let Some(px) = self.pixel(sx as u32, sy as u32) {
                    out.set_pixel(dx, dy, px);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Line, Shape as KurboShape};
    use polydraw_core::{DrawCommand, UndoRedo};
    use polydraw_core::commands::{PencilCommand, ResizeCanvasCommand};

    const RED: Rgba = Rgba::new(255, 0, 0, 255);

    fn surface(width: u32, height: u32) -> SkiaSurface {
        SkiaSurface::new(width, height, Rgba::white()).unwrap()
    }

    #[test]
    fn test_new_is_background() {
        let s = surface(4, 3);
        assert_eq!((s.width(), s.height()), (4, 3));
        assert_eq!(s.pixel(3, 2), Some(Rgba::white()));
        assert_eq!(s.pixel(4, 0), None);
    }

    #[test]
    fn test_clear_then_resize() {
        let mut s = surface(4, 4);
        s.clear();
        assert_eq!(s.pixel(0, 0), Some(Rgba::transparent()));
        s.resize(8, 2);
        assert_eq!((s.width(), s.height()), (8, 2));
        assert_eq!(s.pixel(7, 1), Some(Rgba::white()));
    }

    #[test]
    fn test_fill_rect_pixels() {
        let mut s = surface(10, 10);
        s.fill_rect(Rect::new(2.0, 2.0, 6.0, 6.0), RED);
        assert_eq!(s.pixel(3, 3), Some(RED));
        assert_eq!(s.pixel(5, 5), Some(RED));
        assert_eq!(s.pixel(6, 6), Some(Rgba::white()));
        assert_eq!(s.pixel(1, 3), Some(Rgba::white()));
    }

    #[test]
    fn test_stroke_covers_line() {
        let mut s = surface(20, 20);
        let path = Line::new((0.0, 10.0), (20.0, 10.0)).to_path(0.1);
        s.stroke_path(&path, &StrokeParams::new(RED, 4.0).with_cap(LineCap::Butt));
        assert_eq!(s.pixel(10, 9), Some(RED));
        assert_eq!(s.pixel(10, 10), Some(RED));
        assert_eq!(s.pixel(10, 14), Some(Rgba::white()));
    }

    #[test]
    fn test_draw_image_translated() {
        let mut s = surface(10, 10);
        let mut image = RasterImage::filled(2, 2, RED);
        image.set_pixel(1, 1, Rgba::black());
        s.draw_image(&image, Affine::translate((3.0, 4.0)));
        assert_eq!(s.pixel(3, 4), Some(RED));
        assert_eq!(s.pixel(4, 5), Some(Rgba::black()));
        assert_eq!(s.pixel(5, 5), Some(Rgba::white()));
    }

    #[test]
    fn test_read_region_pads_outside() {
        let mut s = surface(4, 4);
        s.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), RED);
        let region = s.read_region(Rect::new(-1.0, -1.0, 2.0, 2.0));
        assert_eq!((region.width(), region.height()), (3, 3));
        assert_eq!(region.pixel(0, 0), Some(Rgba::transparent()));
        assert_eq!(region.pixel(1, 1), Some(RED));
        assert_eq!(s.snapshot().pixel(3, 3), Some(Rgba::white()));
    }

    #[test]
    fn test_text_without_font() {
        let mut s = surface(50, 20);
        let font = FontSpec {
            size: 10.0,
            ..FontSpec::default()
        };
        assert_eq!(s.measure_text("abcd", &font), 24.0);
        let before = s.snapshot();
        s.fill_text("abcd", Point::new(0.0, 15.0), &font, RED);
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_clip_limits_drawing() {
        let mut s = surface(10, 10);
        s.set_clip(Some(Rect::new(0.0, 0.0, 5.0, 10.0)));
        s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), RED);
        assert_eq!(s.pixel(2, 5), Some(RED));
        assert_eq!(s.pixel(7, 5), Some(Rgba::white()));

        s.set_clip(None);
        s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), RED);
        assert_eq!(s.pixel(7, 5), Some(RED));
    }

    #[test]
    fn test_resize_lifts_clip() {
        let mut s = surface(10, 10);
        s.set_clip(Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
        s.resize(20, 20);
        s.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), RED);
        assert_eq!(s.pixel(15, 15), Some(RED));
    }

    #[test]
    fn test_composite_overlay() {
        let mut base = surface(4, 4);
        let mut overlay = surface(4, 4);
        overlay.clear();
        overlay.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), RED);
        base.composite(&overlay);
        assert_eq!(base.pixel(0, 0), Some(RED));
        assert_eq!(base.pixel(2, 2), Some(Rgba::white()));
    }

    #[test]
    fn test_undo_restores_pixels() {
        let mut s = surface(30, 30);
        let mut history = UndoRedo::new(30, 30);
        history.refresh(&mut s);
        let blank = s.snapshot();

        let stroke = PencilCommand::new(vec![Point::new(5.0, 15.0), Point::new(25.0, 15.0)], RED, 4.0);
        history.execute_command(stroke, &mut s);
        assert_eq!(s.pixel(15, 15), Some(RED));
        let drawn = s.snapshot();

        assert!(history.undo(&mut s));
        assert_eq!(s.snapshot(), blank);
        assert!(history.redo(&mut s));
        assert_eq!(s.snapshot(), drawn);
    }

    #[test]
    fn test_resize_command_sets_background() {
        let mut s = surface(5, 5);
        s.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), RED);
        s.clear();
        ResizeCanvasCommand::new(6, 6).execute(&mut s);
        assert_eq!(s.pixel(5, 5), Some(Rgba::white()));
    }

    #[test]
    fn test_png_export_decodes() {
        let mut s = surface(3, 3);
        s.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), RED);
        let image = crate::decode_png(&s.to_png().unwrap()).unwrap();
        assert_eq!(image.pixel(1, 1), Some(RED));
        assert_eq!(image.pixel(0, 0), Some(Rgba::white()));
    }
}
