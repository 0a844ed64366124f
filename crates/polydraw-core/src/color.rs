//! Color and raster image primitives.

use crate::error::EditorError;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Same color with the alpha channel replaced by `opacity` (0.0 - 1.0).
    pub fn with_alpha(self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// `#rrggbbaa` representation.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

/// An owned, non-premultiplied RGBA8 pixel buffer.
///
/// Used for loaded base images, stamps, selection captures and pixel
/// snapshots of a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Create a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Create an image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self { width, height, data }
    }

    /// Wrap an existing RGBA8 buffer. The buffer length must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EditorError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(EditorError::InvalidImage {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    /// Read one pixel; `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        Some(Rgba::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrite one pixel. Writes outside the image are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Copy out the pixels covered by `rect`, clipped to the image.
    /// Pixels outside the image come back transparent.
    pub fn crop(&self, rect: Rect) -> RasterImage {
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

    #[test]
    fn test_with_alpha() {
        let c = Rgba::new(10, 20, 30, 255).with_alpha(0.5);
        assert_eq!(c.a, 128);
        assert_eq!(c.r, 10);
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgba::new(255, 0, 16, 255).hex(), "#ff0010ff");
    }

    #[test]
    fn test_from_rgba_rejects_bad_length() {
        let err = RasterImage::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, EditorError::InvalidImage { expected: 16, actual: 15 }));
    }

    #[test]
    fn test_pixel_access() {
        let mut img = RasterImage::new(3, 2);
        img.set_pixel(2, 1, Rgba::white());
        assert_eq!(img.pixel(2, 1), Some(Rgba::white()));
        assert_eq!(img.pixel(0, 0), Some(Rgba::transparent()));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn test_crop_clips_to_image() {
        let mut img = RasterImage::filled(4, 4, Rgba::black());
        img.set_pixel(3, 3, Rgba::white());
        let cropped = img.crop(Rect::new(2.0, 2.0, 6.0, 6.0));
        assert_eq!(cropped.width(), 4);
        assert_eq!(cropped.pixel(1, 1), Some(Rgba::white()));
        assert_eq!(cropped.pixel(0, 0), Some(Rgba::black()));
        assert_eq!(cropped.pixel(3, 3), Some(Rgba::transparent()));
    }
}
