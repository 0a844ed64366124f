//! PNG encoding and decoding of [`RasterImage`]s.

use crate::error::{RenderError, RenderResult};
use polydraw_core::RasterImage;

/// Encode an image as an 8-bit RGBA PNG.
pub fn encode_png(image: &RasterImage) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.data())?;
    }
    log::debug!("Encoded {}x{} PNG: {} bytes", image.width(), image.height(), png_data.len());
    Ok(png_data)
}

/// Decode a PNG of any color type into RGBA8.
pub fn decode_png(bytes: &[u8]) -> RenderResult<RasterImage> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect(),
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(RenderError::Png("indexed PNG was not expanded".to_string()));
        }
    };
    RasterImage::from_rgba(info.width, info.height, rgba).map_err(|e| RenderError::Png(e.to_string()))
}
