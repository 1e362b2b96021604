//! Rasterization and pixel encoding for exported badges.
//!
//! The serialized document is parsed with usvg and drawn onto a tiny-skia
//! pixmap sized `logical x scale`; the draw transform is pre-scaled so the
//! document keeps using logical units. Encoding goes through the `image`
//! crate so PNG and JPEG share one code path.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::ExportError;
use super::{ExportFormat, ExportOptions};

/// Fill used when an opaque format is requested without an explicit
/// background color.
const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// Parses the serialized document and draws it at the requested scale.
pub(super) fn rasterize(
    svg: &str,
    width: f32,
    height: f32,
    options: &ExportOptions,
) -> Result<Pixmap, ExportError> {
    let mut usvg_options = Options::default();
    usvg_options.fontdb_mut().load_system_fonts();
    let tree =
        Tree::from_str(svg, &usvg_options).map_err(|e| ExportError::DecodeFailed(e.to_string()))?;

    let px_width = (width * options.scale).round().max(0.0) as u32;
    let px_height = (height * options.scale).round().max(0.0) as u32;
    let mut pixmap =
        Pixmap::new(px_width, px_height).ok_or(ExportError::RenderingUnavailable(px_width, px_height))?;

    // Opaque formats (and explicit requests) get a background fill before the
    // document is drawn; PNG otherwise stays transparent.
    if options.format.requires_opaque() || options.background_color.is_some() {
        let fill = options
            .background_color
            .as_deref()
            .unwrap_or(DEFAULT_BACKGROUND);
        let [r, g, b] = parse_fill(fill);
        pixmap.fill(Color::from_rgba8(r, g, b, 255));
    }

    let transform = Transform::from_scale(options.scale, options.scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap)
}

/// Encodes the pixmap to the requested format.
pub(super) fn encode(pixmap: &Pixmap, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let rgba = pixmap_to_rgba_image(pixmap);
    let mut buf = Vec::new();

    match options.format {
        ExportFormat::Png => {
            image::DynamicImage::ImageRgba8(rgba)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
        ExportFormat::Jpeg => {
            let quality = (options.quality.clamp(0.0, 1.0) * 100.0).round() as u8;
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            encoder.encode_image(&rgb)?;
        }
    }

    if buf.is_empty() {
        return Err(ExportError::EncodeFailed(image::ImageError::IoError(
            std::io::Error::other("encoder produced an empty buffer"),
        )));
    }
    Ok(buf)
}

fn parse_fill(hex: &str) -> [u8; 3] {
    hex.parse::<palette::Srgb<u8>>()
        .map(|c| [c.red, c.green, c.blue])
        .unwrap_or([255, 255, 255])
}

/// Converts a tiny-skia pixmap to an `image` RGBA buffer, unpremultiplying
/// the alpha channel on the way.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let (r, g, b, a) =
            unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect width="40" height="20" fill="#ff0000"/></svg>"##;

    #[test]
    fn rasterizes_at_scale() {
        let options = ExportOptions::default().with_scale(2.0);
        let pixmap = rasterize(SIMPLE_SVG, 40.0, 20.0, &options).unwrap();
        assert_eq!(pixmap.width(), 80);
        assert_eq!(pixmap.height(), 40);
    }

    #[test]
    fn invalid_markup_reports_decode_failure() {
        let options = ExportOptions::default();
        let err = rasterize("not svg at all", 10.0, 10.0, &options).unwrap_err();
        assert!(matches!(err, ExportError::DecodeFailed(_)));
    }

    #[test]
    fn jpeg_gets_default_background_fill() {
        let transparent = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4" viewBox="0 0 4 4"></svg>"##;
        let options = ExportOptions::default().with_format(ExportFormat::Jpeg);
        let pixmap = rasterize(transparent, 4.0, 4.0, &options).unwrap();
        let pixel = pixmap.pixels()[0];
        assert_eq!(
            (pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()),
            (255, 255, 255, 255)
        );
    }

    #[test]
    fn explicit_background_applies_to_png_too() {
        let transparent = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4" viewBox="0 0 4 4"></svg>"##;
        let options = ExportOptions::default().with_background_color("#00FF00");
        let pixmap = rasterize(transparent, 4.0, 4.0, &options).unwrap();
        let pixel = pixmap.pixels()[0];
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0, 255, 0));
    }

    #[test]
    fn encodes_png_with_correct_dimensions() {
        let options = ExportOptions::default().with_scale(2.0);
        let pixmap = rasterize(SIMPLE_SVG, 40.0, 20.0, &options).unwrap();
        let bytes = encode(&pixmap, &options).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 80);
        assert_eq!(decoded.height(), 40);
    }

    #[test]
    fn encodes_jpeg_at_requested_quality() {
        let options = ExportOptions::default()
            .with_format(ExportFormat::Jpeg)
            .with_quality(0.5);
        let pixmap = rasterize(SIMPLE_SVG, 40.0, 20.0, &options).unwrap();
        let bytes = encode(&pixmap, &options).unwrap();
        assert!(bytes.starts_with(&[0xff, 0xd8]));
    }

    #[test]
    fn unpremultiply_recovers_straight_alpha() {
        assert_eq!(unpremultiply(0, 0, 0, 0), (0, 0, 0, 0));
        assert_eq!(unpremultiply(128, 0, 32, 128), (255, 0, 64, 128));
    }
}
