//! Scannable-code generation.
//!
//! Encodes a URL as a QR module matrix and rasterizes it to a small PNG,
//! returned as a `data:` URI ready to drop into an `image` element. The
//! output has zero quiet-zone margin; the badge layout provides its own
//! breathing room around the slot.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{Rgba, RgbaImage};
use qrcode::{Color, QrCode};
use std::io::Cursor;

use crate::error::QrError;

/// Pixels per QR module in the rasterized output.
const MODULE_SCALE: u32 = 4;

/// Encodes `text` as a QR code drawn in `dark` on `light` and returns it as
/// a PNG data URI.
///
/// Colors are hex strings (`#0A0A0A`); unparseable values fall back to black
/// and white. Fails only when `text` is empty or cannot be encoded; callers
/// are expected to omit the code rather than abort the surrounding render.
pub fn data_uri(text: &str, dark: &str, light: &str) -> Result<String, QrError> {
    if text.is_empty() {
        return Err(QrError::EmptyInput);
    }

    let code = QrCode::new(text.as_bytes()).map_err(QrError::Encode)?;
    let image = rasterize(&code, parse_color(dark, [0, 0, 0]), parse_color(light, [255, 255, 255]));

    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

fn rasterize(code: &QrCode, dark: Rgba<u8>, light: Rgba<u8>) -> RgbaImage {
    let modules = code.width() as u32;
    let size = modules * MODULE_SCALE;
    let mut img = RgbaImage::from_pixel(size, size, light);

    for y in 0..modules {
        for x in 0..modules {
            if code[(x as usize, y as usize)] == Color::Dark {
                for dy in 0..MODULE_SCALE {
                    for dx in 0..MODULE_SCALE {
                        img.put_pixel(x * MODULE_SCALE + dx, y * MODULE_SCALE + dy, dark);
                    }
                }
            }
        }
    }

    img
}

fn parse_color(hex: &str, fallback: [u8; 3]) -> Rgba<u8> {
    let rgb = hex
        .parse::<palette::Srgb<u8>>()
        .map(|c| [c.red, c.green, c.blue])
        .unwrap_or(fallback);
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}

// ============================================================================
// Tests
// ============================================================================
