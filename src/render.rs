//! Badge rendering: `BadgeSpec` → vector document.
//!
//! The renderer is a pure mapping. Layers are composed in a fixed z-order:
//! background fill or gradient, optional background image, pattern, photo
//! placeholder, profile picture (desaturated, clipped), frame decorations,
//! identity block, optional organization block, divider, brand block, and
//! finally the scannable-code slot in the bottom-right corner.

use log::warn;

use crate::document::{Document, Element};
use crate::pattern;
use crate::qr;
use crate::spec::BadgeSpec;

/// Logical canvas width.
pub const BADGE_WIDTH: u32 = 1080;
/// Logical canvas height.
pub const BADGE_HEIGHT: u32 = 1600;
/// Side length of the square photo region at (60, 60).
pub const PHOTO_SIZE: u32 = 960;

/// Side length of the scannable-code slot.
const QR_SIZE: u32 = 120;
/// Flat fill for the photo region when no picture is supplied.
const PHOTO_PLACEHOLDER_FILL: &str = "#E5E5E5";

const FONT_SANS: &str = "'Geist', 'Geist Mono', monospace";
const FONT_MONO: &str = "'Geist Mono', monospace";

// ============================================================================
// Name sizing
// ============================================================================

/// Step function mapping a name's character count to its font size.
///
/// Thresholds are exact: up to 8 characters renders at 72, 9-12 at 64, and
/// 13 or more at 52.
pub fn name_font_size(name: &str) -> u32 {
    let len = name.chars().count();
    if len > 12 {
        52
    } else if len > 8 {
        64
    } else {
        72
    }
}

// ============================================================================
// RenderedBadge
// ============================================================================

/// Output of the renderer: the badge document plus the QR target it encoded.
///
/// Profile pictures and background images stay as external references until
/// the exporter's inlining pass; the QR code (when present) is already an
/// inline data URI.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBadge {
    /// The badge as a vector document, 1080x1600 logical units.
    pub document: Document,
    /// The URL encoded into the scannable code, if one was produced.
    pub qr_url: Option<String>,
}

impl RenderedBadge {
    /// Returns the image references that still point at external resources.
    pub fn external_image_refs(&self) -> Vec<&str> {
        self.document.external_image_hrefs()
    }
}

// ============================================================================
// BadgeRenderer
// ============================================================================

/// Renders [`BadgeSpec`]s into badge documents.
///
/// The origin URL is injected here rather than read from the environment; it
/// anchors the default QR target `{origin}/p/{number}`.
///
/// # Example
///
/// ```
/// use badge_renderer::{BadgeRenderer, BadgeSpec};
///
/// let renderer = BadgeRenderer::new("https://badges.example");
/// let badge = renderer.render(&BadgeSpec::new("#007", "Sam", "Engineer"));
///
/// assert_eq!(badge.qr_url.as_deref(), Some("https://badges.example/p/007"));
/// ```
#[derive(Debug, Clone)]
pub struct BadgeRenderer {
    origin: String,
}

impl BadgeRenderer {
    /// Creates a renderer anchored at the given origin URL.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the QR target URL for a spec: the explicit override if set,
    /// otherwise `{origin}/p/{badge number}` with the leading `#` stripped.
    pub fn qr_target_url(&self, spec: &BadgeSpec) -> String {
        match &spec.qr_code_url {
            Some(url) => url.clone(),
            None => format!(
                "{}/p/{}",
                self.origin,
                spec.badge_number.trim_start_matches('#')
            ),
        }
    }

    /// Renders a badge document from the spec.
    ///
    /// Deterministic for a given input. A QR encoding failure downgrades to a
    /// badge without the scannable slot; it never fails the render.
    pub fn render(&self, spec: &BadgeSpec) -> RenderedBadge {
        let colors = &spec.colors;
        let branding = &spec.branding;
        let background = &spec.background;
        let mut doc = Document::new(BADGE_WIDTH as f32, BADGE_HEIGHT as f32);

        let full_name = match &spec.last_name {
            Some(last) => format!("{} {}", spec.first_name, last),
            None => spec.first_name.clone(),
        };
        doc.push(Element::new("title").text(format!("{} - {} Badge", full_name, branding.title)));

        // defs: grayscale filter, clip paths, optional gradient
        let mut defs = Element::new("defs")
            .child(
                Element::new("filter").attr("id", "grayscale").child(
                    Element::new("feColorMatrix").attr("type", "matrix").attr(
                        "values",
                        "0.33 0.33 0.33 0 0 \
                         0.33 0.33 0.33 0 0 \
                         0.33 0.33 0.33 0 0 \
                         0 0 0 1 0",
                    ),
                ),
            )
            .child(
                Element::new("clipPath").attr("id", "photoClip").child(
                    Element::new("rect")
                        .attr("x", 60)
                        .attr("y", 60)
                        .attr("width", PHOTO_SIZE)
                        .attr("height", PHOTO_SIZE),
                ),
            )
            .child(
                Element::new("clipPath").attr("id", "bgClip").child(
                    Element::new("rect")
                        .attr("width", BADGE_WIDTH)
                        .attr("height", BADGE_HEIGHT),
                ),
            );

        if background.has_gradient() {
            let stop_count = background.gradient.len();
            let mut gradient = Element::new("linearGradient")
                .attr("id", "badgeGradient")
                .attr("x1", "0%")
                .attr("y1", "0%")
                .attr("x2", "100%")
                .attr("y2", "100%")
                .attr(
                    "gradientTransform",
                    format!("rotate({}, 0.5, 0.5)", background.gradient_angle),
                );
            for (i, color) in background.gradient.iter().enumerate() {
                let offset = i as f32 / (stop_count - 1) as f32 * 100.0;
                gradient = gradient.child(
                    Element::new("stop")
                        .attr("offset", format!("{offset}%"))
                        .attr("stop-color", color),
                );
            }
            defs = defs.child(gradient);
        }
        doc.push(defs);

        // 1. Solid background or gradient fill.
        let fill = if background.has_gradient() {
            "url(#badgeGradient)".to_string()
        } else {
            colors.surface.clone()
        };
        doc.push(
            Element::new("rect")
                .attr("width", BADGE_WIDTH)
                .attr("height", BADGE_HEIGHT)
                .attr("fill", fill),
        );

        // 2. Optional background image.
        if let Some(image_url) = &background.image_url {
            doc.push(
                Element::new("image")
                    .attr("href", image_url)
                    .attr("x", 0)
                    .attr("y", 0)
                    .attr("width", BADGE_WIDTH)
                    .attr("height", BADGE_HEIGHT)
                    .attr("preserveAspectRatio", "xMidYMid slice")
                    .attr("opacity", background.image_opacity),
            );
        }

        // 3. Background pattern.
        let pattern_color = background
            .pattern_color
            .as_deref()
            .unwrap_or(&colors.on_surface);
        if let Some(layer) =
            pattern::group(background.pattern, pattern_color, background.pattern_opacity)
        {
            doc.push(layer);
        }

        // 4. Photo region placeholder.
        doc.push(
            Element::new("rect")
                .attr("x", 60)
                .attr("y", 60)
                .attr("width", PHOTO_SIZE)
                .attr("height", PHOTO_SIZE)
                .attr("fill", PHOTO_PLACEHOLDER_FILL),
        );

        // 5. Profile picture, desaturated and clipped to the photo region.
        if let Some(picture) = &spec.profile_picture_url {
            doc.push(
                Element::new("image")
                    .attr("href", picture)
                    .attr("x", 60)
                    .attr("y", 60)
                    .attr("width", PHOTO_SIZE)
                    .attr("height", PHOTO_SIZE)
                    .attr("filter", "url(#grayscale)")
                    .attr("preserveAspectRatio", "xMidYMid slice")
                    .attr("clip-path", "url(#photoClip)"),
            );
        }

        // 6. L-bracket frame.
        doc.push(
            Element::new("path")
                .attr("d", "M60 1020 L60 1260 L200 1260")
                .attr("fill", "none")
                .attr("stroke", &colors.on_surface)
                .attr("stroke-width", 16),
        );

        // 7. Identity block.
        doc.push(
            text(100, 1080, &colors.muted, 28, FONT_MONO)
                .attr("letter-spacing", "0.15em")
                .text(&spec.badge_number),
        );
        doc.push(
            text(100, 1160, &colors.on_surface, name_font_size(&spec.first_name), FONT_SANS)
                .attr("font-weight", 700)
                .attr("letter-spacing", "-0.02em")
                .text(spec.first_name.to_uppercase()),
        );
        if let Some(last) = &spec.last_name {
            doc.push(
                text(100, 1240, &colors.on_surface, name_font_size(last), FONT_SANS)
                    .attr("font-weight", 700)
                    .attr("letter-spacing", "-0.02em")
                    .text(last.to_uppercase()),
            );
        }
        let role_y = if spec.last_name.is_some() { 1300 } else { 1220 };
        doc.push(
            text(100, role_y, &colors.muted, 24, FONT_MONO)
                .attr("letter-spacing", "0.1em")
                .text(format!("→ {}", spec.job_title.to_uppercase())),
        );

        // 8. Organization block, omitted entirely when neither a name nor a
        // logo was supplied.
        if branding.has_organization_block() {
            let mut block = Element::new("g").attr("transform", "translate(1020, 1060)");
            if let Some(logo) = &branding.logo {
                block = block.raw_markup(logo);
            }
            if let Some(name) = &branding.organization_name {
                block = block.child(
                    text(0, 60, &colors.muted, 20, FONT_MONO)
                        .attr("letter-spacing", "0.1em")
                        .attr("text-anchor", "end")
                        .text(name.to_uppercase()),
                );
                if let Some(subtitle) = &branding.organization_subtitle {
                    block = block.child(
                        text(0, 88, &colors.on_surface, 20, FONT_MONO)
                            .attr("font-weight", 700)
                            .attr("letter-spacing", "0.1em")
                            .attr("text-anchor", "end")
                            .text(subtitle.to_uppercase()),
                    );
                }
            }
            doc.push(block);
        }

        // 9. Divider.
        doc.push(
            Element::new("line")
                .attr("x1", 60)
                .attr("y1", 1360)
                .attr("x2", 1020)
                .attr("y2", 1360)
                .attr("stroke", &colors.on_surface)
                .attr("stroke-width", 2),
        );

        // 10. Brand block with accent square.
        doc.push(
            text(100, 1460, &colors.on_surface, 56, FONT_SANS)
                .attr("font-weight", 700)
                .attr("letter-spacing", "-0.02em")
                .text(&branding.title),
        );
        doc.push(
            Element::new("rect")
                .attr("x", 460)
                .attr("y", 1418)
                .attr("width", 48)
                .attr("height", 48)
                .attr("fill", &colors.accent),
        );
        doc.push(
            text(100, 1520, &colors.muted, 20, FONT_MONO)
                .attr("letter-spacing", "0.2em")
                .text(&branding.subtitle),
        );

        // 11. Scannable code, bottom right. Encoding failure omits the slot.
        let qr_url = self.qr_target_url(spec);
        let qr_url = match qr::data_uri(&qr_url, &colors.on_surface, &colors.surface) {
            Ok(data) => {
                doc.push(
                    Element::new("image")
                        .attr("href", data)
                        .attr("x", 900)
                        .attr("y", 1420)
                        .attr("width", QR_SIZE)
                        .attr("height", QR_SIZE),
                );
                Some(qr_url)
            }
            Err(err) => {
                warn!("omitting scannable code for {}: {err}", spec.badge_number);
                None
            }
        };

        // Corner accents: top corners of the canvas frame and bottom corners
        // of the photo region.
        for (x, y, w, h) in [
            (60, 60, 8, 40),
            (60, 60, 40, 8),
            (1012, 60, 8, 40),
            (980, 60, 40, 8),
            (60, 980, 8, 40),
            (60, 1012, 40, 8),
            (1012, 980, 8, 40),
            (980, 1012, 40, 8),
        ] {
            doc.push(
                Element::new("rect")
                    .attr("x", x)
                    .attr("y", y)
                    .attr("width", w)
                    .attr("height", h)
                    .attr("fill", &colors.accent),
            );
        }

        RenderedBadge {
            document: doc,
            qr_url,
        }
    }
}

fn text(x: i32, y: i32, fill: &str, size: u32, family: &str) -> Element {
    Element::new("text")
        .attr("x", x)
        .attr("y", y)
        .attr("fill", fill)
        .attr("font-size", size)
        .attr("font-family", family)
}

// ============================================================================
// Tests
// ============================================================================
