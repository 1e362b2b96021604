//! Badge export: vector document → encoded image bytes.
//!
//! The exporter owns a snapshot of a rendered badge and turns it into bytes
//! in four steps: inline every external image reference (concurrently, with
//! per-image fallbacks), serialize the inlined document, rasterize it at the
//! requested scale, and encode to the requested format. The attached
//! document is never mutated, so a live preview holding the same badge is
//! unaffected by an in-flight export.
//!
//! # Example
//!
//! ```no_run
//! use badge_renderer::{
//!     BadgeExporter, BadgeRenderer, BadgeSpec, DirectorySaveTarget, ExportFormat, ExportOptions,
//! };
//!
//! # async fn demo() -> Result<(), badge_renderer::ExportError> {
//! let badge = BadgeRenderer::new("https://badges.example")
//!     .render(&BadgeSpec::new("#007", "Sam", "Engineer"));
//!
//! let mut exporter = BadgeExporter::new();
//! exporter.attach(&badge);
//!
//! let options = ExportOptions::default()
//!     .with_scale(2.0)
//!     .with_format(ExportFormat::Png);
//! let target = DirectorySaveTarget::new("out");
//! let saved = exporter.export_and_save(&target, Some("sam-badge"), &options).await?;
//! assert_eq!(saved.filename, "sam-badge.png");
//! # Ok(())
//! # }
//! ```

mod inline;
mod raster;

pub use inline::{FetchedImage, HttpFetcher, ImageFetcher, inline_images};

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ExportError;
use crate::render::RenderedBadge;

/// Base filename used when the caller does not supply one.
pub const DEFAULT_BASENAME: &str = "badge";

// ============================================================================
// Options
// ============================================================================

/// Output encodings the exporter supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension appended to derived filenames.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// True if the format cannot represent transparency and therefore needs
    /// a background fill.
    pub fn requires_opaque(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

/// Options for a single export run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Output scale factor relative to the logical canvas. Must be positive.
    pub scale: f32,
    /// Output encoding.
    pub format: ExportFormat,
    /// Encoder quality (0-1); ignored for lossless formats.
    pub quality: f32,
    /// Background fill; defaults to white when the format requires opacity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            format: ExportFormat::Png,
            quality: 0.9,
            background_color: None,
        }
    }
}

impl ExportOptions {
    /// Sets the scale factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the encoder quality.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the background fill color.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

// ============================================================================
// ExportedImage & save targets
// ============================================================================

/// The terminal export artifact: encoded bytes plus naming metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

/// Capability for persisting an exported image, so the export pipeline stays
/// platform-agnostic (filesystem here, download anchors or share sheets on
/// other hosts).
pub trait SaveTarget {
    fn save(&self, bytes: &[u8], filename: &str, mime_type: &str) -> std::io::Result<()>;
}

/// [`SaveTarget`] writing files into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&self, bytes: &[u8], filename: &str, _mime_type: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(filename), bytes)
    }
}

/// Derives the output filename: names already containing a `.` are used
/// verbatim, otherwise the format's extension is appended. `None` falls back
/// to [`DEFAULT_BASENAME`].
pub fn derive_filename(name: Option<&str>, format: ExportFormat) -> String {
    let name = name.unwrap_or(DEFAULT_BASENAME);
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{name}.{}", format.extension())
    }
}

// ============================================================================
// BadgeExporter
// ============================================================================

/// Exports rendered badges to encoded image bytes.
///
/// Generic over the [`ImageFetcher`] used by the inlining pass; defaults to
/// the HTTP-backed fetcher.
#[derive(Debug, Clone)]
pub struct BadgeExporter<F = HttpFetcher> {
    source: Option<Document>,
    fetcher: F,
}

impl BadgeExporter<HttpFetcher> {
    /// Creates an exporter with the default HTTP fetcher and no source
    /// attached.
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }
}

impl Default for BadgeExporter<HttpFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ImageFetcher> BadgeExporter<F> {
    /// Creates an exporter with a custom fetcher.
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            source: None,
            fetcher,
        }
    }

    /// Attaches a snapshot of the badge to export. The badge itself stays
    /// with the caller and can keep being displayed or re-rendered.
    pub fn attach(&mut self, badge: &RenderedBadge) {
        self.source = Some(badge.document.clone());
    }

    /// Drops the attached snapshot.
    pub fn detach(&mut self) {
        self.source = None;
    }

    /// True if a badge document is currently attached.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Runs the full export pipeline and returns the encoded bytes.
    ///
    /// Fails with [`ExportError::MissingSource`] before any work when no
    /// badge is attached, and with the documented taxonomy for the later
    /// stages. Per-image inlining failures degrade rather than fail; see
    /// [`inline_images`].
    pub async fn export(&self, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        let document = self.source.as_ref().ok_or(ExportError::MissingSource)?;
        if !(options.scale > 0.0) {
            return Err(ExportError::InvalidScale(options.scale));
        }

        let inlined = inline_images(document, &self.fetcher).await;
        let svg = inlined.to_svg();
        let pixmap = raster::rasterize(&svg, document.width(), document.height(), options)?;
        raster::encode(&pixmap, options)
    }

    /// Exports and wraps the bytes with MIME type and derived filename.
    pub async fn export_image(
        &self,
        filename: Option<&str>,
        options: &ExportOptions,
    ) -> Result<ExportedImage, ExportError> {
        let bytes = self.export(options).await?;
        Ok(ExportedImage {
            bytes,
            mime_type: options.format.mime_type(),
            filename: derive_filename(filename, options.format),
        })
    }

    /// Exports and hands the result to a [`SaveTarget`].
    pub async fn export_and_save(
        &self,
        target: &impl SaveTarget,
        filename: Option<&str>,
        options: &ExportOptions,
    ) -> Result<ExportedImage, ExportError> {
        let image = self.export_image(filename, options).await?;
        target.save(&image.bytes, &image.filename, image.mime_type)?;
        Ok(image)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BADGE_HEIGHT, BADGE_WIDTH, BadgeRenderer};
    use crate::spec::BadgeSpec;
    use std::sync::Mutex;

    fn rendered_badge() -> RenderedBadge {
        BadgeRenderer::new("https://badges.example")
            .render(&BadgeSpec::new("#007", "Sam", "Engineer"))
    }

    #[test]
    fn filename_derivation() {
        assert_eq!(derive_filename(Some("card"), ExportFormat::Jpeg), "card.jpg");
        assert_eq!(derive_filename(Some("card"), ExportFormat::Png), "card.png");
        assert_eq!(derive_filename(Some("card.png"), ExportFormat::Jpeg), "card.png");
        assert_eq!(derive_filename(None, ExportFormat::Png), "badge.png");
    }

    #[tokio::test]
    async fn export_without_source_fails_fast() {
        let exporter = BadgeExporter::new();
        let err = exporter.export(&ExportOptions::default()).await.unwrap_err();
        assert!(matches!(err, ExportError::MissingSource));
    }

    #[tokio::test]
    async fn non_positive_scale_is_rejected() {
        let mut exporter = BadgeExporter::new();
        exporter.attach(&rendered_badge());
        let err = exporter
            .export(&ExportOptions::default().with_scale(0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidScale(_)));
    }

    #[tokio::test]
    async fn png_roundtrip_doubles_dimensions_at_scale_two() {
        let mut exporter = BadgeExporter::new();
        exporter.attach(&rendered_badge());

        let bytes = exporter
            .export(&ExportOptions::default().with_scale(2.0))
            .await
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), BADGE_WIDTH * 2);
        assert_eq!(decoded.height(), BADGE_HEIGHT * 2);
    }

    #[tokio::test]
    async fn jpeg_export_carries_mime_and_extension() {
        let mut exporter = BadgeExporter::new();
        exporter.attach(&rendered_badge());

        let image = exporter
            .export_image(
                Some("card"),
                &ExportOptions::default().with_format(ExportFormat::Jpeg),
            )
            .await
            .unwrap();

        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.filename, "card.jpg");
        assert!(image.bytes.starts_with(&[0xff, 0xd8]));
    }

    #[tokio::test]
    async fn save_target_receives_derived_name() {
        struct RecordingTarget {
            calls: Mutex<Vec<(String, String, usize)>>,
        }

        impl SaveTarget for RecordingTarget {
            fn save(&self, bytes: &[u8], filename: &str, mime_type: &str) -> std::io::Result<()> {
                self.calls.lock().unwrap().push((
                    filename.to_string(),
                    mime_type.to_string(),
                    bytes.len(),
                ));
                Ok(())
            }
        }

        let mut exporter = BadgeExporter::new();
        exporter.attach(&rendered_badge());
        let target = RecordingTarget {
            calls: Mutex::new(Vec::new()),
        };

        exporter
            .export_and_save(&target, None, &ExportOptions::default())
            .await
            .unwrap();

        let calls = target.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "badge.png");
        assert_eq!(calls[0].1, "image/png");
        assert!(calls[0].2 > 0);
    }
}
