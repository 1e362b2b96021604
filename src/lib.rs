//! badge-renderer: Event badge rendering and export library
//!
//! This crate builds personalized event badges as SVG documents and exports
//! them to raster images. A badge is described by a [`BadgeSpec`] (identity,
//! colors, branding, background), rendered by [`BadgeRenderer`] into a
//! [`Document`] on a fixed 1080x1600 canvas, and exported by
//! [`BadgeExporter`] through an inline-serialize-rasterize-encode pipeline.
//!
//! # Example
//!
//! ```
//! use badge_renderer::{BadgeBackground, BadgeRenderer, BadgeSpec, PatternKind};
//!
//! let spec = BadgeSpec::new("#042", "Ada", "Systems Engineer")
//!     .with_last_name("Lovelace")
//!     .with_background(BadgeBackground {
//!         pattern: PatternKind::Dots,
//!         ..BadgeBackground::default()
//!     });
//!
//! let badge = BadgeRenderer::new("https://badges.example").render(&spec);
//! let svg = badge.document.to_svg();
//! assert!(svg.contains("ADA"));
//! ```
//!
//! # Exporting
//!
//! Export is async because external image references (profile pictures,
//! logos) are fetched and inlined concurrently before rasterization:
//!
//! ```no_run
//! use badge_renderer::{BadgeExporter, BadgeRenderer, BadgeSpec, ExportOptions};
//!
//! # async fn demo() -> Result<(), badge_renderer::ExportError> {
//! let badge = BadgeRenderer::new("https://badges.example")
//!     .render(&BadgeSpec::new("#042", "Ada", "Systems Engineer"));
//!
//! let mut exporter = BadgeExporter::new();
//! exporter.attach(&badge);
//! let png = exporter.export(&ExportOptions::default().with_scale(2.0)).await?;
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod export;
mod pattern;
mod qr;
mod render;
mod repel;
mod spec;

pub use document::{Document, Element};
pub use error::{ExportError, FetchError, QrError};
pub use export::{
    BadgeExporter, DEFAULT_BASENAME, DirectorySaveTarget, ExportFormat, ExportOptions,
    ExportedImage, FetchedImage, HttpFetcher, ImageFetcher, SaveTarget, derive_filename,
    inline_images,
};
pub use qr::data_uri as qr_data_uri;
pub use render::{
    BADGE_HEIGHT, BADGE_WIDTH, BadgeRenderer, PHOTO_SIZE, RenderedBadge, name_font_size,
};
pub use repel::{Point, Rect, RepulsionConfig, XorShift32, dodge};
pub use spec::{BadgeBackground, BadgeBranding, BadgeColors, BadgeSpec, PatternKind};
