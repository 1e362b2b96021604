//! Error types for badge rendering and export.

use thiserror::Error;

/// Errors from the scannable-code generator.
///
/// The renderer treats all of these as "omit the QR code": the badge is still
/// produced, just without the scannable slot filled in.
#[derive(Debug, Error)]
pub enum QrError {
    /// The target URL was empty, so there is nothing to encode.
    #[error("cannot encode an empty string")]
    EmptyInput,

    /// The QR library rejected the input (too long for any version, etc).
    #[error("QR encoding failed: {0:?}")]
    Encode(qrcode::types::QrError),

    /// The module matrix could not be written out as PNG.
    #[error("QR PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Errors from an [`ImageFetcher`](crate::ImageFetcher) implementation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
}

/// Errors from the badge exporter.
///
/// Every variant is recoverable by the caller; nothing here aborts the
/// hosting process. Per-image inlining failures never surface as errors at
/// all; they are logged and fall back as documented on
/// [`inline_images`](crate::inline_images).
#[derive(Debug, Error)]
pub enum ExportError {
    /// No badge document has been attached to the exporter.
    #[error("no badge document attached to the exporter")]
    MissingSource,

    /// The requested scale factor is zero or negative.
    #[error("scale must be positive, got {0}")]
    InvalidScale(f32),

    /// The raster surface could not be allocated at the requested size.
    #[error("could not allocate a {0}x{1} raster surface")]
    RenderingUnavailable(u32, u32),

    /// The serialized badge document failed to parse as SVG.
    #[error("failed to decode the badge document: {0}")]
    DecodeFailed(String),

    /// Pixel encoding produced no usable buffer.
    #[error("failed to encode the exported image: {0}")]
    EncodeFailed(#[from] image::ImageError),

    /// A [`SaveTarget`](crate::SaveTarget) could not persist the bytes.
    #[error("failed to save the exported image: {0}")]
    Save(#[from] std::io::Error),
}
