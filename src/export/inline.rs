//! Image inlining: resolving external references into data URIs.
//!
//! The exporter never ships a document that still depends on the network if
//! it can help it. Every external `image` href is fetched and embedded as a
//! `data:` URI; references that cannot be resolved keep their original URL
//! and the export proceeds without them, with a logged warning.

use std::collections::HashMap;
use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;
use log::warn;

use crate::document::Document;
use crate::error::FetchError;

// ============================================================================
// Fetcher capability
// ============================================================================

/// Raw bytes fetched for an image reference, with the transport-reported
/// content type when one was available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Capability for resolving an image URL to bytes.
///
/// The exporter is generic over this so hosts can substitute caching layers
/// or test doubles for the default HTTP client.
pub trait ImageFetcher {
    /// Fetches the resource at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedImage, FetchError>> + Send;
}

/// [`ImageFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher reusing an existing client (connection pools, proxy
    /// settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .to_vec();

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

// ============================================================================
// Inlining pass
// ============================================================================

/// Returns a copy of `document` with every external image reference resolved
/// to an inline `data:` URI. The input document is never modified.
///
/// All references are fetched concurrently; the pass completes when the
/// slowest one resolves. Resolution for each reference tries, in order:
/// embedding the fetched bytes under a recognized raster/vector MIME type,
/// then decoding the bytes and re-encoding them as PNG. A reference that
/// survives neither (unreachable host, undecodable payload) keeps its
/// original URL, so the export degrades rather than aborts.
pub async fn inline_images<F: ImageFetcher>(document: &Document, fetcher: &F) -> Document {
    let mut refs: Vec<String> = document
        .external_image_hrefs()
        .into_iter()
        .map(str::to_string)
        .collect();
    refs.sort_unstable();
    refs.dedup();

    let resolved = join_all(refs.iter().map(|url| resolve(fetcher, url))).await;

    let replacements: HashMap<String, String> = refs
        .into_iter()
        .zip(resolved)
        .filter_map(|(url, data_uri)| data_uri.map(|d| (url, d)))
        .collect();

    document.with_image_hrefs(&replacements)
}

async fn resolve<F: ImageFetcher>(fetcher: &F, url: &str) -> Option<String> {
    match fetcher.fetch(url).await {
        Ok(fetched) => match to_data_uri(fetched) {
            Some(uri) => Some(uri),
            None => {
                warn!("keeping external reference, payload not embeddable: {url}");
                None
            }
        },
        Err(err) => {
            warn!("keeping external reference, fetch failed for {url}: {err}");
            None
        }
    }
}

/// MIME types embeddable as-is; everything else goes through a decode +
/// re-encode cycle.
const EMBEDDABLE: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/svg+xml"];

fn to_data_uri(fetched: FetchedImage) -> Option<String> {
    let mime = fetched
        .content_type
        .as_deref()
        .filter(|ct| EMBEDDABLE.contains(ct))
        .map(str::to_string)
        .or_else(|| sniff_mime(&fetched.bytes).map(str::to_string));

    if let Some(mime) = mime {
        return Some(format!("data:{mime};base64,{}", STANDARD.encode(&fetched.bytes)));
    }

    // Unrecognized payload: run it through a bitmap decode and normalize to
    // PNG. If the bytes do not decode either, the caller keeps the URL.
    let decoded = image::load_from_memory(&fetched.bytes).ok()?;
    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .ok()?;
    Some(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else {
        let head = &bytes[..bytes.len().min(256)];
        let text = std::str::from_utf8(head).ok()?;
        if text.trim_start().starts_with("<svg") || text.trim_start().starts_with("<?xml") {
            Some("image/svg+xml")
        } else {
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;
    use std::collections::HashMap as Map;

    /// Test fetcher serving canned responses per URL.
    struct StubFetcher {
        responses: Map<String, Result<FetchedImage, FetchError>>,
    }

    impl StubFetcher {
        fn new() -> Self {
            Self {
                responses: Map::new(),
            }
        }

        fn ok(mut self, url: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Self {
            self.responses.insert(
                url.to_string(),
                Ok(FetchedImage {
                    bytes,
                    content_type: content_type.map(str::to_string),
                }),
            );
            self
        }

        fn err(mut self, url: &str) -> Self {
            self.responses
                .insert(url.to_string(), Err(FetchError::Status(403)));
            self
        }
    }

    impl ImageFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
            match self.responses.get(url) {
                Some(Ok(fetched)) => Ok(fetched.clone()),
                Some(Err(FetchError::Status(code))) => Err(FetchError::Status(*code)),
                _ => Err(FetchError::Transport("unexpected url".into())),
            }
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn doc_with_images(urls: &[&str]) -> Document {
        let mut doc = Document::new(100.0, 100.0);
        for url in urls {
            doc.push(Element::new("image").attr("href", *url).attr("width", 10));
        }
        doc
    }

    #[tokio::test]
    async fn resolves_every_external_reference() {
        let doc = doc_with_images(&["https://a.example/1.png", "https://a.example/2.png"]);
        let fetcher = StubFetcher::new()
            .ok("https://a.example/1.png", png_bytes(), Some("image/png"))
            .ok("https://a.example/2.png", png_bytes(), None);

        let inlined = inline_images(&doc, &fetcher).await;

        assert!(inlined.external_image_hrefs().is_empty());
        assert_eq!(doc.external_image_hrefs().len(), 2);
    }

    #[tokio::test]
    async fn repeated_reference_is_fetched_once() {
        use std::sync::Mutex;

        struct CountingFetcher {
            calls: Mutex<Vec<String>>,
        }

        impl ImageFetcher for CountingFetcher {
            async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
                self.calls.lock().unwrap().push(url.to_string());
                Ok(FetchedImage {
                    bytes: png_bytes(),
                    content_type: Some("image/png".into()),
                })
            }
        }

        // The same URL appears twice with another reference in between.
        let doc = doc_with_images(&[
            "https://a.example/shared.png",
            "https://a.example/other.png",
            "https://a.example/shared.png",
        ]);
        let fetcher = CountingFetcher {
            calls: Mutex::new(Vec::new()),
        };

        let inlined = inline_images(&doc, &fetcher).await;

        assert!(inlined.external_image_hrefs().is_empty());
        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls.iter().filter(|u| u.ends_with("shared.png")).count(),
            1
        );
    }

    #[tokio::test]
    async fn unresolvable_reference_is_kept_verbatim() {
        let doc = doc_with_images(&["https://a.example/ok.png", "https://a.example/blocked.png"]);
        let fetcher = StubFetcher::new()
            .ok("https://a.example/ok.png", png_bytes(), Some("image/png"))
            .err("https://a.example/blocked.png");

        let inlined = inline_images(&doc, &fetcher).await;

        assert_eq!(
            inlined.external_image_hrefs(),
            vec!["https://a.example/blocked.png"]
        );
    }

    #[tokio::test]
    async fn undecodable_payload_is_kept_verbatim() {
        let doc = doc_with_images(&["https://a.example/opaque.bin"]);
        let fetcher = StubFetcher::new().ok(
            "https://a.example/opaque.bin",
            b"definitely not an image".to_vec(),
            Some("application/octet-stream"),
        );

        let inlined = inline_images(&doc, &fetcher).await;

        assert_eq!(
            inlined.external_image_hrefs(),
            vec!["https://a.example/opaque.bin"]
        );
    }

    #[tokio::test]
    async fn data_uris_pass_through_untouched() {
        let doc = doc_with_images(&["data:image/png;base64,AAAA"]);
        let fetcher = StubFetcher::new();

        let inlined = inline_images(&doc, &fetcher).await;

        assert_eq!(inlined.image_hrefs(), vec!["data:image/png;base64,AAAA"]);
    }

    #[test]
    fn sniffs_common_magic_bytes() {
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\nxxxx"), Some("image/png"));
        assert_eq!(sniff_mime(b"\xff\xd8\xff\xe0"), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_mime(b"<svg xmlns=\"x\"/>"), Some("image/svg+xml"));
        assert_eq!(sniff_mime(b"plain text"), None);
    }

    #[test]
    fn mislabeled_content_type_falls_back_to_sniffing() {
        let uri = to_data_uri(FetchedImage {
            bytes: png_bytes(),
            content_type: Some("text/plain".into()),
        })
        .unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
