//! Compositor: flatten a screen's markup into its raster image
//!
//! Screens without markup pass through untouched (no re-encode, no quality
//! loss). Screens with markup are decoded, drawn over, and re-encoded as
//! lossless PNG. Decoding is bounded by a timeout, and every failure mode
//! falls back to the original payload: a failed overlay must never block the
//! analysis request.

use std::io;
use std::time::Duration;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;

use crate::domain::{ImageSource, Screen};
use crate::render;

/// Bound on decode-and-measure before giving up on the overlay
pub const DECODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Media subtype of every re-encoded composite, regardless of input format
pub const COMPOSITE_MIME: &str = "png";

/// A screen image ready for transmission: inline payload (or remote
/// reference, when compositing a remote screen fell through) plus its media
/// subtype
#[derive(Clone, Debug, PartialEq)]
pub struct CompositedImage {
    pub data: String,
    pub mime: String,
}

/// Collaborator that resolves remote image bytes.
///
/// `cross_origin` asks for a permissive cross-origin fetch mode; the
/// compositor sets it for remote sources only. Inline payloads never reach
/// this trait.
pub trait RemoteFetch: Sync {
    fn fetch(
        &self,
        url: &str,
        cross_origin: bool,
    ) -> impl Future<Output = anyhow::Result<Vec<u8>>> + Send;
}

/// Default collaborator for hosts without remote image support; always
/// refuses, which routes remote screens into the passthrough fallback
pub struct NoRemoteFetch;

impl RemoteFetch for NoRemoteFetch {
    async fn fetch(&self, url: &str, _cross_origin: bool) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("no remote fetcher configured for {url}")
    }
}

/// Burns annotations into screen images before transmission
pub struct Compositor<F = NoRemoteFetch> {
    fetcher: F,
}

impl Compositor<NoRemoteFetch> {
    pub fn new() -> Self {
        Self {
            fetcher: NoRemoteFetch,
        }
    }
}

impl Default for Compositor<NoRemoteFetch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: RemoteFetch> Compositor<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Flatten one screen's markup into its image.
    ///
    /// With no annotations the original payload and media subtype are
    /// returned unchanged. Otherwise the image is decoded (bounded by
    /// [`DECODE_TIMEOUT`]), drawn over in annotation array order, and
    /// re-encoded as PNG. Any failure falls back to the original payload.
    pub async fn composite(&self, screen: &Screen) -> CompositedImage {
        let original = CompositedImage {
            data: screen.source.data_ref().to_string(),
            mime: screen.source.mime().to_string(),
        };
        if screen.annotations.is_empty() {
            return original;
        }

        match self.composite_inner(screen).await {
            Ok(done) => done,
            Err(err) => {
                log::warn!(
                    "compositing screen {} failed, sending original image: {err:#}",
                    screen.order
                );
                original
            }
        }
    }

    /// Flatten every screen; all results are collected, in screen order,
    /// before the batch is considered ready
    pub async fn composite_all(&self, screens: &[Screen]) -> Vec<CompositedImage> {
        futures::future::join_all(screens.iter().map(|screen| self.composite(screen))).await
    }

    async fn composite_inner(&self, screen: &Screen) -> anyhow::Result<CompositedImage> {
        let bytes = match &screen.source {
            ImageSource::Inline(inline) => inline.as_bytes()?,
            // Remote images need a permissive cross-origin mode before
            // decode; inline payloads must never ask for it
            ImageSource::Remote { url, .. } => self.fetcher.fetch(url, true).await?,
        };

        let annotations = screen.annotations.to_vec();
        let decode = tokio::task::spawn_blocking(move || -> anyhow::Result<RgbaImage> {
            let decoded = image::load_from_memory(&bytes).context("image decode failed")?;
            // Same-size raster target with the source pixels as the base layer
            let mut target = decoded.to_rgba8();
            render::image::draw_annotations(&mut target, &annotations);
            Ok(target)
        });

        let target = tokio::time::timeout(DECODE_TIMEOUT, decode)
            .await
            .context("image decode timed out")??
            .context("decode task failed")?;

        let mut png_bytes = Vec::new();
        write_png(&mut png_bytes, &target)?;

        Ok(CompositedImage {
            data: BASE64.encode(&png_bytes),
            mime: COMPOSITE_MIME.to_string(),
        })
    }
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
