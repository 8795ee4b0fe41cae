//! Screen entity: an ordered screenshot with its markup and description
//!
//! Screens own their annotation sequence copy-on-write: every mutation builds
//! a new sequence and swaps the reference, so a render in progress never
//! observes a torn state. Screens are removed whole, never partially.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use super::annotation::Annotation;

/// Inline-encoded image payload (binary-as-text) plus its media subtype
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InlineImage {
    /// Base64-encoded image bytes
    pub data: String,
    /// Media subtype as declared at ingestion, e.g. `png` or `jpeg`
    pub mime: String,
}

impl InlineImage {
    /// Encode raw image bytes into the inline representation
    pub fn from_bytes(bytes: &[u8], mime: impl Into<String>) -> Self {
        Self {
            data: BASE64.encode(bytes),
            mime: mime.into(),
        }
    }

    /// Decode the payload back to raw image bytes
    pub fn as_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(BASE64.decode(self.data.trim())?)
    }
}

/// Where a screen's pixel data comes from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum ImageSource {
    /// Inline base64 payload, the usual case after ingestion
    Inline(InlineImage),
    /// Remotely-hosted image, fetched on demand by a collaborator
    Remote { url: String, mime: String },
}

impl ImageSource {
    /// The transmitted form of the source: inline payload or remote reference
    pub fn data_ref(&self) -> &str {
        match self {
            ImageSource::Inline(img) => &img.data,
            ImageSource::Remote { url, .. } => url,
        }
    }

    /// Declared media subtype of the original image
    pub fn mime(&self) -> &str {
        match self {
            ImageSource::Inline(img) => &img.mime,
            ImageSource::Remote { mime, .. } => mime,
        }
    }
}

/// One screen of the flow under review
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    /// Position in the flow; strictly increasing across the live sequence
    pub order: u32,
    /// Display name, shown in the UI and overwritten by name inference
    pub name: String,
    /// Free-text context passed along with the image to the report generator
    pub description: String,
    pub source: ImageSource,
    /// Committed markup, copy-on-write
    pub annotations: Arc<[Annotation]>,
}

impl Screen {
    pub fn new(order: u32, name: impl Into<String>, source: ImageSource) -> Self {
        Self {
            order,
            name: name.into(),
            description: String::new(),
            source,
            annotations: Arc::from([]),
        }
    }

    /// Replace the annotation sequence with a freshly built one
    pub fn with_annotations(&self, annotations: Arc<[Annotation]>) -> Self {
        let mut screen = self.clone();
        screen.annotations = annotations;
        screen
    }

    /// Replace the display name
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        let mut screen = self.clone();
        screen.name = name.into();
        screen
    }
}

/// Ingest a batch of inline payloads as new screens appended to `screens`.
///
/// Each new screen takes `order` continuing from the current screen count and
/// a derived default name. Returns the new sequence; the input is untouched.
pub fn with_ingested(screens: &[Screen], payloads: Vec<InlineImage>) -> Vec<Screen> {
    let mut next = screens.to_vec();
    for payload in payloads {
        let order = next.len() as u32;
        log::debug!("ingesting screen {} ({} payload)", order, payload.mime);
        next.push(Screen::new(
            order,
            format!("Screen {}", order + 1),
            ImageSource::Inline(payload),
        ));
    }
    next
}

/// Remove one screen as a unit, keyed by its order field
pub fn without_screen(screens: &[Screen], order: u32) -> Vec<Screen> {
    screens
        .iter()
        .filter(|s| s.order != order)
        .cloned()
        .collect()
}
