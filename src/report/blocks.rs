//! Typed extraction of fenced JSON blocks embedded in the report text
//!
//! Exactly two wire shapes are recognized: the `uxRisks` list and the
//! `screenNames` list. Each extractor scans all fenced code blocks, picks the
//! first one that looks like JSON and contains its key, and parses it.
//! Absence and malformation both yield an empty list; callers cannot tell
//! them apart, and that is deliberate — degraded model output must never
//! crash the pipeline.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bounding box on the fixed 0-1000 normalized scale, stored as
/// `[ymin, xmin, ymax, xmax]` regardless of actual image resolution
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox(pub [f64; 4]);

impl NormalizedBox {
    /// Upper bound of the normalized coordinate space
    pub const SCALE: f64 = 1000.0;

    /// Scale back onto a real image, returning (x, y, width, height) in pixels
    pub fn to_pixels(&self, width: u32, height: u32) -> (f64, f64, f64, f64) {
        let [ymin, xmin, ymax, xmax] = self.0;
        let x = xmin / Self::SCALE * width as f64;
        let y = ymin / Self::SCALE * height as f64;
        let w = (xmax - xmin) / Self::SCALE * width as f64;
        let h = (ymax - ymin) / Self::SCALE * height as f64;
        (x, y, w, h)
    }
}

/// One flagged risk from the report's `uxRisks` block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UxRisk {
    pub title: String,
    pub why_it_matters: String,
    pub potential_impact: String,
    /// 0-based position into the screen sequence at analysis time
    #[serde(default)]
    pub screen_index: Option<usize>,
    #[serde(default)]
    pub bounding_box: Option<NormalizedBox>,
}

/// One inferred display name from the report's `screenNames` block
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenNameHint {
    /// 0-based position into the screen sequence at analysis time
    pub index: usize,
    pub name: String,
}

#[derive(Deserialize)]
struct RiskEnvelope {
    #[serde(rename = "uxRisks")]
    ux_risks: Vec<UxRisk>,
}

#[derive(Deserialize)]
struct ScreenNameEnvelope {
    #[serde(rename = "screenNames")]
    screen_names: Vec<ScreenNameHint>,
}

/// Contents of every fenced code block, language tag stripped
fn fenced_blocks(text: &str) -> Vec<&str> {
    let Ok(re) = Regex::new(r"(?s)```[a-zA-Z]*[ \t]*\r?\n?(.*?)```") else {
        log::error!("bad fence pattern");
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// First fenced block that looks like JSON and mentions `key`
fn block_with_key<'t>(text: &'t str, key: &str) -> Option<&'t str> {
    fenced_blocks(text).into_iter().find(|block| {
        let trimmed = block.trim_start();
        (trimmed.starts_with('{') || trimmed.starts_with('[')) && block.contains(key)
    })
}

/// Recover the `uxRisks` list, or an empty list when the block is missing or
/// does not parse
pub fn extract_risks(text: &str) -> Vec<UxRisk> {
    let Some(block) = block_with_key(text, "uxRisks") else {
        return Vec::new();
    };
    match serde_json::from_str::<RiskEnvelope>(block.trim()) {
        Ok(envelope) => envelope.ux_risks,
        Err(err) => {
            log::warn!("uxRisks block failed to parse, showing no risks: {err}");
            Vec::new()
        }
    }
}

/// Recover the `screenNames` list, or an empty list when the block is missing
/// or does not parse
pub fn extract_screen_names(text: &str) -> Vec<ScreenNameHint> {
    let Some(block) = block_with_key(text, "screenNames") else {
        return Vec::new();
    };
    match serde_json::from_str::<ScreenNameEnvelope>(block.trim()) {
        Ok(envelope) => envelope.screen_names,
        Err(err) => {
            log::warn!("screenNames block failed to parse, keeping current names: {err}");
            Vec::new()
        }
    }
}
