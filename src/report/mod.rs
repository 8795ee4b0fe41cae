//! Report extraction: recover structured data from the generated review text
//!
//! The report arrives as one semi-structured blob mixing prose, markdown
//! headings, and fenced JSON fragments. Three independent extractors operate
//! on it, each a pure function of the text:
//!
//! - score/section/severity heuristics ([`extract::extract_metrics`])
//! - the `uxRisks` fenced block ([`blocks::extract_risks`])
//! - the `screenNames` fenced block ([`blocks::extract_screen_names`])
//!
//! Each extractor re-scans the full text on its own; there is deliberately no
//! shared scanner state between them.

pub mod blocks;
pub mod extract;

pub use blocks::*;
pub use extract::*;
