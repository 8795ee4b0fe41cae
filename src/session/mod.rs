//! Run-analysis orchestration
//!
//! Ties the pipeline together: every screen is composited (markup burned in),
//! the request for the external report generator is assembled, and the
//! returned text is fed through the extractors. The generator itself is a
//! collaborator behind [`ReportGenerator`]; this module only prepares its
//! inputs and consumes its output.

use serde::{Deserialize, Serialize};

use crate::composite::{CompositedImage, Compositor, RemoteFetch};
use crate::domain::Screen;
use crate::report::{self, ReportMetrics, ScreenNameHint, UxRisk};

/// Feature toggles for the analysis request: the six category sections plus
/// the risks block
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    pub ux: bool,
    pub wcag: bool,
    pub flow: bool,
    pub conversion: bool,
    pub ia: bool,
    pub visual: bool,
    pub risks: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ux: true,
            wcag: true,
            flow: true,
            conversion: true,
            ia: true,
            visual: true,
            risks: true,
        }
    }
}

/// Everything the external report generator needs for one run
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisRequest {
    pub flow_name: String,
    /// Per-screen composited images, in screen order
    pub images: Vec<CompositedImage>,
    /// Per-screen free-text descriptions, in screen order
    pub descriptions: Vec<String>,
    pub options: AnalysisOptions,
}

/// External report-generation service: images and text in, one text blob out
pub trait ReportGenerator {
    fn generate(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// Result of one analysis run
#[derive(Clone, Debug)]
pub struct AnalysisOutcome {
    /// The raw report text, for display
    pub report: String,
    pub metrics: ReportMetrics,
    pub risks: Vec<UxRisk>,
    /// Screen sequence with inferred names applied
    pub screens: Vec<Screen>,
}

/// Overwrite screen display names from extracted `{index, name}` hints.
///
/// `index` addresses a screen's position in the current sequence, not its
/// `order` field. Screens without a matching hint keep their name. The input
/// is untouched; any labels mirroring a screen name must be re-synchronized
/// from the returned sequence.
pub fn apply_screen_names(screens: &[Screen], hints: &[ScreenNameHint]) -> Vec<Screen> {
    screens
        .iter()
        .enumerate()
        .map(|(position, screen)| {
            match hints.iter().find(|hint| hint.index == position) {
                Some(hint) => {
                    log::debug!("renaming screen at {position} to {:?}", hint.name);
                    screen.with_name(hint.name.clone())
                }
                None => screen.clone(),
            }
        })
        .collect()
}

/// Composite all screens, run the external generator, and extract structured
/// results from the report it returns.
///
/// The only error that can escape is the generator's own; every failure
/// inside the pipeline degrades instead (original images, empty lists, zero
/// scores).
pub async fn run_analysis<F, G>(
    flow_name: &str,
    screens: &[Screen],
    options: AnalysisOptions,
    compositor: &Compositor<F>,
    generator: &G,
) -> anyhow::Result<AnalysisOutcome>
where
    F: RemoteFetch,
    G: ReportGenerator,
{
    let images = compositor.composite_all(screens).await;
    let descriptions = screens.iter().map(|s| s.description.clone()).collect();

    let request = AnalysisRequest {
        flow_name: flow_name.to_string(),
        images,
        descriptions,
        options,
    };

    log::debug!(
        "requesting report for {:?} over {} screens",
        flow_name,
        screens.len()
    );
    let report = generator.generate(&request).await?;

    let metrics = report::extract_metrics(&report);
    let risks = report::extract_risks(&report);
    let names = report::extract_screen_names(&report);
    let screens = apply_screen_names(screens, &names);

    Ok(AnalysisOutcome {
        report,
        metrics,
        risks,
        screens,
    })
}
