//! End-to-end walkthrough: ingest screens, draw markup, run an analysis
//! against a canned report generator, and print the extracted findings.

use std::sync::Arc;

use flowlens::composite::Compositor;
use flowlens::domain::{DisplayRect, InlineImage, with_ingested};
use flowlens::session::{AnalysisOptions, AnalysisRequest, ReportGenerator, run_analysis};
use flowlens::surface::{DrawingSurface, SurfaceHost};
use flowlens::{Annotation, Tool};

/// Stands in for the remote report service
struct CannedGenerator;

impl ReportGenerator for CannedGenerator {
    async fn generate(&self, request: &AnalysisRequest) -> anyhow::Result<String> {
        log::info!(
            "pretending to analyze {} screens of {:?}",
            request.images.len(),
            request.flow_name
        );
        Ok(r#"# Review

## Accessibility Score: 82
**Severity: High** Contrast on the primary button fails WCAG AA.

## Visual Hierarchy Score: 74

```json
{"uxRisks":[{"title":"Low-contrast CTA","whyItMatters":"Users miss the primary action","potentialImpact":"Drop-off at signup","screenIndex":0,"boundingBox":[120,80,240,400]}]}
```

```json
{"screenNames":[{"index":0,"name":"Signup"}]}
```
"#
        .to_string())
    }
}

struct DemoHost {
    committed: Option<Arc<[Annotation]>>,
}

impl SurfaceHost for DemoHost {
    fn prompt_note(&mut self) -> Option<String> {
        Some("Check this".to_string())
    }

    fn annotations_changed(&mut self, annotations: Arc<[Annotation]>) {
        self.committed = Some(annotations);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // One gray 640x480 "screenshot", PNG-encoded and ingested inline
    let shot = image::RgbaImage::from_pixel(640, 480, image::Rgba([230, 230, 230, 255]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(shot).write_to(
        &mut std::io::Cursor::new(&mut png),
        image::ImageFormat::Png,
    )?;
    let mut screens = with_ingested(&[], vec![InlineImage::from_bytes(&png, "png")]);
    screens[0].description = "Signup form with a primary button".to_string();

    // Drag an arrow across the surface, shown at half size
    let mut surface = DrawingSurface::new(640, 480, Arc::clone(&screens[0].annotations));
    surface.set_viewport(DisplayRect::new(0.0, 0.0, 320.0, 240.0));
    surface.set_tool(Tool::Arrow);

    let mut host = DemoHost { committed: None };
    surface.pointer_down(40.0, 40.0, &mut host);
    surface.pointer_moved(160.0, 120.0);
    surface.pointer_up(&mut host);

    if let Some(annotations) = host.committed.take() {
        screens[0] = screens[0].with_annotations(annotations);
    }

    let outcome = run_analysis(
        "Signup flow",
        &screens,
        AnalysisOptions::default(),
        &Compositor::new(),
        &CannedGenerator,
    )
    .await?;

    println!("accessibility score: {}", outcome.metrics.scores.wcag);
    println!("high-severity issues: {}", outcome.metrics.issues.high);
    for risk in &outcome.risks {
        println!("risk: {} ({})", risk.title, risk.why_it_matters);
    }
    for screen in &outcome.screens {
        println!("screen {} -> {}", screen.order, screen.name);
    }
    Ok(())
}
