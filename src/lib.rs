//! Annotate interface screenshots and recover structured findings from
//! generated review reports.
//!
//! The crate covers two engines and the seam between them:
//!
//! - **Annotation & compositing**: capture vector markup (rectangles, arrows,
//!   freehand strokes, text notes) over a screenshot in its intrinsic pixel
//!   space, and deterministically burn it into the pixel data before
//!   transmission ([`surface`], [`render`], [`composite`]).
//! - **Report extraction**: recover scores, section flags, severity counts,
//!   risk records, and inferred screen names from the semi-structured text a
//!   generative model returns ([`report`]).
//!
//! The UI shell, persistence, and the report-generation call itself are
//! external collaborators, reachable through the [`surface::SurfaceHost`],
//! [`composite::RemoteFetch`], and [`session::ReportGenerator`] traits.

pub mod composite;
pub mod config;
pub mod domain;
pub mod render;
pub mod report;
pub mod session;
pub mod surface;

pub use composite::{CompositedImage, Compositor};
pub use config::{DrawSettings, ShapeColor, Tool};
pub use domain::{Annotation, Screen, Shape};
pub use report::{ReportMetrics, ScreenNameHint, UxRisk};
pub use session::{AnalysisOptions, AnalysisOutcome, run_analysis};
pub use surface::DrawingSurface;
