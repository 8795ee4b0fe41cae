//! Drawing surface: pointer-driven annotation capture over a screen image
//!
//! The surface is a two-state machine (`Idle` / `Drawing`). Pointer-down with
//! a drag tool creates a draft annotation; pointer-move updates it; pointer-up
//! (or the pointer leaving the surface) commits it to the owning screen's
//! annotation sequence through the host callback and returns to idle. The text
//! tool never enters the drawing state: pointer-down prompts for the note and
//! commits immediately.
//!
//! Pointer events are delivered serially by the host environment, so `&mut
//! self` methods are enough to keep draft mutation and commit from
//! interleaving. Commits are copy-on-write: a new sequence is built and the
//! old one replaced, never mutated in place.

use std::sync::Arc;

use image::RgbaImage;

use crate::config::{DrawSettings, Tool};
use crate::domain::{Annotation, DisplayRect, Shape, SurfaceMetrics};
use crate::render;

/// Observable state of the pointer gesture machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfacePhase {
    Idle,
    Drawing,
}

/// Host environment callbacks for the drawing surface
pub trait SurfaceHost {
    /// Synchronously ask the user for note content (text tool). `None` or an
    /// empty string cancels the note.
    fn prompt_note(&mut self) -> Option<String>;

    /// The committed annotation sequence was replaced
    fn annotations_changed(&mut self, annotations: Arc<[Annotation]>);
}

/// Captures pointer input and renders markup over one screen's image
pub struct DrawingSurface {
    intrinsic: (u32, u32),
    metrics: Option<SurfaceMetrics>,
    tool: Tool,
    settings: DrawSettings,
    committed: Arc<[Annotation]>,
    draft: Option<Annotation>,
    next_id: u64,
}

impl DrawingSurface {
    /// Create a surface for an image of the given intrinsic size, seeded with
    /// the screen's committed annotations
    pub fn new(intrinsic_width: u32, intrinsic_height: u32, committed: Arc<[Annotation]>) -> Self {
        let next_id = committed.iter().map(|a| a.id + 1).max().unwrap_or(1);
        Self {
            intrinsic: (intrinsic_width, intrinsic_height),
            metrics: None,
            tool: Tool::default(),
            settings: DrawSettings::default(),
            committed,
            draft: None,
            next_id,
        }
    }

    pub fn phase(&self) -> SurfacePhase {
        if self.draft.is_some() {
            SurfacePhase::Drawing
        } else {
            SurfacePhase::Idle
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn set_settings(&mut self, settings: DrawSettings) {
        self.settings = settings;
    }

    pub fn committed(&self) -> &Arc<[Annotation]> {
        &self.committed
    }

    pub fn draft(&self) -> Option<&Annotation> {
        self.draft.as_ref()
    }

    /// Record the surface's on-screen bounding rect after layout.
    ///
    /// Until this succeeds pointer events are ignored; mapping display
    /// coordinates without a measured rect is undefined.
    pub fn set_viewport(&mut self, display: DisplayRect) {
        self.metrics = SurfaceMetrics::new(display, self.intrinsic.0, self.intrinsic.1);
        if self.metrics.is_none() {
            log::debug!("surface viewport has zero size, pointer input gated off");
        }
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Pointer pressed at an absolute display position
    pub fn pointer_down(&mut self, x: f32, y: f32, host: &mut dyn SurfaceHost) {
        let Some(metrics) = self.metrics else {
            log::debug!("pointer_down before layout, ignored");
            return;
        };
        let (ix, iy) = metrics.to_intrinsic(x, y);
        let DrawSettings { color, thickness } = self.settings;

        match self.tool {
            Tool::Select => {}
            Tool::Text => {
                // No drag phase: prompt synchronously and commit in place
                let Some(text) = host.prompt_note() else {
                    return;
                };
                if text.trim().is_empty() {
                    return;
                }
                let id = self.alloc_id();
                let note = Annotation::text(id, color, thickness, ix, iy, text);
                self.commit(note, host);
            }
            Tool::Rect => {
                let id = self.alloc_id();
                self.draft = Some(Annotation::rect(id, color, thickness, ix, iy));
            }
            Tool::Arrow => {
                let id = self.alloc_id();
                self.draft = Some(Annotation::arrow(id, color, thickness, ix, iy));
            }
            Tool::Freehand => {
                let id = self.alloc_id();
                self.draft = Some(Annotation::freehand(id, color, thickness, ix, iy));
            }
        }
    }

    /// Pointer moved to an absolute display position
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let Some(metrics) = self.metrics else {
            return;
        };
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        let (ix, iy) = metrics.to_intrinsic(x, y);

        match &mut draft.shape {
            Shape::Rect {
                x: ox,
                y: oy,
                width,
                height,
            } => {
                // Signed delta from the anchor; negative extents are kept
                *width = ix - *ox;
                *height = iy - *oy;
            }
            Shape::Arrow { points } => {
                points[2] = ix;
                points[3] = iy;
            }
            Shape::Freehand { points } => {
                // Every sample is kept; no decimation or distance filter
                points.push(ix);
                points.push(iy);
            }
            Shape::Text { .. } => {}
        }
    }

    /// Pointer released: commit the draft, if any
    pub fn pointer_up(&mut self, host: &mut dyn SurfaceHost) {
        let Some(draft) = self.draft.take() else {
            return;
        };
        // A gesture that never produced enough geometry is dropped silently
        if let Shape::Freehand { points } = &draft.shape
            && points.len() < 4
        {
            log::debug!("freehand draft with {} coordinates dropped", points.len());
            return;
        }
        self.commit(draft, host);
    }

    /// Pointer left the surface mid-gesture: same as release
    pub fn pointer_left(&mut self, host: &mut dyn SurfaceHost) {
        self.pointer_up(host);
    }

    fn commit(&mut self, ann: Annotation, host: &mut dyn SurfaceHost) {
        let mut next: Vec<Annotation> = self.committed.to_vec();
        next.push(ann);
        self.committed = Arc::from(next);
        host.annotations_changed(Arc::clone(&self.committed));
    }

    /// Render the current annotation set to a fresh transparent overlay at
    /// intrinsic resolution: committed annotations in array order, then the
    /// draft on top so the in-progress shape is always visually topmost.
    pub fn render_overlay(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.intrinsic.0, self.intrinsic.1);
        render::image::draw_annotations(&mut img, &self.committed);
        if let Some(draft) = &self.draft {
            render::image::draw_annotation(&mut img, draft);
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeColor;

    #[derive(Default)]
    struct TestHost {
        note: Option<String>,
        prompted: usize,
        updates: Vec<Arc<[Annotation]>>,
    }

    impl SurfaceHost for TestHost {
        fn prompt_note(&mut self) -> Option<String> {
            self.prompted += 1;
            self.note.clone()
        }

        fn annotations_changed(&mut self, annotations: Arc<[Annotation]>) {
            self.updates.push(annotations);
        }
    }

    fn measured_surface(tool: Tool) -> DrawingSurface {
        let mut surface = DrawingSurface::new(200, 200, Arc::from([]));
        // 1:1 mapping keeps test coordinates readable
        surface.set_viewport(DisplayRect::new(0.0, 0.0, 200.0, 200.0));
        surface.set_tool(tool);
        surface
    }

    #[test]
    fn test_rect_drag_keeps_negative_extents() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Rect);

        surface.pointer_down(50.0, 50.0, &mut host);
        assert_eq!(surface.phase(), SurfacePhase::Drawing);
        surface.pointer_moved(10.0, 10.0);
        surface.pointer_up(&mut host);

        assert_eq!(surface.phase(), SurfacePhase::Idle);
        let committed = host.updates.last().unwrap();
        let Shape::Rect {
            x,
            y,
            width,
            height,
        } = committed[0].shape
        else {
            panic!("expected rect");
        };
        assert_eq!((x, y), (50.0, 50.0));
        assert_eq!(width, -40.0);
        assert_eq!(height, -40.0);
    }

    #[test]
    fn test_arrow_move_replaces_second_endpoint_only() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Arrow);

        surface.pointer_down(10.0, 20.0, &mut host);
        surface.pointer_moved(80.0, 90.0);
        surface.pointer_moved(100.0, 110.0);
        surface.pointer_up(&mut host);

        let committed = host.updates.last().unwrap();
        let Shape::Arrow { points } = committed[0].shape else {
            panic!("expected arrow");
        };
        assert_eq!(points, [10.0, 20.0, 100.0, 110.0]);
    }

    #[test]
    fn test_freehand_appends_every_sample() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Freehand);

        surface.pointer_down(1.0, 1.0, &mut host);
        surface.pointer_moved(1.0, 1.0);
        surface.pointer_moved(2.0, 2.0);
        surface.pointer_up(&mut host);

        let committed = host.updates.last().unwrap();
        let Shape::Freehand { points } = &committed[0].shape else {
            panic!("expected freehand");
        };
        // Duplicate samples are kept as-is
        assert_eq!(points, &vec![1.0, 1.0, 1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_single_point_freehand_is_dropped() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Freehand);

        surface.pointer_down(5.0, 5.0, &mut host);
        surface.pointer_up(&mut host);

        assert!(host.updates.is_empty());
        assert_eq!(surface.committed().len(), 0);
    }

    #[test]
    fn test_text_tool_commits_immediately_without_drag() {
        let mut host = TestHost {
            note: Some("Fix this button".into()),
            ..Default::default()
        };
        let mut surface = measured_surface(Tool::Text);

        surface.pointer_down(40.0, 60.0, &mut host);

        assert_eq!(host.prompted, 1);
        assert_eq!(surface.phase(), SurfacePhase::Idle);
        let committed = host.updates.last().unwrap();
        let Shape::Text { x, y, ref text } = committed[0].shape else {
            panic!("expected text");
        };
        assert_eq!((x, y), (40.0, 60.0));
        assert_eq!(text, "Fix this button");
    }

    #[test]
    fn test_declined_note_commits_nothing() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Text);

        surface.pointer_down(40.0, 60.0, &mut host);

        assert_eq!(host.prompted, 1);
        assert!(host.updates.is_empty());
    }

    #[test]
    fn test_select_tool_is_a_no_op() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Select);

        surface.pointer_down(10.0, 10.0, &mut host);
        surface.pointer_moved(50.0, 50.0);
        surface.pointer_up(&mut host);

        assert!(host.updates.is_empty());
        assert_eq!(surface.phase(), SurfacePhase::Idle);
    }

    #[test]
    fn test_unmeasured_surface_ignores_pointer_input() {
        let mut host = TestHost::default();
        let mut surface = DrawingSurface::new(200, 200, Arc::from([]));
        surface.set_tool(Tool::Rect);

        surface.pointer_down(10.0, 10.0, &mut host);
        assert_eq!(surface.phase(), SurfacePhase::Idle);
    }

    #[test]
    fn test_pointer_leave_commits_like_release() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Rect);

        surface.pointer_down(10.0, 10.0, &mut host);
        surface.pointer_moved(30.0, 40.0);
        surface.pointer_left(&mut host);

        assert_eq!(host.updates.len(), 1);
        assert_eq!(surface.phase(), SurfacePhase::Idle);
    }

    #[test]
    fn test_display_scaling_maps_to_intrinsic_space() {
        let mut host = TestHost::default();
        let mut surface = DrawingSurface::new(800, 600, Arc::from([]));
        // Surface shown at half width, quarter height
        surface.set_viewport(DisplayRect::new(0.0, 0.0, 400.0, 150.0));
        surface.set_tool(Tool::Arrow);

        surface.pointer_down(100.0, 75.0, &mut host);
        surface.pointer_moved(200.0, 150.0);
        surface.pointer_up(&mut host);

        let committed = host.updates.last().unwrap();
        let Shape::Arrow { points } = committed[0].shape else {
            panic!("expected arrow");
        };
        assert_eq!(points, [200.0, 300.0, 400.0, 600.0]);
    }

    #[test]
    fn test_commits_are_copy_on_write() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Arrow);

        surface.pointer_down(10.0, 10.0, &mut host);
        surface.pointer_up(&mut host);
        let first = Arc::clone(host.updates.last().unwrap());

        surface.pointer_down(20.0, 20.0, &mut host);
        surface.pointer_up(&mut host);
        let second = host.updates.last().unwrap();

        // The earlier snapshot is untouched by the second commit
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_ids_are_unique_and_continue_after_seed() {
        let seed: Arc<[Annotation]> = Arc::from([Annotation::arrow(
            7,
            ShapeColor::default(),
            3.0,
            0.0,
            0.0,
        )]);
        let mut surface = DrawingSurface::new(100, 100, seed);
        surface.set_viewport(DisplayRect::new(0.0, 0.0, 100.0, 100.0));
        surface.set_tool(Tool::Rect);

        let mut host = TestHost::default();
        surface.pointer_down(1.0, 1.0, &mut host);
        surface.pointer_up(&mut host);

        let committed = host.updates.last().unwrap();
        assert_eq!(committed[1].id, 8);
    }

    #[test]
    fn test_overlay_draws_draft_on_top() {
        let mut host = TestHost::default();
        let mut surface = measured_surface(Tool::Freehand);

        surface.pointer_down(10.0, 10.0, &mut host);
        surface.pointer_moved(60.0, 60.0);

        let overlay = surface.render_overlay();
        assert_eq!(overlay.dimensions(), (200, 200));
        // The in-progress stroke is visible before commit
        assert!(overlay.pixels().any(|p| p.0[3] != 0));
    }
}
