//! Coordinate mapping between display space and intrinsic pixel space

/// On-screen bounding rectangle of the drawing surface, in display pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Mapping from pointer positions in display pixels to the intrinsic pixel
/// space of the image under the surface.
///
/// X and Y are scaled independently, so a non-uniformly stretched surface
/// still maps correctly. Fractional coordinates are preserved; no rounding
/// happens here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMetrics {
    display: DisplayRect,
    intrinsic_width: f32,
    intrinsic_height: f32,
}

impl SurfaceMetrics {
    /// Build a mapping for a laid-out surface.
    ///
    /// Returns `None` when the surface has not been measured yet (zero
    /// displayed width or height); mapping against an unmeasured surface is
    /// undefined and callers must gate on this.
    pub fn new(display: DisplayRect, intrinsic_width: u32, intrinsic_height: u32) -> Option<Self> {
        if display.width <= 0.0 || display.height <= 0.0 {
            return None;
        }
        Some(Self {
            display,
            intrinsic_width: intrinsic_width as f32,
            intrinsic_height: intrinsic_height as f32,
        })
    }

    /// Per-axis intrinsic-pixels-per-display-pixel factors
    pub fn scale(&self) -> (f32, f32) {
        (
            self.intrinsic_width / self.display.width,
            self.intrinsic_height / self.display.height,
        )
    }

    /// Map an absolute pointer position to intrinsic pixel coordinates
    pub fn to_intrinsic(&self, x: f32, y: f32) -> (f32, f32) {
        let (sx, sy) = self.scale();
        ((x - self.display.left) * sx, (y - self.display.top) * sy)
    }

    /// Map an intrinsic pixel position back to absolute display coordinates
    pub fn to_display(&self, x: f32, y: f32) -> (f32, f32) {
        let (sx, sy) = self.scale();
        (x / sx + self.display.left, y / sy + self.display.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmeasured_surface_has_no_mapping() {
        assert!(SurfaceMetrics::new(DisplayRect::default(), 800, 600).is_none());
        assert!(SurfaceMetrics::new(DisplayRect::new(0.0, 0.0, 400.0, 0.0), 800, 600).is_none());
    }

    #[test]
    fn test_axes_scale_independently() {
        let metrics =
            SurfaceMetrics::new(DisplayRect::new(100.0, 50.0, 400.0, 150.0), 800, 600).unwrap();
        let (x, y) = metrics.to_intrinsic(300.0, 125.0);
        assert_eq!(x, 400.0);
        assert_eq!(y, 300.0);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let metrics =
            SurfaceMetrics::new(DisplayRect::new(13.5, 7.25, 371.0, 212.0), 1280, 720).unwrap();
        for &(x, y) in &[(13.5, 7.25), (200.0, 100.0), (384.4, 219.1)] {
            let (ix, iy) = metrics.to_intrinsic(x, y);
            let (dx, dy) = metrics.to_display(ix, iy);
            assert!((dx - x).abs() < 1e-3, "x round-trip drifted: {dx} vs {x}");
            assert!((dy - y).abs() < 1e-3, "y round-trip drifted: {dy} vs {y}");
        }
    }

    #[test]
    fn test_fractional_coordinates_preserved() {
        let metrics =
            SurfaceMetrics::new(DisplayRect::new(0.0, 0.0, 300.0, 300.0), 450, 450).unwrap();
        let (x, y) = metrics.to_intrinsic(10.5, 20.5);
        assert_eq!(x, 15.75);
        assert_eq!(y, 30.75);
    }
}
