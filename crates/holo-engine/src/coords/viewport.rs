/// Viewport size in logical pixels.
///
/// Pointer positions are expressed in the same space, so
/// `x / width` is the normalized horizontal position regardless of DPI.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width / height, or `None` for a degenerate (e.g. minimized) viewport.
    #[inline]
    pub fn aspect(self) -> Option<f32> {
        self.is_valid().then(|| self.width / self.height)
    }

    /// Maps a point to `[0, 1]²` relative to the viewport (unclamped).
    #[inline]
    pub fn normalize(self, x: f32, y: f32) -> Option<(f32, f32)> {
        self.is_valid().then(|| (x / self.width, y / self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_is_width_over_height() {
        assert_eq!(Viewport::new(1920.0, 1080.0).aspect(), Some(1920.0 / 1080.0));
        assert_eq!(Viewport::new(300.0, 600.0).aspect(), Some(0.5));
    }

    #[test]
    fn degenerate_viewport_has_no_aspect() {
        assert_eq!(Viewport::new(800.0, 0.0).aspect(), None);
        assert_eq!(Viewport::new(0.0, 0.0).aspect(), None);
        assert_eq!(Viewport::new(f32::NAN, 10.0).aspect(), None);
    }

    #[test]
    fn normalize_maps_corners() {
        let vp = Viewport::new(1000.0, 500.0);
        assert_eq!(vp.normalize(0.0, 0.0), Some((0.0, 0.0)));
        assert_eq!(vp.normalize(1000.0, 500.0), Some((1.0, 1.0)));
        assert_eq!(vp.normalize(250.0, 250.0), Some((0.25, 0.5)));
    }
}
