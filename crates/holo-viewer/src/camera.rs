use glam::{Mat4, Vec2, Vec3};
use holo_engine::coords::Viewport;

use crate::config::CameraConfig;

/// Perspective camera looking down −Z.
///
/// `position.x`/`position.y` are driven by parallax input; `position.z` stays
/// at the configured viewing distance. The projection is cached and refreshed
/// whenever the aspect ratio changes.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
    projection: Mat4,
}

impl Camera {
    /// `fov_y_deg` is the vertical field of view in degrees.
    pub fn perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        let mut camera = Self {
            position: Vec3::ZERO,
            fov_y: fov_y_deg.to_radians(),
            near,
            far,
            aspect,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self::perspective(config.fov_y_deg, aspect, config.near, config.far);
        camera.position = Vec3::new(0.0, 0.0, config.distance);
        camera
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn fov_y_deg(&self) -> f32 {
        self.fov_y.to_degrees()
    }

    /// Lateral (x, y) offset.
    #[inline]
    pub fn lateral(&self) -> Vec2 {
        self.position.truncate()
    }

    pub fn set_lateral(&mut self, offset: Vec2) {
        self.position.x = offset.x;
        self.position.y = offset.y;
    }

    /// Recomputes aspect and projection from `viewport`.
    ///
    /// Returns `false` (and changes nothing) for degenerate viewports.
    /// Repeating the same viewport leaves the camera unchanged.
    pub fn fit_viewport(&mut self, viewport: Viewport) -> bool {
        let Some(aspect) = viewport.aspect() else {
            log::debug!("ignoring degenerate viewport {}x{}", viewport.width, viewport.height);
            return false;
        };
        self.aspect = aspect;
        self.update_projection();
        true
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World → view. The camera never rotates, so this is a pure translation.
    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn camera() -> Camera {
        Camera::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }

    // ── construction ─────────────────────────────────────────────────────

    #[test]
    fn starts_at_viewing_distance() {
        let c = camera();
        assert_eq!(c.position, Vec3::new(0.0, 0.0, 2.0));
        assert!((c.fov_y_deg() - 75.0).abs() < 1e-4);
    }

    #[test]
    fn invalid_initial_aspect_falls_back_to_square() {
        let c = Camera::perspective(75.0, 0.0, 0.1, 1000.0);
        assert_eq!(c.aspect(), 1.0);
    }

    // ── resize ───────────────────────────────────────────────────────────

    #[test]
    fn aspect_tracks_viewport() {
        let mut c = camera();
        for (w, h) in [(1000.0, 1000.0), (1920.0, 1080.0), (390.0, 844.0), (1.0, 3.0)] {
            assert!(c.fit_viewport(Viewport::new(w, h)));
            assert!((c.aspect() - w / h).abs() < EPS);
        }
    }

    #[test]
    fn projection_refreshes_on_resize() {
        let mut c = camera();
        let before = c.projection();
        c.fit_viewport(Viewport::new(500.0, 1000.0));
        assert_ne!(before, c.projection());
        assert_eq!(
            c.projection(),
            Mat4::perspective_rh(75f32.to_radians(), 0.5, 0.1, 1000.0)
        );
    }

    #[test]
    fn resize_is_idempotent() {
        let mut c = camera();
        c.fit_viewport(Viewport::new(800.0, 600.0));
        let once = c.projection();
        c.fit_viewport(Viewport::new(800.0, 600.0));
        assert_eq!(once, c.projection());
    }

    #[test]
    fn degenerate_viewport_is_ignored() {
        let mut c = camera();
        let aspect = c.aspect();
        assert!(!c.fit_viewport(Viewport::new(0.0, 600.0)));
        assert_eq!(c.aspect(), aspect);
    }

    // ── transforms ───────────────────────────────────────────────────────

    #[test]
    fn lateral_offset_moves_only_x_y() {
        let mut c = camera();
        c.set_lateral(Vec2::new(-0.01, 0.01));
        assert_eq!(c.position, Vec3::new(-0.01, 0.01, 2.0));
    }

    #[test]
    fn point_straight_ahead_projects_to_center() {
        let c = camera();
        let clip = c.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < EPS && ndc.y.abs() < EPS);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
