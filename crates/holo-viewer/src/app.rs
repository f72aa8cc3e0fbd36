use std::time::Instant;

use holo_engine::coords::Viewport;
use holo_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use holo_engine::input::{InputEvent, InputState, Key, OrientationSource};
use holo_engine::paint::Color;

use crate::acquire::{Acquisition, PairState, StereoSource};
use crate::animation::PopOutClock;
use crate::barrier::BarrierMask;
use crate::camera::Camera;
use crate::config::HologramConfig;
use crate::parallax::ParallaxMapper;
use crate::render::HologramRenderer;
use crate::scene::HologramScene;

/// Everything the hologram owns: camera, surfaces, mask, acquisition and
/// animation. Input handlers and the frame loop go through this one object.
pub struct HologramContext {
    camera: Camera,
    scene: HologramScene,
    acquisition: Acquisition,
    clock: PopOutClock,
    mapper: ParallaxMapper,
}

impl HologramContext {
    pub fn new(config: &HologramConfig, acquisition: Acquisition, aspect: f32) -> Self {
        let camera = Camera::from_config(&config.camera, aspect);
        let mask = BarrierMask::generate(config.mask_size);
        let scene = HologramScene::compose(config, &mask);
        let clock = PopOutClock::new(config.jump_speed, config.pop_out_depth);
        let mapper = ParallaxMapper::new(config.parallax_sensitivity);

        Self {
            camera,
            scene,
            acquisition,
            clock,
            mapper,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &HologramScene {
        &self.scene
    }

    pub fn acquisition(&self) -> &Acquisition {
        &self.acquisition
    }

    /// Routes one input event: resizes refit the camera, samples move it.
    ///
    /// Returns whether the camera changed.
    pub fn handle_input(&mut self, viewport: Viewport, input: &InputState, event: &InputEvent) -> bool {
        match event {
            InputEvent::Resized(vp) => self.camera.fit_viewport(*vp),
            _ => self.mapper.apply(&mut self.camera, viewport, input, event),
        }
    }

    /// One frame: apply settled loads, then advance the pop-out animation.
    pub fn advance(&mut self, now: Instant) {
        for install in self.acquisition.poll(now) {
            self.scene.install(install);
        }
        let z = self.clock.tick();
        self.scene.set_image_depth(z);
    }
}

/// Engine app driving a [`HologramContext`].
pub struct HologramApp {
    context: HologramContext,
    renderer: HologramRenderer,
    orientation: Option<Box<dyn OrientationSource>>,
    base_title: String,
    announced: Option<StereoSource>,
}

impl HologramApp {
    /// Starts loading the stereo pair right away; the fallback deadline runs
    /// from here.
    pub fn new(config: HologramConfig, base_title: impl Into<String>, aspect: f32) -> Self {
        let acquisition = Acquisition::start(&config, Instant::now());
        Self::with_context(HologramContext::new(&config, acquisition, aspect), base_title)
    }

    pub fn with_context(context: HologramContext, base_title: impl Into<String>) -> Self {
        Self {
            context,
            renderer: HologramRenderer::new(),
            orientation: None,
            base_title: base_title.into(),
            announced: None,
        }
    }

    /// Installs a device-orientation sensor, polled once per frame.
    pub fn with_orientation(mut self, source: Box<dyn OrientationSource>) -> Self {
        self.orientation = Some(source);
        self
    }

    pub fn context(&self) -> &HologramContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut HologramContext {
        &mut self.context
    }

    /// Feeds pending orientation readings through the mapper.
    fn poll_orientation(&mut self, viewport: Viewport, input: &InputState) {
        let Some(source) = self.orientation.as_mut() else {
            return;
        };
        while let Some(reading) = source.poll() {
            self.context
                .handle_input(viewport, input, &InputEvent::Orientation(reading));
        }
    }

    /// Title suffix once the pair resolved, `None` if unchanged since last call.
    fn title_update(&mut self) -> Option<String> {
        let PairState::Resolved(source) = self.context.acquisition.pair() else {
            return None;
        };
        if self.announced == Some(source) {
            return None;
        }
        self.announced = Some(source);
        let label = match source {
            StereoSource::Photographic => "photographic stereo",
            StereoSource::Procedural => "procedural stereo",
        };
        Some(format!("{} · {label}", self.base_title))
    }
}

impl App for HologramApp {
    fn on_start(&mut self, window: &WindowCtx<'_>) {
        self.context.camera.fit_viewport(window.viewport());
        log::info!(
            "hologram ready: {:.0}x{:.0} logical @ {:.2}x",
            window.viewport().width,
            window.viewport().height,
            window.scale_factor()
        );
    }

    fn on_input(&mut self, window: &WindowCtx<'_>, input: &InputState, event: &InputEvent) -> AppControl {
        self.context.handle_input(window.viewport(), input, event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            ctx.runtime.exit();
            return AppControl::Continue;
        }
        if ctx.input_frame.keys_pressed.contains(&Key::F11) {
            ctx.runtime.toggle_fullscreen();
        }

        self.poll_orientation(ctx.window.viewport(), ctx.input);
        self.context.advance(ctx.time.now);

        if let Some(title) = self.title_update() {
            ctx.window.set_title(&title);
        }

        let renderer = &mut self.renderer;
        let scene = &self.context.scene;
        let camera = &self.context.camera;
        ctx.render(Color::BLACK, |rctx, target| {
            renderer.render(rctx, target, scene, camera);
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossbeam_channel::unbounded;
    use holo_engine::input::{OrientationEvent, PointerMoveEvent, ScriptedOrientation};

    use super::*;
    use crate::acquire::LoadOutcome;
    use crate::scene::SurfaceId;

    fn app_with_deadline(deadline: Instant) -> (crossbeam_channel::Sender<LoadOutcome>, HologramApp) {
        let config = HologramConfig::default();
        let (tx, rx) = unbounded();
        let acquisition = Acquisition::from_receiver(rx, config.fallback, deadline);
        let context = HologramContext::new(&config, acquisition, 1.0);
        (tx, HologramApp::with_context(context, "Holo"))
    }

    // ── frame loop ───────────────────────────────────────────────────────

    #[test]
    fn eye_surfaces_move_together_and_barrier_never_moves() {
        let (_tx, mut app) = app_with_deadline(Instant::now() + Duration::from_secs(60));
        let barrier_z = app.context().scene().surface(SurfaceId::Barrier).position.z;

        for _ in 0..500 {
            app.context_mut().advance(Instant::now());
            let scene = app.context().scene();
            let l = scene.surface(SurfaceId::Left).position.z;
            let r = scene.surface(SurfaceId::Right).position.z;
            assert_eq!(l, r);
            assert!((0.0..=0.04).contains(&l));
            assert_eq!(scene.surface(SurfaceId::Barrier).position.z, barrier_z);
        }
    }

    #[test]
    fn deadline_installs_fallback_on_next_frame() {
        let t0 = Instant::now();
        let (_tx, mut app) = app_with_deadline(t0 + Duration::from_millis(1000));

        app.context_mut().advance(t0);
        assert!(app.context().scene().surface(SurfaceId::Left).material.map().image().is_none());

        app.context_mut().advance(t0 + Duration::from_millis(1000));
        let scene = app.context().scene();
        assert!(scene.surface(SurfaceId::Left).material.map().image().is_some());
        assert!(scene.surface(SurfaceId::Right).material.map().image().is_some());
    }

    #[test]
    fn title_announces_source_once() {
        let t0 = Instant::now();
        let (_tx, mut app) = app_with_deadline(t0);
        assert_eq!(app.title_update(), None);

        app.context_mut().advance(t0);
        assert_eq!(
            app.context().acquisition().pair(),
            PairState::Resolved(StereoSource::Procedural)
        );
        assert_eq!(app.title_update().as_deref(), Some("Holo · procedural stereo"));
        assert_eq!(app.title_update(), None);
    }

    // ── input ────────────────────────────────────────────────────────────

    #[test]
    fn resize_event_refits_camera() {
        let (_tx, mut app) = app_with_deadline(Instant::now());
        let vp = Viewport::new(1600.0, 400.0);
        app.context_mut()
            .handle_input(vp, &InputState::default(), &InputEvent::Resized(vp));
        assert!((app.context().camera().aspect() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn pointer_moves_camera() {
        let (_tx, mut app) = app_with_deadline(Instant::now());
        let ev = InputEvent::PointerMoved(PointerMoveEvent { x: 0.0, y: 0.0 });
        app.context_mut()
            .handle_input(Viewport::new(1000.0, 1000.0), &InputState::default(), &ev);
        let cam = app.context().camera();
        assert!((cam.position.x + 0.01).abs() < 1e-6);
        assert!((cam.position.y - 0.01).abs() < 1e-6);
    }

    #[test]
    fn orientation_source_is_drained_each_frame() {
        let (_tx, app) = app_with_deadline(Instant::now());
        let source = ScriptedOrientation::new([
            OrientationEvent { alpha: None, beta: Some(10.0), gamma: Some(10.0) },
            OrientationEvent { alpha: None, beta: Some(0.0), gamma: Some(90.0) },
        ]);
        let mut app = app.with_orientation(Box::new(source));

        app.poll_orientation(Viewport::new(800.0, 600.0), &InputState::default());
        let cam = app.context().camera();
        assert!((cam.position.x - 90f32.to_radians() * 0.02).abs() < 1e-6);
        assert_eq!(cam.position.y, 0.0);
    }

    #[test]
    fn no_orientation_source_leaves_camera() {
        let (_tx, mut app) = app_with_deadline(Instant::now());
        app.poll_orientation(Viewport::new(800.0, 600.0), &InputState::default());
        assert_eq!(app.context().camera().lateral(), glam::Vec2::ZERO);
    }
}
