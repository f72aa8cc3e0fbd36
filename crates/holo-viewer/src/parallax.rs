use glam::Vec2;
use holo_engine::coords::Viewport;
use holo_engine::input::{InputEvent, InputState, OrientationEvent, TouchPhase};

use crate::camera::Camera;

/// Maps pointer, touch and orientation samples to a camera lateral offset.
///
/// Stateless: every accepted sample overwrites the camera's (x, y) outright.
/// Sources never blend; the most recently delivered event wins, whichever
/// device produced it.
#[derive(Debug, Clone, Copy)]
pub struct ParallaxMapper {
    sensitivity: f32,
}

impl ParallaxMapper {
    pub fn new(sensitivity: f32) -> Self {
        Self { sensitivity }
    }

    /// Offset for a point in logical pixels (top-left origin).
    pub fn from_point(&self, viewport: Viewport, x: f32, y: f32) -> Option<Vec2> {
        let (nx, ny) = viewport.normalize(x, y)?;
        Some(Vec2::new(
            (nx - 0.5) * self.sensitivity,
            -(ny - 0.5) * self.sensitivity,
        ))
    }

    /// Offset for the first active touch, if any.
    pub fn from_touches(&self, viewport: Viewport, input: &InputState) -> Option<Vec2> {
        let touch = input.first_touch()?;
        self.from_point(viewport, touch.x, touch.y)
    }

    /// Offset from tilt; needs both `gamma` and `beta`.
    pub fn from_orientation(&self, reading: &OrientationEvent) -> Option<Vec2> {
        let (gamma, beta) = (reading.gamma?, reading.beta?);
        Some(Vec2::new(
            gamma.to_radians() * self.sensitivity,
            beta.to_radians() * self.sensitivity,
        ))
    }

    /// Offset implied by `event`, or `None` when the event carries no sample.
    ///
    /// `input` must already reflect `event` (the engine applies events to its
    /// input state before the app sees them).
    pub fn map_event(
        &self,
        viewport: Viewport,
        input: &InputState,
        event: &InputEvent,
    ) -> Option<Vec2> {
        match event {
            InputEvent::PointerMoved(p) => self.from_point(viewport, p.x, p.y),
            InputEvent::Touch(t) if t.phase == TouchPhase::Moved => {
                self.from_touches(viewport, input)
            }
            InputEvent::Orientation(reading) => self.from_orientation(reading),
            _ => None,
        }
    }

    /// Applies `event` to the camera; returns whether the camera moved.
    pub fn apply(
        &self,
        camera: &mut Camera,
        viewport: Viewport,
        input: &InputState,
        event: &InputEvent,
    ) -> bool {
        match self.map_event(viewport, input, event) {
            Some(offset) => {
                camera.set_lateral(offset);
                true
            }
            None => false,
        }
    }
}
