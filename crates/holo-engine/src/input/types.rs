use std::fmt;

use crate::coords::Viewport;

/// Keyboard key identifier.
///
/// Only keys the viewer reacts to are named; everything else maps to
/// `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    F11,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Pointer move event in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Single touch point update in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchEvent {
    /// Stable identifier for the finger across phases.
    pub id: u64,
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
}

/// Device orientation reading in degrees.
///
/// Readings are optional per axis: sensors may report some axes as unknown.
/// - `alpha`: rotation around the z axis, `[0, 360)`
/// - `beta`: front/back tilt, `[-180, 180)`
/// - `gamma`: left/right tilt, `[-90, 90)`
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OrientationEvent {
    pub alpha: Option<f32>,
    pub beta: Option<f32>,
    pub gamma: Option<f32>,
}

/// Platform-agnostic events delivered to the app.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved(PointerMoveEvent),

    /// Pointer left the window surface.
    PointerLeft,

    Touch(TouchEvent),

    Orientation(OrientationEvent),

    Key {
        key: Key,
        state: KeyState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),

    /// Window content area changed size (logical pixels).
    Resized(Viewport),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
