//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into `InputEvent`s via
//! [`platform::winit`]; sensors the windowing layer does not know about
//! (device orientation) plug in through [`OrientationSource`].

mod frame;
pub(crate) mod platform;
mod sensor;
mod state;
mod types;

pub use frame::InputFrame;
pub use sensor::{OrientationSource, ScriptedOrientation};
pub use state::{ActiveTouch, InputState};
pub use types::{
    InputEvent,
    Key,
    KeyState,
    OrientationEvent,
    PointerMoveEvent,
    TouchEvent,
    TouchPhase,
};
