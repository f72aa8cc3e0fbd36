use ::winit::dpi::PhysicalPosition;
use ::winit::event::{ElementState, TouchPhase as WinitTouchPhase, WindowEvent};
use ::winit::keyboard::{KeyCode, PhysicalKey};
use ::winit::window::Window;

use crate::coords::Viewport;
use crate::input::{InputEvent, Key, KeyState, PointerMoveEvent, TouchEvent, TouchPhase};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }

        WindowEvent::Touch(touch) => {
            let (x, y) = to_logical_f32(window, touch.location);
            Some(InputEvent::Touch(TouchEvent {
                id: touch.id,
                phase: map_touch_phase(touch.phase),
                x,
                y,
            }))
        }

        WindowEvent::Resized(size) => {
            let logical = size.to_logical::<f32>(window.scale_factor());
            Some(InputEvent::Resized(Viewport::new(logical.width, logical.height)))
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_touch_phase(phase: WinitTouchPhase) -> TouchPhase {
    match phase {
        WinitTouchPhase::Started => TouchPhase::Started,
        WinitTouchPhase::Moved => TouchPhase::Moved,
        WinitTouchPhase::Ended => TouchPhase::Ended,
        WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(KeyCode::Space) => Key::Space,
        PhysicalKey::Code(KeyCode::F11) => Key::F11,
        PhysicalKey::Code(other) => Key::Unknown(other as u32),
        // NativeKeyCode carries no stable numeric.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_phases_map_one_to_one() {
        assert_eq!(map_touch_phase(WinitTouchPhase::Started), TouchPhase::Started);
        assert_eq!(map_touch_phase(WinitTouchPhase::Moved), TouchPhase::Moved);
        assert_eq!(map_touch_phase(WinitTouchPhase::Ended), TouchPhase::Ended);
        assert_eq!(map_touch_phase(WinitTouchPhase::Cancelled), TouchPhase::Cancelled);
    }

    #[test]
    fn named_keys_map() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F11)), Key::F11);
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Unknown(_)));
    }
}
