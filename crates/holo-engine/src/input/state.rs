use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, PointerMoveEvent, TouchEvent, TouchPhase};

/// A finger currently on the surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ActiveTouch {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

/// Current input state for the window.
///
/// Holds "is down" information, pointer position and active touches.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Active touches in the order they started.
    pub touches: Vec<ActiveTouch>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Touch(t) => self.apply_touch(t),

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::Orientation(_) | InputEvent::Resized(_) => {}
        }

        frame.push_event(ev);
    }

    fn apply_touch(&mut self, t: &TouchEvent) {
        let existing = self.touches.iter().position(|a| a.id == t.id);
        match (t.phase, existing) {
            (TouchPhase::Started, None) => self.touches.push(ActiveTouch { id: t.id, x: t.x, y: t.y }),
            (TouchPhase::Started | TouchPhase::Moved, Some(i)) => {
                self.touches[i].x = t.x;
                self.touches[i].y = t.y;
            }
            (TouchPhase::Ended | TouchPhase::Cancelled, Some(i)) => {
                self.touches.remove(i);
            }
            // Moves/ends for fingers we never saw start are dropped.
            (TouchPhase::Moved | TouchPhase::Ended | TouchPhase::Cancelled, None) => {}
        }
    }

    /// First still-active touch, by start order.
    pub fn first_touch(&self) -> Option<ActiveTouch> {
        self.touches.first().copied()
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}
