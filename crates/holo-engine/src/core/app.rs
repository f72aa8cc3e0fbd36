use crate::input::{InputEvent, InputState};

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the viewer.
///
/// All callbacks run on the event-loop thread and run to completion, so an
/// app may mutate its state freely without synchronization.
pub trait App {
    /// Called once the window and GPU exist, before the first frame.
    fn on_start(&mut self, window: &WindowCtx<'_>) {
        let _ = window;
    }

    /// Called for every translated input/window event, after `input` was updated.
    fn on_input(
        &mut self,
        window: &WindowCtx<'_>,
        input: &InputState,
        event: &InputEvent,
    ) -> AppControl {
        let _ = (window, input, event);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
