use std::collections::VecDeque;

use super::types::OrientationEvent;

/// Source of device-orientation readings.
///
/// winit has no orientation events, so sensors are polled by the app once per
/// frame. Having no source installed means the capability is absent.
pub trait OrientationSource {
    /// Returns the next pending reading, if any.
    fn poll(&mut self) -> Option<OrientationEvent>;
}

/// Replays a fixed sequence of readings, one per poll.
///
/// Used for demos on hardware without sensors and for tests.
#[derive(Debug, Default)]
pub struct ScriptedOrientation {
    readings: VecDeque<OrientationEvent>,
}

impl ScriptedOrientation {
    pub fn new(readings: impl IntoIterator<Item = OrientationEvent>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
        }
    }

    pub fn push(&mut self, reading: OrientationEvent) {
        self.readings.push_back(reading);
    }
}

impl OrientationSource for ScriptedOrientation {
    fn poll(&mut self) -> Option<OrientationEvent> {
        self.readings.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_replays_in_order() {
        let a = OrientationEvent { gamma: Some(10.0), beta: Some(0.0), alpha: None };
        let b = OrientationEvent { gamma: Some(-5.0), beta: Some(2.0), alpha: None };
        let mut src = ScriptedOrientation::new([a, b]);
        assert_eq!(src.poll(), Some(a));
        assert_eq!(src.poll(), Some(b));
        assert_eq!(src.poll(), None);
    }
}
