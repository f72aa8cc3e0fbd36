/// Pop-out clock: `z = depth * sin²(time)`, advanced once per rendered frame.
///
/// There is no pause or reset; a new clock starts from zero.
#[derive(Debug, Clone)]
pub struct PopOutClock {
    time: f64,
    speed: f64,
    depth: f32,
}

impl PopOutClock {
    pub fn new(speed: f64, depth: f32) -> Self {
        Self {
            time: 0.0,
            speed,
            depth,
        }
    }

    /// Advances one frame and returns the new displacement.
    pub fn tick(&mut self) -> f32 {
        self.time += self.speed;
        self.displacement()
    }

    /// Displacement at the current phase, always in `[0, depth]`.
    pub fn displacement(&self) -> f32 {
        let s = self.time.sin();
        (self.depth as f64 * s * s) as f32
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }
}
