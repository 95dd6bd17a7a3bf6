//! Frame driver
//!
//! Turns the host's frame timestamps into the time step fed to a simulation.

/// Measures the time between animation frames
#[derive(Clone, Debug)]
pub struct FrameTicker {
    last_frame_ms: Option<u64>,
    frame_rate: u32,
}

impl FrameTicker {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            last_frame_ms: None,
            frame_rate: frame_rate.max(1),
        }
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Seconds elapsed since the previous frame
    ///
    /// The first frame after construction or [`FrameTicker::reset`] has no
    /// predecessor and advances by one nominal frame.
    pub fn tick(&mut self, now_ms: u64) -> f32 {
        let dt = match self.last_frame_ms {
            Some(last) => now_ms.saturating_sub(last) as f32 / 1000.0,
            None => 1.0 / self.frame_rate as f32,
        };
        self.last_frame_ms = Some(now_ms);
        dt
    }

    pub fn reset(&mut self) {
        self.last_frame_ms = None;
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_nominal_frame() {
        let mut ticker = FrameTicker::new(50);
        assert_eq!(ticker.tick(1000), 0.02);
        assert_eq!(ticker.tick(1016), 0.016);
        assert_eq!(ticker.tick(1000), 0.0);
        ticker.reset();
        assert_eq!(ticker.tick(5000), 0.02);
    }
}
