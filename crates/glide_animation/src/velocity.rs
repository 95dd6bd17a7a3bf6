//! Pointer velocity tracking
//!
//! Velocity is a running average of per-move velocities: each new sample is
//! averaged with the previous estimate, so the release velocity reflects the
//! last few moves rather than the whole drag. A pointer that stood still for a
//! while before release carries no velocity.

use glide_core::geometry::Point;

/// Samples older than this no longer count at release
const STALE_MS: u64 = 100;

/// Gaps longer than this are a pause, not motion
const MAX_SAMPLE_GAP_MS: u64 = 500;

/// Smoothed pointer velocity in px/s
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    last: Option<(Point, u64)>,
    velocity: (f32, f32),
    has_estimate: bool,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking from a press at `at`
    pub fn reset(&mut self, at: Point, now_ms: u64) {
        self.last = Some((at, now_ms));
        self.velocity = (0.0, 0.0);
        self.has_estimate = false;
    }

    /// Record a pointer sample
    pub fn record(&mut self, at: Point, now_ms: u64) {
        let Some((prev, prev_ms)) = self.last else {
            self.reset(at, now_ms);
            return;
        };
        let dt_ms = now_ms.saturating_sub(prev_ms);
        if dt_ms == 0 {
            // Coalesced samples: keep the first timestamp so the next delta is measured from it
            return;
        }
        self.last = Some((at, now_ms));
        if dt_ms >= MAX_SAMPLE_GAP_MS {
            self.velocity = (0.0, 0.0);
            self.has_estimate = false;
            return;
        }

        let dt = dt_ms as f32 / 1000.0;
        let instant = ((at.x - prev.x) as f32 / dt, (at.y - prev.y) as f32 / dt);
        self.velocity = if self.has_estimate {
            (
                (self.velocity.0 + instant.0) / 2.0,
                (self.velocity.1 + instant.1) / 2.0,
            )
        } else {
            instant
        };
        self.has_estimate = true;
    }

    /// Velocity as seen at `now_ms`
    pub fn velocity(&self, now_ms: u64) -> (f32, f32) {
        match self.last {
            Some((_, at_ms)) if now_ms.saturating_sub(at_ms) <= STALE_MS => self.velocity,
            _ => (0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_instant_velocity() {
        let mut tracker = VelocityTracker::new();
        tracker.reset(Point::new(100, 0), 0);
        tracker.record(Point::new(90, 0), 10);
        assert_eq!(tracker.velocity(10), (-1000.0, 0.0));
    }

    #[test]
    fn test_samples_are_averaged() {
        let mut tracker = VelocityTracker::new();
        tracker.reset(Point::new(0, 0), 0);
        tracker.record(Point::new(10, 0), 10);
        tracker.record(Point::new(40, 0), 20);
        assert_eq!(tracker.velocity(20), (2000.0, 0.0));
    }

    #[test]
    fn test_coalesced_sample_is_skipped() {
        let mut tracker = VelocityTracker::new();
        tracker.reset(Point::new(0, 0), 0);
        tracker.record(Point::new(5, 0), 0);
        assert_eq!(tracker.velocity(0), (0.0, 0.0));
        tracker.record(Point::new(10, 0), 10);
        assert_eq!(tracker.velocity(10), (1000.0, 0.0));
    }

    #[test]
    fn test_stale_velocity_is_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.reset(Point::new(0, 0), 0);
        tracker.record(Point::new(50, 0), 10);
        assert_eq!(tracker.velocity(110), (5000.0, 0.0));
        assert_eq!(tracker.velocity(111), (0.0, 0.0));
    }

    #[test]
    fn test_long_pause_drops_estimate() {
        let mut tracker = VelocityTracker::new();
        tracker.reset(Point::new(0, 0), 0);
        tracker.record(Point::new(50, 0), 10);
        tracker.record(Point::new(51, 0), 1000);
        assert_eq!(tracker.velocity(1000), (0.0, 0.0));
    }
}
