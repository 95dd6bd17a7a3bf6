//! Momentum scrolling
//!
//! A fling is simulated as a 1-D slider the width of the viewport sliding on a
//! rough floor. Two spring-loaded boundary stops sit at the content's edges:
//! once the slider runs past an edge it pushes the stop's board, the spring
//! compresses and throws the slider back. The slider's left edge is the
//! viewport offset in content space.
//!
//! ```text
//!        left stop                                   right stop
//!   |~~~|[ board ]                                 [ board ]|~~~|
//!         ^ 0            [=== slider ===]         ^ content width
//!                        ^ offset        ^ offset + viewport
//! ```
//!
//! Each tick advances the simulation by the frame's elapsed time and then
//! decides whether the motion is over:
//!
//! - `AtRest` becomes `OverscrollPositive`/`OverscrollNegative` when the slider
//!   moves out of bounds
//! - an overscroll state ends once the slider is moving back and has re-entered
//!   the bounds; the slider snaps exactly onto the edge and the session stops
//! - a board pushed past its travel means the integration went unstable; the
//!   slider snaps to the edge and the session stops
//! - when the speed falls below `min_speed` the session stops, snapping to the
//!   edge if it is still slightly out of bounds

use serde::{Deserialize, Serialize};

/// Frame deltas above this are treated as a hitch, not real elapsed time
const MAX_FRAME_DT: f32 = 0.1;

/// Physical constants of the momentum simulation
///
/// Units are content pixels and seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Slider mass
    pub mass: f32,
    /// Kinetic friction deceleration (px/s²)
    pub friction: f32,
    /// Boundary spring stiffness
    pub stiffness: f32,
    /// Boundary spring damping
    pub damping: f32,
    /// Speed (px/s) below which the slider counts as settled
    pub min_speed: f32,
    /// Distance (px) from an edge within which a settled slider snaps to it
    pub settle_tolerance: f32,
    /// Release velocities are clamped to ±this (px/s)
    pub max_velocity: f32,
    /// Largest integration sub-step (s)
    pub step: f32,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            friction: 1500.0,
            stiffness: 900.0,
            damping: 24.0,
            min_speed: 1.0,
            settle_tolerance: 10.0,
            max_velocity: 10000.0,
            step: 1.0 / 240.0,
        }
    }
}

/// Where the viewport sits when a fling starts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingGeometry {
    /// Current viewport offset in content space
    pub offset: f32,
    pub viewport_width: f32,
    pub content_width: f32,
    /// How far past an edge the viewport may travel before it is clamped
    pub overscroll_allowance: f32,
}

/// Tri-state moving status of a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum MovingStatus {
    /// Past the left edge, springing back
    OverscrollNegative = -1,
    /// Within bounds
    #[default]
    AtRest = 0,
    /// Past the right edge, springing back
    OverscrollPositive = 1,
}

impl MovingStatus {
    pub fn is_overscrolled(&self) -> bool {
        !matches!(self, MovingStatus::AtRest)
    }

    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

/// Result of a simulation tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Motion continues; apply the offset and keep ticking
    Running { offset: f32 },
    /// Motion is over; apply the final offset and tear the session down
    Stopped { offset: f32 },
}

impl TickOutcome {
    pub fn offset(&self) -> f32 {
        match *self {
            TickOutcome::Running { offset } | TickOutcome::Stopped { offset } => offset,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, TickOutcome::Stopped { .. })
    }
}

/// A spring-loaded stop at one content edge
#[derive(Clone, Copy, Debug)]
struct BoundaryStop {
    /// Rest position of the board: 0 or the content width
    anchor: f32,
    /// Current position of the board face
    face: f32,
    /// Travel beyond which the spring is considered torn apart
    travel: f32,
}

impl BoundaryStop {
    fn new(anchor: f32, travel: f32) -> Self {
        Self {
            anchor,
            face: anchor,
            travel,
        }
    }

    fn compression(&self) -> f32 {
        (self.face - self.anchor).abs()
    }

    fn diverged(&self) -> bool {
        !self.face.is_finite() || self.compression() > self.travel
    }
}

/// The slider and its two stops
#[derive(Debug)]
struct SliderWorld {
    /// Left edge of the slider in content space
    position: f32,
    width: f32,
    velocity: f32,
    content_width: f32,
    left: BoundaryStop,
    right: BoundaryStop,
}

impl SliderWorld {
    fn right_edge(&self) -> f32 {
        self.position + self.width
    }

    /// Move the boards to wherever the slider is pushing them
    fn press_boards(&mut self) {
        self.left.face = self.left.anchor.min(self.position);
        self.right.face = self.right.anchor.max(self.right_edge());
    }

    fn step(&mut self, config: &MomentumConfig, h: f32) {
        // Spring and damper of whichever board the slider is pressing
        let mut force = 0.0;
        let left = self.left.compression();
        if left > 0.0 {
            force += config.stiffness * left - config.damping * self.velocity;
        }
        let right = self.right.compression();
        if right > 0.0 {
            force -= config.stiffness * right + config.damping * self.velocity;
        }
        self.velocity += force / config.mass * h;

        // Friction decelerates but never reverses the slider
        let slowdown = config.friction * h;
        if self.velocity.abs() <= slowdown {
            self.velocity = 0.0;
        } else {
            self.velocity -= slowdown.copysign(self.velocity);
        }

        self.position += self.velocity * h;
        self.press_boards();
    }

    fn integrate(&mut self, config: &MomentumConfig, dt: f32) {
        let mut remaining = dt.clamp(0.0, MAX_FRAME_DT);
        while remaining > 0.0 {
            // A non-positive step would never advance; take the frame whole
            let h = if config.step > 0.0 { remaining.min(config.step) } else { remaining };
            self.step(config, h);
            remaining -= h;
        }
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Put the slider to sleep exactly on an edge
    fn snap_to(&mut self, position: f32) {
        self.position = position;
        self.velocity = 0.0;
        self.press_boards();
    }

    fn max_offset(&self) -> f32 {
        self.content_width - self.width
    }
}

/// A running fling
///
/// Exactly one session may exist per view. The owner drives it with
/// [`MomentumSession::tick`] once per frame and must call
/// [`MomentumSession::destroy`] before dropping its reference.
#[derive(Debug)]
pub struct MomentumSession {
    config: MomentumConfig,
    world: Option<SliderWorld>,
    status: MovingStatus,
    stopped: bool,
}

impl MomentumSession {
    /// Start a fling with a content-space `velocity` (px/s)
    ///
    /// # Panics
    ///
    /// Panics if the content is not wider than the viewport; there is nothing
    /// to scroll.
    pub fn start(config: MomentumConfig, geometry: FlingGeometry, velocity: f32) -> Self {
        assert!(
            geometry.viewport_width < geometry.content_width,
            "fling started on content that cannot scroll ({} <= {})",
            geometry.content_width,
            geometry.viewport_width
        );

        let clamped = velocity.clamp(-config.max_velocity, config.max_velocity);
        if clamped != velocity {
            tracing::debug!("fling velocity {} clamped to {}", velocity, clamped);
        }

        let travel = geometry.overscroll_allowance * 2.0;
        let mut world = SliderWorld {
            position: geometry.offset,
            width: geometry.viewport_width,
            velocity: clamped,
            content_width: geometry.content_width,
            left: BoundaryStop::new(0.0, travel),
            right: BoundaryStop::new(geometry.content_width, travel),
        };
        world.press_boards();

        let status = if world.position < 0.0 {
            MovingStatus::OverscrollNegative
        } else if world.right_edge() > geometry.content_width {
            MovingStatus::OverscrollPositive
        } else {
            MovingStatus::AtRest
        };

        tracing::debug!(
            "momentum session start: offset={} velocity={} status={:?}",
            geometry.offset,
            clamped,
            status
        );

        Self {
            config,
            world: Some(world),
            status,
            stopped: false,
        }
    }

    pub fn status(&self) -> MovingStatus {
        self.status
    }

    /// Whether the simulation world still exists
    pub fn is_alive(&self) -> bool {
        self.world.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Current slider velocity, zero once torn down
    pub fn velocity(&self) -> f32 {
        self.world.as_ref().map_or(0.0, |w| w.velocity)
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// # Panics
    ///
    /// Panics if the session has already been destroyed.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        let config = self.config;
        let Some(world) = self.world.as_mut() else {
            panic!("momentum tick after the session was destroyed");
        };
        if self.stopped {
            return TickOutcome::Stopped {
                offset: world.position,
            };
        }

        world.integrate(&config, dt);

        let v = world.velocity;
        let p1 = world.position;
        let p2 = world.right_edge();
        let max_offset = world.max_offset();

        // Bounds transitions
        match self.status {
            MovingStatus::AtRest => {
                if v > config.min_speed && p2 > world.content_width {
                    self.status = MovingStatus::OverscrollPositive;
                } else if v < -config.min_speed && p1 < 0.0 {
                    self.status = MovingStatus::OverscrollNegative;
                }
            }
            MovingStatus::OverscrollNegative => {
                if v > 0.0 && p1 >= 0.0 {
                    world.snap_to(0.0);
                    self.status = MovingStatus::AtRest;
                    self.stopped = true;
                }
            }
            MovingStatus::OverscrollPositive => {
                if v < 0.0 && p2 <= world.content_width {
                    world.snap_to(max_offset);
                    self.status = MovingStatus::AtRest;
                    self.stopped = true;
                }
            }
        }

        // Stability guard
        if !self.stopped && self.status.is_overscrolled() {
            let stop = match self.status {
                MovingStatus::OverscrollNegative => &world.left,
                _ => &world.right,
            };
            if stop.diverged() || !world.is_finite() {
                tracing::debug!("boundary stop diverged, snapping to edge");
                let edge = match self.status {
                    MovingStatus::OverscrollNegative => 0.0,
                    _ => max_offset,
                };
                world.snap_to(edge);
                self.status = MovingStatus::AtRest;
                self.stopped = true;
            }
        }

        // Settling guard
        if !self.stopped && world.velocity.abs() <= config.min_speed {
            let p1 = world.position;
            let overshoot = if p1 < 0.0 {
                Some((0.0, -p1))
            } else if p1 > max_offset {
                Some((max_offset, p1 - max_offset))
            } else {
                None
            };
            match overshoot {
                None => {
                    world.velocity = 0.0;
                    self.status = MovingStatus::AtRest;
                    self.stopped = true;
                }
                Some((edge, distance)) if distance <= config.settle_tolerance => {
                    world.snap_to(edge);
                    self.status = MovingStatus::AtRest;
                    self.stopped = true;
                }
                Some(_) => {}
            }
        }

        let offset = world.position;
        if self.stopped {
            tracing::debug!("momentum settled at {}", offset);
            TickOutcome::Stopped { offset }
        } else {
            tracing::trace!("momentum tick: offset={} v={} status={:?}", offset, world.velocity, self.status);
            TickOutcome::Running { offset }
        }
    }

    /// Tear down the simulation world
    ///
    /// # Panics
    ///
    /// Panics if the world was already destroyed.
    pub fn destroy(&mut self) {
        assert!(self.world.is_some(), "momentum session destroyed twice");
        self.world = None;
        tracing::debug!("momentum session destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn geometry(offset: f32) -> FlingGeometry {
        FlingGeometry {
            offset,
            viewport_width: 300.0,
            content_width: 1000.0,
            overscroll_allowance: 100.0,
        }
    }

    /// Tick until the session stops, returning the final outcome and frame count
    fn run(session: &mut MomentumSession, max_frames: usize) -> (TickOutcome, usize) {
        for frame in 1..=max_frames {
            let outcome = session.tick(FRAME);
            if outcome.is_stopped() {
                return (outcome, frame);
            }
        }
        panic!("session did not stop within {} frames", max_frames);
    }

    #[test]
    fn test_velocity_is_clamped() {
        let session = MomentumSession::start(MomentumConfig::default(), geometry(0.0), 12000.0);
        assert_eq!(session.velocity(), 10000.0);
        let session = MomentumSession::start(MomentumConfig::default(), geometry(0.0), -12000.0);
        assert_eq!(session.velocity(), -10000.0);
    }

    #[test]
    fn test_initial_status_follows_overscroll() {
        let config = MomentumConfig::default();
        assert_eq!(
            MomentumSession::start(config, geometry(-40.0), 0.0).status(),
            MovingStatus::OverscrollNegative
        );
        assert_eq!(
            MomentumSession::start(config, geometry(740.0), 0.0).status(),
            MovingStatus::OverscrollPositive
        );
        assert_eq!(
            MomentumSession::start(config, geometry(350.0), 0.0).status(),
            MovingStatus::AtRest
        );
    }

    #[test]
    fn test_strong_fling_lands_on_right_edge() {
        let mut session = MomentumSession::start(MomentumConfig::default(), geometry(0.0), 12000.0);
        assert_eq!(session.status(), MovingStatus::AtRest);
        let (outcome, _) = run(&mut session, 600);
        assert_eq!(outcome.offset(), 700.0);
        assert_eq!(session.status(), MovingStatus::AtRest);
    }

    #[test]
    fn test_weak_fling_stops_inside_bounds() {
        let mut session = MomentumSession::start(MomentumConfig::default(), geometry(100.0), 600.0);
        let (outcome, frames) = run(&mut session, 600);
        // v² / 2a = 120 px of travel
        assert!((outcome.offset() - 220.0).abs() < 2.0, "offset {}", outcome.offset());
        assert!(frames < 60);
        assert_eq!(session.status(), MovingStatus::AtRest);
    }

    #[test]
    fn test_overscroll_springs_back_to_left_edge() {
        let mut session = MomentumSession::start(MomentumConfig::default(), geometry(-60.0), 0.0);
        let (outcome, _) = run(&mut session, 600);
        assert_eq!(outcome.offset(), 0.0);
        assert_eq!(session.status(), MovingStatus::AtRest);
    }

    #[test]
    fn test_bounce_off_left_edge() {
        let mut session = MomentumSession::start(MomentumConfig::default(), geometry(50.0), -1500.0);
        let mut saw_overscroll = false;
        for _ in 0..600 {
            let outcome = session.tick(FRAME);
            saw_overscroll |= session.status() == MovingStatus::OverscrollNegative;
            if outcome.is_stopped() {
                assert_eq!(outcome.offset(), 0.0);
                assert!(saw_overscroll);
                return;
            }
        }
        panic!("bounce did not settle");
    }

    #[test]
    fn test_terminates_for_many_velocities() {
        let config = MomentumConfig::default();
        for v in [-10000.0, -4000.0, -800.0, -5.0, 3.0, 250.0, 2500.0, 9000.0] {
            for offset in [-90.0, 0.0, 420.0, 700.0, 790.0] {
                let mut session = MomentumSession::start(config, geometry(offset), v);
                let (outcome, _) = run(&mut session, 2000);
                assert!((0.0..=700.0).contains(&outcome.offset()), "v={} offset={}", v, offset);
            }
        }
    }

    #[test]
    fn test_torn_boundary_snaps_to_edge() {
        // A 10 px allowance lets a full-speed fling tear through the right
        // stop within a single frame
        let geometry = FlingGeometry {
            overscroll_allowance: 10.0,
            ..geometry(0.0)
        };
        let mut session = MomentumSession::start(MomentumConfig::default(), geometry, 10000.0);
        let (outcome, frames) = run(&mut session, 600);
        assert_eq!(outcome, TickOutcome::Stopped { offset: 700.0 });
        assert!(frames <= 5, "snapped after {} frames", frames);
        assert_eq!(session.status(), MovingStatus::AtRest);
        assert_eq!(session.velocity(), 0.0);
        assert!(session.is_stopped());
    }

    #[test]
    fn test_zero_step_still_advances() {
        let config = MomentumConfig {
            step: 0.0,
            ..MomentumConfig::default()
        };
        let mut session = MomentumSession::start(config, geometry(100.0), 600.0);
        let (outcome, _) = run(&mut session, 600);
        assert!((0.0..=700.0).contains(&outcome.offset()));
        assert_eq!(session.status(), MovingStatus::AtRest);
    }

    #[test]
    fn test_stopped_session_does_not_move() {
        let mut session = MomentumSession::start(MomentumConfig::default(), geometry(300.0), 0.0);
        let first = session.tick(FRAME);
        assert!(first.is_stopped());
        assert_eq!(session.tick(FRAME), first);
    }

    #[test]
    #[should_panic(expected = "destroyed twice")]
    fn test_double_destroy_panics() {
        let mut session = MomentumSession::start(MomentumConfig::default(), geometry(0.0), 100.0);
        session.destroy();
        assert!(!session.is_alive());
        session.destroy();
    }

    #[test]
    #[should_panic(expected = "cannot scroll")]
    fn test_start_requires_scrollable_content() {
        let geometry = FlingGeometry {
            content_width: 300.0,
            ..geometry(0.0)
        };
        MomentumSession::start(MomentumConfig::default(), geometry, 100.0);
    }

    #[test]
    fn test_config_from_partial_toml() {
        let config: MomentumConfig = toml::from_str("friction = 900.0\nstep = 0.002").unwrap();
        assert_eq!(config.friction, 900.0);
        assert_eq!(config.step, 0.002);
        assert_eq!(config.stiffness, MomentumConfig::default().stiffness);
    }
}
