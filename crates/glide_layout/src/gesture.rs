//! Tap/drag disambiguation
//!
//! A scroll view sits on top of content that has its own taps. Every press is
//! first held by the view; [`GestureTracker`] then decides who owns it:
//!
//! ```text
//!             move                      release
//!   Pressed ---------> Dragging ------------------> Idle  (fling)
//!      |
//!      | still for press_timeout, or released as a click
//!      v
//!   TimedOut ------------------------------------> Idle  (pass to child)
//! ```
//!
//! Once a press times out the content receives a synthetic press at the
//! original press position and every later event of the gesture passes
//! through to it. The tracker only classifies; the view acts on the outcome.

use glide_core::events::event_types::{POINTER_DOWN, POINTER_MOVE, POINTER_UP, PRESS_TIMEOUT};
use glide_core::events::EventType;
use glide_core::fsm::StateTransitions;
use glide_core::geometry::Point;

use crate::config::GestureTimings;

/// Classification of the current gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Down, not yet classified
    Pressed,
    /// Moved before the press timed out; the view pans
    Dragging,
    /// Handed over to the content
    TimedOut,
}

impl StateTransitions for GesturePhase {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use GesturePhase::*;
        match (self, event) {
            (_, POINTER_DOWN) => Some(Pressed),
            (Pressed, POINTER_MOVE) => Some(Dragging),
            (Pressed, PRESS_TIMEOUT) => Some(TimedOut),
            (Idle, _) => None,
            (_, POINTER_UP) => Some(Idle),
            _ => None,
        }
    }
}

/// Per-gesture flag bits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureFlags {
    bits: u8,
}

impl GestureFlags {
    /// A move arrived while pressed
    pub const MOVED: u8 = 0b01;
    /// The press stopped a running momentum session
    pub const INTERRUPTED: u8 = 0b10;

    pub fn contains(&self, bit: u8) -> bool {
        self.bits & bit != 0
    }

    pub fn insert(&mut self, bit: u8) {
        self.bits |= bit;
    }

    pub fn remove(&mut self, bit: u8) {
        self.bits &= !bit;
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }
}

/// What the view must do after a press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PressOutcome {
    /// Stop and tear down the running momentum session
    pub interrupt_momentum: bool,
    /// (Re)arm the press disambiguation timer
    pub arm_timer: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveAction {
    /// No press is active
    Dropped,
    /// The content owns this gesture
    PassToChild,
    /// Pan by this pointer delta (previous minus current position)
    Pan { dx: i32, dy: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub action: MoveAction,
    /// Deliver a synthetic press to the content at this view position first
    pub forward_press: Option<Point>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseAction {
    /// No press is active
    Dropped,
    /// The content owns this gesture
    PassToChild,
    /// A drag ended; hand the release velocity to the momentum engine
    Fling,
    /// Consumed by the view
    Handled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub action: ReleaseAction,
    /// Deliver a synthetic press to the content at this view position first
    pub forward_press: Option<Point>,
}

/// Pointer gesture state of a scroll view
#[derive(Clone, Debug)]
pub struct GestureTracker {
    timings: GestureTimings,
    phase: GesturePhase,
    flags: GestureFlags,
    /// Signed so a click can back-date it below zero
    press_ms: i64,
    press_pos: Point,
    last_pos: Point,
}

impl GestureTracker {
    pub fn new(timings: GestureTimings) -> Self {
        Self {
            timings,
            phase: GesturePhase::Idle,
            flags: GestureFlags::default(),
            press_ms: 0,
            press_pos: Point::ZERO,
            last_pos: Point::ZERO,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn flags(&self) -> GestureFlags {
        self.flags
    }

    pub fn is_pressed(&self) -> bool {
        self.phase != GesturePhase::Idle
    }

    pub fn is_timed_out(&self) -> bool {
        self.phase == GesturePhase::TimedOut
    }

    pub fn press_position(&self) -> Point {
        self.press_pos
    }

    pub fn last_position(&self) -> Point {
        self.last_pos
    }

    pub fn press(&mut self, at: Point, now_ms: u64, momentum_active: bool) -> PressOutcome {
        self.phase.transition(POINTER_DOWN);
        self.flags.clear();
        self.press_ms = now_ms as i64;
        self.press_pos = at;
        self.last_pos = at;

        if momentum_active {
            self.flags.insert(GestureFlags::INTERRUPTED);
            PressOutcome {
                interrupt_momentum: true,
                arm_timer: false,
            }
        } else {
            PressOutcome {
                interrupt_momentum: false,
                arm_timer: true,
            }
        }
    }

    /// Time the press out if it has been held long enough
    ///
    /// Returns where the content should receive its synthetic press. Presses
    /// that stopped a fling belong to the view and never time out.
    pub fn check_timeout(&mut self, now_ms: u64) -> Option<Point> {
        if self.phase != GesturePhase::Pressed || self.flags.contains(GestureFlags::INTERRUPTED) {
            return None;
        }
        if now_ms as i64 - self.press_ms < self.timings.press_timeout_ms as i64 {
            return None;
        }
        self.phase.transition(PRESS_TIMEOUT);
        tracing::debug!("press timed out, forwarding to content at {:?}", self.press_pos);
        Some(self.press_pos)
    }

    pub fn pointer_move(&mut self, at: Point, now_ms: u64) -> MoveOutcome {
        if !self.is_pressed() {
            tracing::debug!("pointer move without press, dropped");
            return MoveOutcome {
                action: MoveAction::Dropped,
                forward_press: None,
            };
        }

        let mut forward_press = None;
        if self.phase == GesturePhase::Pressed {
            forward_press = self.check_timeout(now_ms);
            if forward_press.is_none() {
                self.flags.insert(GestureFlags::MOVED);
                self.phase.transition(POINTER_MOVE);
            }
        }

        let previous = self.last_pos;
        self.last_pos = at;

        let action = match self.phase {
            GesturePhase::TimedOut => {
                tracing::trace!("move after timeout, passing to content");
                MoveAction::PassToChild
            }
            _ => MoveAction::Pan {
                dx: previous.x - at.x,
                dy: previous.y - at.y,
            },
        };
        MoveOutcome { action, forward_press }
    }

    pub fn release(&mut self, at: Point, now_ms: u64) -> ReleaseOutcome {
        if !self.is_pressed() {
            return ReleaseOutcome {
                action: ReleaseAction::Dropped,
                forward_press: None,
            };
        }
        self.last_pos = at;

        let mut forward_press = None;
        if !self.flags.contains(GestureFlags::INTERRUPTED) && !self.is_timed_out() && self.is_click(at, now_ms) {
            // Treat it as a press held for the full window so the content
            // gets its press right away
            self.phase = GesturePhase::Pressed;
            self.flags.remove(GestureFlags::MOVED);
            self.press_ms -= self.timings.press_timeout_ms as i64;
            forward_press = self.check_timeout(now_ms);
        }

        let action = match self.phase {
            GesturePhase::TimedOut => ReleaseAction::PassToChild,
            GesturePhase::Dragging => ReleaseAction::Fling,
            _ => ReleaseAction::Handled,
        };
        self.phase.transition(POINTER_UP);
        tracing::trace!("release classified as {:?}", action);
        ReleaseOutcome { action, forward_press }
    }

    fn is_click(&self, at: Point, now_ms: u64) -> bool {
        if !self.flags.contains(GestureFlags::MOVED) {
            return true;
        }
        let elapsed = now_ms as i64 - self.press_ms;
        elapsed < self.timings.click_timeout_ms as i64
            && at.manhattan_distance(self.press_pos) < self.timings.click_micro_movement
    }
}
