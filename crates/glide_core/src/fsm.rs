//! Event-driven state transitions
//!
//! Widget interaction states are plain enums. Implementing
//! [`StateTransitions`] maps `(state, event)` pairs to the next state:
//!
//! ```rust
//! use glide_core::events::event_types::*;
//! use glide_core::fsm::StateTransitions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Touch {
//!     Idle,
//!     Down,
//! }
//!
//! impl StateTransitions for Touch {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Touch::Idle, POINTER_DOWN) => Some(Touch::Down),
//!             (Touch::Down, POINTER_UP) => Some(Touch::Idle),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut state = Touch::Idle;
//! assert!(state.transition(POINTER_DOWN));
//! assert!(!state.transition(POINTER_DOWN));
//! assert_eq!(state, Touch::Down);
//! ```

use std::hash::Hash;

use crate::events::EventType;

/// Trait for state types that change in response to events
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventType) -> Option<Self>;

    /// Apply `event` in place, returning whether the state changed
    fn transition(&mut self, event: EventType) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                tracing::trace!("state {:?} -> {:?} (event {})", self, next, event);
                *self = next;
                true
            }
            _ => false,
        }
    }
}
