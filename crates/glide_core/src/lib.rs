//! Glide Core
//!
//! Foundational primitives shared by the Glide widget crates:
//!
//! - **Geometry**: pixel-addressed `Point`, `Size` and half-open `Rect`
//! - **Events**: pointer event model and the handled / pass-through response
//! - **State transitions**: event-driven state enums
//! - **Timers**: one-shot timers keyed by cancellation tokens
//!
//! # Example
//!
//! ```rust
//! use glide_core::geometry::Rect;
//!
//! let cached = Rect::new(0, 0, 300, 40);
//! let visible = Rect::new(50, 0, 350, 40);
//! assert_eq!(cached.intersect(&visible), Rect::new(50, 0, 300, 40));
//! assert_eq!(visible.subtract(&cached).as_slice(), &[Rect::new(300, 0, 350, 40)]);
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;
pub mod timer;

pub use events::{Event, EventData, EventResponse, EventType};
pub use fsm::StateTransitions;
pub use geometry::{Point, Rect, Size};
pub use timer::{TimerId, TimerQueue};
