//! Glide Animation System
//!
//! Momentum scrolling driven one animation frame at a time.
//!
//! # Features
//!
//! - **Momentum sessions**: a 1-D slider on a rough floor, decelerated by
//!   friction and bounced back by spring-loaded boundary stops
//! - **Velocity tracking**: smoothed pointer velocity for fling detection
//! - **Frame ticking**: host timestamps turned into bounded time steps

pub mod momentum;
pub mod scheduler;
pub mod velocity;

pub use momentum::{FlingGeometry, MomentumConfig, MomentumSession, MovingStatus, TickOutcome};
pub use scheduler::FrameTicker;
pub use velocity::VelocityTracker;
