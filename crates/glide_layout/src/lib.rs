//! Glide Layout
//!
//! A horizontally scrolling view for touch screens. It combines three parts:
//!
//! - **Gesture disambiguation** ([`gesture`]): decides whether a press is a
//!   tap for the content or a drag for the view
//! - **Momentum scrolling**: flings continue under friction and bounce off
//!   spring-loaded edges, driven by `glide_animation`
//! - **Render caching** ([`render_cache`]): scrolling copies the pixels that
//!   stay visible and re-renders only the exposed strip
//!
//! [`HScrollView`] ties them together.

pub mod config;
pub mod error;
pub mod gesture;
pub mod piece;
pub mod render_cache;
pub mod scrollbar;
pub mod widgets;

pub use config::{GestureTimings, ScrollViewConfig, ScrollbarStyle};
pub use error::{LayoutError, Result};
pub use gesture::{GestureFlags, GesturePhase, GestureTracker};
pub use piece::{Piece, PieceId};
pub use render_cache::{ReconcileReport, RenderCache};
pub use widgets::HScrollView;
