//! Glide Paint
//!
//! The drawing surface the scroll view composites onto.
//!
//! # Features
//!
//! - RGBA8 [`Surface`] buffers that double as off-screen caches
//! - Solid and alpha-blended rectangle fills
//! - Block copies between surfaces and overlapping in-place scroll copies
//! - [`PaintContext`] sub-contexts with translation and clip-rect intersection

pub mod color;
pub mod context;
pub mod surface;

pub use color::Color;
pub use context::PaintContext;
pub use surface::Surface;
