//! Widgets built on pieces

pub mod hscroll;

pub use hscroll::HScrollView;
