//! Scroll view configuration
//!
//! Every tunable of [`HScrollView`](crate::HScrollView) lives here. Missing
//! keys fall back to the defaults, so a config file only lists what it changes:
//!
//! ```toml
//! overscroll_allowance = 60
//!
//! [gesture]
//! press_timeout_ms = 150
//!
//! [momentum]
//! friction = 1200.0
//! ```

use std::fs;
use std::path::Path;

use glide_animation::MomentumConfig;
use glide_paint::Color;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Tap/drag disambiguation timings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTimings {
    /// Time after press at which a still pointer is handed to the content
    pub press_timeout_ms: u64,
    /// A release sooner than this after press may still count as a click
    pub click_timeout_ms: u64,
    /// Largest L1 movement (px) a click may have
    pub click_micro_movement: i32,
}

impl Default for GestureTimings {
    fn default() -> Self {
        Self {
            press_timeout_ms: 200,
            click_timeout_ms: 80,
            click_micro_movement: 8,
        }
    }
}

/// Scrollbar indicator appearance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarStyle {
    pub thickness: i32,
    /// Gap between the thumb and the bottom of the view
    pub bottom_margin: i32,
    /// Upper bound on the padding at either end of the track
    pub max_padding: i32,
    /// RGBA
    pub color: [u8; 4],
    /// Delay before the indicator hides once motion has settled
    pub auto_hide_ms: u64,
}

impl ScrollbarStyle {
    pub fn thumb_color(&self) -> Color {
        let [r, g, b, a] = self.color;
        Color::from_rgba8(r, g, b, a)
    }
}

impl Default for ScrollbarStyle {
    fn default() -> Self {
        Self {
            thickness: 3,
            bottom_margin: 4,
            max_padding: 10,
            color: [0, 0, 0, 0x50],
            auto_hide_ms: 500,
        }
    }
}

/// Configuration of a horizontal scroll view
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollViewConfig {
    /// How far (px) the viewport may travel past either content edge
    pub overscroll_allowance: i32,
    /// Leftward release speed (px/s) that also forwards a press to the content
    pub reveal_fling_velocity: f32,
    /// Whether the off-screen render cache starts enabled
    pub cacheable: bool,
    /// Whether the scrollbar indicator is wanted at all
    pub show_scrollbar: bool,
    /// Nominal frame rate, used for the first frame of a fling
    pub frame_rate: u32,
    pub gesture: GestureTimings,
    pub scrollbar: ScrollbarStyle,
    pub momentum: MomentumConfig,
}

impl Default for ScrollViewConfig {
    fn default() -> Self {
        Self {
            overscroll_allowance: 100,
            reveal_fling_velocity: 1500.0,
            cacheable: true,
            show_scrollbar: true,
            frame_rate: 60,
            gesture: GestureTimings::default(),
            scrollbar: ScrollbarStyle::default(),
            momentum: MomentumConfig::default(),
        }
    }
}

impl ScrollViewConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ScrollViewConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        tracing::debug!("loaded scroll view config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LayoutError::InvalidConfig(e.to_string()))
    }

    /// Reject values the gesture machine or the momentum simulation cannot work with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(LayoutError::InvalidConfig(msg));

        if self.gesture.press_timeout_ms == 0 {
            return invalid("gesture.press_timeout_ms must be positive".into());
        }
        if self.gesture.click_timeout_ms == 0 {
            return invalid("gesture.click_timeout_ms must be positive".into());
        }
        if self.gesture.click_micro_movement < 0 {
            return invalid("gesture.click_micro_movement must not be negative".into());
        }
        if self.overscroll_allowance <= 0 {
            return invalid("overscroll_allowance must be positive".into());
        }
        if self.frame_rate == 0 {
            return invalid("frame_rate must be positive".into());
        }
        if self.scrollbar.thickness < 0 || self.scrollbar.bottom_margin < 0 || self.scrollbar.max_padding < 0 {
            return invalid("scrollbar geometry must not be negative".into());
        }

        let m = &self.momentum;
        for (name, value) in [
            ("mass", m.mass),
            ("stiffness", m.stiffness),
            ("step", m.step),
            ("max_velocity", m.max_velocity),
        ] {
            if value.is_nan() || value <= 0.0 {
                return invalid(format!("momentum.{} must be positive, got {}", name, value));
            }
        }
        for (name, value) in [
            ("friction", m.friction),
            ("damping", m.damping),
            ("min_speed", m.min_speed),
            ("settle_tolerance", m.settle_tolerance),
        ] {
            if value.is_nan() || value < 0.0 {
                return invalid(format!("momentum.{} must not be negative, got {}", name, value));
            }
        }
        // Friction strong enough to hold the slider against a boundary spring
        // further out than the snap tolerance would leave it stuck overscrolled
        let hold = m.friction * m.mass / m.stiffness;
        if hold >= m.settle_tolerance {
            return invalid(format!(
                "momentum friction can hold the view {:.1}px overscrolled, beyond settle_tolerance {}",
                hold, m.settle_tolerance
            ));
        }

        Ok(())
    }
}
