//! Switch configuration and palette.

use super::SwitchError;
use flick_core::{color::hex, Color, Easing};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Press-to-release latency at or below which a gesture counts as a tap.
pub const TAP_THRESHOLD: Duration = Duration::from_millis(300);

/// Delay between pointer down and entering the drag-pending phase.
pub const PENDING_DRAG_DELAY: Duration = Duration::from_millis(100);

/// Preferred width when the parent leaves it open.
pub const DEFAULT_WIDTH: f32 = 58.0;

/// Preferred height when the parent leaves it open.
pub const DEFAULT_HEIGHT: f32 = 36.0;

/// Behavior and appearance of a switch, fixed at construction.
///
/// Every field is optional in serialized form.
///
/// ```
/// use flick_widgets::SwitchConfig;
///
/// let config = SwitchConfig::from_toml(
///     r##"
///     checked = true
///     animation_duration_ms = 200
///
///     [palette]
///     checked_color = "#2196f3"
///     "##,
/// )
/// .unwrap();
///
/// assert!(config.checked);
/// assert_eq!(config.animation_duration().as_millis(), 200);
/// assert!(config.enable_animation);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchConfig {
    /// Initial checked value
    pub checked: bool,
    /// Length of every timed transition, in milliseconds
    pub animation_duration_ms: u64,
    /// Animate programmatic and tap toggles
    pub enable_animation: bool,
    /// Draw a drop shadow under the knob
    pub enable_shadow: bool,
    /// Draw the on/off indicator glyphs
    pub show_indicator: bool,
    /// Progress curve applied to timed transitions
    pub easing: Easing,
    /// Colors and stroke sizes handed to the renderer
    pub palette: SwitchPalette,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            checked: false,
            animation_duration_ms: 300,
            enable_animation: true,
            enable_shadow: true,
            show_indicator: true,
            easing: Easing::AccelerateDecelerate,
            palette: SwitchPalette::default(),
        }
    }
}

impl SwitchConfig {
    /// Parse a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, SwitchError> {
        Ok(toml::from_str(source)?)
    }

    /// Transition duration.
    #[must_use]
    pub const fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Set the initial checked value.
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set the transition duration.
    #[must_use]
    pub fn animation_duration_ms(mut self, ms: u64) -> Self {
        self.animation_duration_ms = ms;
        self
    }

    /// Enable or disable animated toggles.
    #[must_use]
    pub const fn enable_animation(mut self, enable: bool) -> Self {
        self.enable_animation = enable;
        self
    }

    /// Enable or disable the knob shadow.
    #[must_use]
    pub const fn enable_shadow(mut self, enable: bool) -> Self {
        self.enable_shadow = enable;
        self
    }

    /// Show or hide the indicator glyphs.
    #[must_use]
    pub const fn show_indicator(mut self, show: bool) -> Self {
        self.show_indicator = show;
        self
    }

    /// Set the transition easing.
    #[must_use]
    pub const fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Replace the palette.
    #[must_use]
    pub fn palette(mut self, palette: SwitchPalette) -> Self {
        self.palette = palette;
        self
    }
}

/// Colors and stroke metrics. Lengths are in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchPalette {
    /// Pill background behind everything
    #[serde(with = "hex")]
    pub background: Color,
    /// Fill and border color when unchecked
    #[serde(with = "hex")]
    pub uncheck_color: Color,
    /// Fill color when checked
    #[serde(with = "hex")]
    pub checked_color: Color,
    /// Pill border width
    pub border_width: f32,
    /// Checked indicator line color
    #[serde(with = "hex")]
    pub check_line_color: Color,
    /// Checked indicator line width
    pub check_line_width: f32,
    /// Half-length of the checked indicator line
    pub check_line_length: f32,
    /// Unchecked indicator circle color
    #[serde(with = "hex")]
    pub uncheck_circle_color: Color,
    /// Unchecked indicator circle stroke width
    pub uncheck_circle_width: f32,
    /// Unchecked indicator circle radius
    pub uncheck_circle_radius: f32,
    /// Distance of the unchecked circle from the pill's right edge
    pub uncheck_circle_offset_x: f32,
    /// Checked line top x offset from the left knob center
    pub checked_line_offset_x: f32,
    /// Checked line bottom x offset from the left knob center
    pub checked_line_offset_y: f32,
    /// Knob color, used when the per-state colors are unset
    #[serde(with = "hex")]
    pub button_color: Color,
    /// Knob color while unchecked
    #[serde(
        with = "hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub uncheck_button_color: Option<Color>,
    /// Knob color while checked
    #[serde(
        with = "hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub checked_button_color: Option<Color>,
    /// Knob shadow blur radius
    pub shadow_radius: f32,
    /// Knob shadow vertical offset
    pub shadow_offset: f32,
    /// Knob shadow color
    #[serde(with = "hex")]
    pub shadow_color: Color,
}

impl Default for SwitchPalette {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            uncheck_color: Color::from_argb(0xFFDD_DDDD),
            checked_color: Color::from_argb(0xFF51_D367),
            border_width: 1.0,
            check_line_color: Color::WHITE,
            check_line_width: 1.0,
            check_line_length: 6.0,
            uncheck_circle_color: Color::from_argb(0xFFAA_AAAA),
            uncheck_circle_width: 1.5,
            uncheck_circle_radius: 4.0,
            uncheck_circle_offset_x: 10.0,
            checked_line_offset_x: 4.0,
            checked_line_offset_y: 4.0,
            button_color: Color::WHITE,
            uncheck_button_color: None,
            checked_button_color: None,
            shadow_radius: 2.5,
            shadow_offset: 1.5,
            shadow_color: Color::from_argb(0x3300_0000),
        }
    }
}

impl SwitchPalette {
    /// Knob color for a checked value.
    #[must_use]
    pub fn knob_color(&self, checked: bool) -> Color {
        let specific = if checked {
            self.checked_button_color
        } else {
            self.uncheck_button_color
        };
        specific.unwrap_or(self.button_color)
    }

    /// Border color drawn around the knob.
    #[must_use]
    pub fn knob_outline_color(&self) -> Color {
        Color::from_argb(0xFFDD_DDDD)
    }
}
