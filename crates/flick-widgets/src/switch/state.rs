//! Visual snapshot, animation phases and layout-derived geometry.

use super::SwitchPalette;
use flick_core::{Color, Interpolate, Point, Rect};
use serde::{Deserialize, Serialize};

/// Everything the renderer needs from the animation at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Horizontal center of the knob
    pub button_x: f32,
    /// Fill of the checked-state stroke, unchecked color to checked color
    pub fill_color: Color,
    /// Checked indicator line color, transparent to check-line color
    pub indicator_color: Color,
    /// Radius of the inner filled pill, 0 to the view radius
    pub corner_radius: f32,
}

impl VisualState {
    /// Settled state for a checked value.
    #[must_use]
    pub fn terminal(checked: bool, geometry: &SwitchGeometry, palette: &SwitchPalette) -> Self {
        if checked {
            Self {
                button_x: geometry.button_max_x,
                fill_color: palette.checked_color,
                indicator_color: palette.check_line_color,
                corner_radius: geometry.view_radius,
            }
        } else {
            Self {
                button_x: geometry.button_min_x,
                fill_color: palette.uncheck_color,
                indicator_color: Color::TRANSPARENT,
                corner_radius: 0.0,
            }
        }
    }

    /// Field-wise interpolation toward `to`.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f32) -> Self {
        Self {
            button_x: f32::interpolate(&self.button_x, &to.button_x, t),
            fill_color: Color::interpolate(&self.fill_color, &to.fill_color, t),
            indicator_color: Color::interpolate(&self.indicator_color, &to.indicator_color, t),
            corner_radius: f32::interpolate(&self.corner_radius, &to.corner_radius, t),
        }
    }
}

/// Where the switch is in its animation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationPhase {
    /// At rest
    #[default]
    Idle,
    /// Pointer held long enough; easing into the drag look
    PendingDrag,
    /// Knob follows the pointer
    Dragging,
    /// Returning to the unchanged value's terminal state
    PendingReset,
    /// Moving to a newly committed value's terminal state
    PendingSettle,
    /// Timed toggle toward the opposite value
    Switching,
}

impl AnimationPhase {
    /// Whether pointer moves steer only the knob position.
    #[must_use]
    pub const fn is_pending_drag(self) -> bool {
        matches!(self, Self::PendingDrag | Self::PendingReset)
    }

    /// Whether a timed transition owns this phase.
    #[must_use]
    pub const fn is_animating(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Pill and knob metrics for a laid-out switch, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchGeometry {
    /// Allocated bounds
    pub bounds: Rect,
    /// Gap between bounds and pill on every side
    pub padding: f32,
    /// Pill rectangle
    pub pill: Rect,
    /// Half the pill height
    pub view_radius: f32,
    /// Knob radius
    pub button_radius: f32,
    /// Knob center when unchecked
    pub button_min_x: f32,
    /// Knob center when checked
    pub button_max_x: f32,
    /// Pill center
    pub center: Point,
}

impl SwitchGeometry {
    /// Derive metrics from laid-out bounds.
    ///
    /// ```
    /// use flick_core::Rect;
    /// use flick_widgets::{SwitchGeometry, SwitchPalette};
    ///
    /// let geometry = SwitchGeometry::from_bounds(
    ///     Rect::new(0.0, 0.0, 58.0, 36.0),
    ///     &SwitchPalette::default(),
    /// );
    /// assert_eq!(geometry.padding, 4.0);
    /// assert_eq!(geometry.view_radius, 14.0);
    /// assert_eq!(geometry.button_min_x, 18.0);
    /// assert_eq!(geometry.button_max_x, 40.0);
    /// ```
    #[must_use]
    pub fn from_bounds(bounds: Rect, palette: &SwitchPalette) -> Self {
        let padding = (palette.shadow_radius + palette.shadow_offset).max(palette.border_width);
        let pill = bounds.inset(padding);
        let view_radius = pill.height * 0.5;
        let button_min_x = pill.x + view_radius;
        let button_max_x = (pill.right() - view_radius).max(button_min_x);

        Self {
            bounds,
            padding,
            pill,
            view_radius,
            button_radius: (view_radius - palette.border_width).max(0.0),
            button_min_x,
            button_max_x,
            center: pill.center(),
        }
    }

    /// Knob travel distance.
    #[must_use]
    pub fn travel(&self) -> f32 {
        self.button_max_x - self.button_min_x
    }

    /// Knob position for a travel fraction in [0, 1].
    #[must_use]
    pub fn button_x_at(&self, fraction: f32) -> f32 {
        self.travel().mul_add(fraction.clamp(0.0, 1.0), self.button_min_x)
    }

    /// Travel fraction of a knob position, `None` when the knob cannot move.
    #[must_use]
    pub fn fraction_of(&self, button_x: f32) -> Option<f32> {
        let travel = self.travel();
        (travel > 0.0).then(|| ((button_x - self.button_min_x) / travel).clamp(0.0, 1.0))
    }
}

/// Pointer x normalized against the view width, clamped to [0, 1].
#[must_use]
pub(crate) fn pointer_fraction(x: f32, view_width: f32) -> f32 {
    if !view_width.is_finite() || view_width <= 0.0 || x.is_nan() {
        return 0.0;
    }
    (x / view_width).clamp(0.0, 1.0)
}
