//! Animated switch widget.

use super::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use super::{SwitchConfig, SwitchController, SwitchError, SwitchGeometry, SwitchPalette};
use flick_core::{
    widget::{AccessibleRole, LayoutResult},
    Canvas, Constraints, Event, MouseButton, Point, Rect, Shadow, Size, TypeId, Widget,
};
use std::any::Any;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;
use tracing::{event, Level};

/// Message emitted when the switch commits a new checked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchChanged {
    /// The new checked value
    pub checked: bool,
}

/// Pill-shaped on/off switch with a draggable knob.
///
/// ```
/// use flick_core::{Event, MouseButton, Point, Rect, Widget};
/// use flick_widgets::{SwitchButton, SwitchChanged};
/// use std::time::Duration;
///
/// let mut switch = SwitchButton::new().accessible_name("Wi-Fi");
/// switch.layout(Rect::new(0.0, 0.0, 58.0, 36.0));
///
/// let at = Point::new(20.0, 18.0);
/// switch.event(&Event::MouseDown { position: at, button: MouseButton::Left });
/// switch.tick(Duration::from_millis(16));
/// switch.event(&Event::MouseUp { position: at, button: MouseButton::Left });
///
/// let message = switch.tick(Duration::from_millis(300)).unwrap();
/// assert_eq!(
///     message.downcast_ref::<SwitchChanged>(),
///     Some(&SwitchChanged { checked: true })
/// );
/// ```
#[derive(Debug)]
pub struct SwitchButton {
    controller: SwitchController,
    /// Accessible name
    accessible_name_value: Option<String>,
    /// Test ID
    test_id_value: Option<String>,
    /// Cached bounds
    bounds: Rect,
    /// Whether a press started inside the bounds
    pressed: bool,
    /// Notifications already turned into messages
    reported_notifications: u64,
}

impl Default for SwitchButton {
    fn default() -> Self {
        Self::with_config(SwitchConfig::default())
    }
}

impl SwitchButton {
    /// Create an unchecked switch with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a switch from a configuration.
    #[must_use]
    pub fn with_config(config: SwitchConfig) -> Self {
        Self {
            controller: SwitchController::new(config),
            accessible_name_value: None,
            test_id_value: None,
            bounds: Rect::new(0.0, 0.0, DEFAULT_WIDTH, DEFAULT_HEIGHT),
            pressed: false,
            reported_notifications: 0,
        }
    }

    /// Replace the configuration, including its initial checked value.
    #[must_use]
    pub fn config(mut self, config: SwitchConfig) -> Self {
        self.controller.reconfigure(config);
        self
    }

    /// Replace the palette.
    #[must_use]
    pub fn palette(mut self, palette: SwitchPalette) -> Self {
        let config = self.controller.config().clone().palette(palette);
        self.controller.reconfigure(config);
        self
    }

    /// Set the checked value without animating or notifying.
    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.controller.reset_checked(checked);
        self
    }

    /// Set whether the switch is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.controller.set_enabled(!disabled);
        self
    }

    /// Register a checked-changed listener.
    #[must_use]
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&mut SwitchController, bool) + Send + Sync + 'static,
    {
        self.controller.add_listener(listener);
        self
    }

    /// Set the accessible name.
    #[must_use]
    pub fn accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Set the test ID.
    #[must_use]
    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Committed checked value.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.controller.is_checked()
    }

    /// Get disabled state.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        !self.controller.is_enabled()
    }

    /// The state machine behind the widget.
    #[must_use]
    pub const fn controller(&self) -> &SwitchController {
        &self.controller
    }

    /// Mutable access to the state machine.
    pub fn controller_mut(&mut self) -> &mut SwitchController {
        &mut self.controller
    }

    /// Move to `checked`, animating when the config enables it.
    pub fn set_checked(&mut self, checked: bool) -> Result<(), SwitchError> {
        self.controller.set_checked(checked)
    }

    /// Flip the checked value.
    pub fn toggle(&mut self, animate: bool) -> Result<(), SwitchError> {
        self.controller.toggle(animate)
    }

    /// Returns and clears the pending repaint flag.
    pub fn take_redraw_request(&mut self) -> bool {
        self.controller.take_redraw_request()
    }

    fn local_x(&self, position: &Point) -> f32 {
        position.x - self.bounds.x
    }

    fn take_change(&mut self) -> Option<Box<dyn Any + Send>> {
        let count = self.controller.notification_count();
        if count == self.reported_notifications {
            return None;
        }
        self.reported_notifications = count;
        Some(Box::new(SwitchChanged {
            checked: self.controller.is_checked(),
        }))
    }

    fn knob_shadow(palette: &SwitchPalette) -> Shadow {
        Shadow {
            color: palette.shadow_color,
            offset_x: 0.0,
            offset_y: palette.shadow_offset,
            blur: palette.shadow_radius,
        }
    }
}

impl Widget for SwitchButton {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        let geometry = SwitchGeometry::from_bounds(bounds, &self.controller.config().palette);
        self.controller.set_geometry(geometry);
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let config = self.controller.config();
        let palette = &config.palette;
        let g = self.controller.geometry();
        let state = self.controller.current_visual_state();
        let pill = g.pill;

        // Track and its resting border
        canvas.fill_rounded_rect(pill, g.view_radius, palette.background);
        canvas.stroke_rounded_rect(pill, g.view_radius, palette.uncheck_color, palette.border_width);

        if config.show_indicator {
            let center = Point::new(pill.right() - palette.uncheck_circle_offset_x, g.center.y);
            canvas.stroke_circle(
                center,
                palette.uncheck_circle_radius,
                palette.uncheck_circle_color,
                palette.uncheck_circle_width,
            );
        }

        // Checked fill grows inward as a thickening stroke
        let des = state.corner_radius * 0.5;
        canvas.stroke_rounded_rect(
            pill.inset(des),
            g.view_radius,
            state.fill_color,
            des.mul_add(2.0, palette.border_width),
        );

        // Left cap and strip up to the knob
        let cap_x = pill.x + g.view_radius;
        canvas.fill_arc(
            Point::new(cap_x, pill.y + g.view_radius),
            g.view_radius,
            FRAC_PI_2,
            3.0 * FRAC_PI_2,
            state.fill_color,
        );
        canvas.fill_rect(
            Rect::from_ltrb(cap_x, pill.y, state.button_x, pill.y + 2.0 * g.view_radius),
            state.fill_color,
        );

        if config.show_indicator {
            canvas.draw_line(
                Point::new(cap_x - palette.checked_line_offset_x, g.center.y - palette.check_line_length),
                Point::new(cap_x - palette.checked_line_offset_y, g.center.y + palette.check_line_length),
                state.indicator_color,
                palette.check_line_width,
            );
        }

        let knob = Point::new(state.button_x, g.center.y);
        let knob_color = palette.knob_color(self.controller.target_checked());
        if config.enable_shadow {
            canvas.fill_circle_with_shadow(knob, g.button_radius, knob_color, Self::knob_shadow(palette));
        } else {
            canvas.fill_circle(knob, g.button_radius, knob_color);
        }
        canvas.stroke_circle(knob, g.button_radius, palette.knob_outline_color(), 1.0);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if self.is_disabled() {
            return None;
        }

        let now = self.controller.now();
        let width = self.bounds.width;
        let position = event.position();
        match event {
            Event::PointerDown { .. }
            | Event::MouseDown {
                button: MouseButton::Left,
                ..
            } => {
                if position.is_some_and(|at| self.bounds.contains_point(&at)) {
                    self.pressed = true;
                    self.controller.on_pointer_down(now);
                }
            }
            Event::PointerMove { .. } | Event::MouseMove { .. } => {
                if let Some(at) = position.filter(|_| self.pressed) {
                    let x = self.local_x(&at);
                    self.controller.on_pointer_move(x, width);
                }
            }
            Event::PointerUp { .. }
            | Event::MouseUp {
                button: MouseButton::Left,
                ..
            } => {
                if std::mem::take(&mut self.pressed) {
                    let x = position.map_or(0.0, |at| self.local_x(&at));
                    if let Err(err) = self.controller.on_pointer_up(now, x, width) {
                        event!(Level::WARN, %err, "switch release rejected");
                    }
                }
            }
            Event::PointerCancel { .. } => {
                if std::mem::take(&mut self.pressed) {
                    self.controller.on_pointer_cancel();
                }
            }
            _ => {}
        }

        self.take_change()
    }

    fn tick(&mut self, dt: Duration) -> Option<Box<dyn Any + Send>> {
        self.controller.advance(dt);
        self.take_change()
    }

    fn needs_repaint(&self) -> bool {
        self.controller.needs_redraw()
    }

    fn is_interactive(&self) -> bool {
        !self.is_disabled()
    }

    fn is_focusable(&self) -> bool {
        !self.is_disabled()
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Switch
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
