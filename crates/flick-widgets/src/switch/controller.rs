//! The switch state machine.
//!
//! [`SwitchController`] owns the checked value, the active
//! [`AnimationPhase`] and the [`VisualState`] snapshot a renderer reads. It is
//! driven by pointer handlers and by [`SwitchController::advance`], which the
//! host calls once per frame. No wall clock is consulted: time only moves when
//! `advance` is called.

use super::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH, PENDING_DRAG_DELAY, TAP_THRESHOLD};
use super::state::pointer_fraction;
use super::{AnimationPhase, SwitchConfig, SwitchError, SwitchGeometry, VisualState};
use flick_core::{Animator, AnimatorStep, Color, DelayedAction, Interpolate, Rect};
use std::fmt;
use std::time::Duration;
use tracing::{event, Level};

type Listener = Box<dyn FnMut(&mut SwitchController, bool) + Send + Sync>;

/// Animated on/off state machine behind [`SwitchButton`](super::SwitchButton).
///
/// ```
/// use flick_widgets::{AnimationPhase, SwitchConfig, SwitchController};
/// use std::time::Duration;
///
/// let mut switch = SwitchController::new(SwitchConfig::default());
/// switch.toggle(true).unwrap();
/// assert_eq!(switch.phase(), AnimationPhase::Switching);
/// assert!(!switch.is_checked());
///
/// switch.advance(Duration::from_millis(300));
/// assert_eq!(switch.phase(), AnimationPhase::Idle);
/// assert!(switch.is_checked());
/// assert_eq!(switch.notification_count(), 1);
/// ```
pub struct SwitchController {
    config: SwitchConfig,
    geometry: SwitchGeometry,
    checked: bool,
    enabled: bool,
    phase: AnimationPhase,
    before: VisualState,
    after: VisualState,
    current: VisualState,
    touch_down_at: Option<Duration>,
    touch_active: bool,
    clock: Duration,
    animator: Animator,
    pending_drag: DelayedAction,
    listeners: Vec<Listener>,
    broadcasting: bool,
    notifications: u64,
    redraw_requested: bool,
}

impl SwitchController {
    /// Create a controller laid out at the default 58 x 36 size.
    #[must_use]
    pub fn new(config: SwitchConfig) -> Self {
        let bounds = Rect::new(0.0, 0.0, DEFAULT_WIDTH, DEFAULT_HEIGHT);
        let geometry = SwitchGeometry::from_bounds(bounds, &config.palette);
        Self::with_geometry(config, geometry)
    }

    /// Create a controller for already-known geometry.
    #[must_use]
    pub fn with_geometry(config: SwitchConfig, geometry: SwitchGeometry) -> Self {
        let checked = config.checked;
        let rest = VisualState::terminal(checked, &geometry, &config.palette);
        let animator = Animator::new(config.animation_duration()).with_easing(config.easing);
        Self {
            config,
            geometry,
            checked,
            enabled: true,
            phase: AnimationPhase::Idle,
            before: rest,
            after: rest,
            current: rest,
            touch_down_at: None,
            touch_active: false,
            clock: Duration::ZERO,
            animator,
            pending_drag: DelayedAction::new(),
            listeners: Vec::new(),
            broadcasting: false,
            notifications: 0,
            redraw_requested: true,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Current geometry.
    #[must_use]
    pub const fn geometry(&self) -> &SwitchGeometry {
        &self.geometry
    }

    /// Committed checked value.
    ///
    /// A timed toggle commits only when it completes; a drag release commits
    /// immediately.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.checked
    }

    /// Value the switch is heading toward.
    #[must_use]
    pub const fn target_checked(&self) -> bool {
        match self.phase {
            AnimationPhase::Switching => !self.checked,
            _ => self.checked,
        }
    }

    /// Whether input and toggles are accepted.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Active phase.
    #[must_use]
    pub const fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Snapshot to render.
    #[must_use]
    pub const fn current_visual_state(&self) -> VisualState {
        self.current
    }

    /// Endpoints `(before, after)` captured by the latest transition.
    #[must_use]
    pub const fn transition_endpoints(&self) -> (VisualState, VisualState) {
        (self.before, self.after)
    }

    /// Whether a pointer is considered held.
    #[must_use]
    pub const fn is_touch_active(&self) -> bool {
        self.touch_active
    }

    /// Whether a timed transition is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Whether the deferred drag entry is scheduled.
    #[must_use]
    pub const fn is_drag_pending(&self) -> bool {
        self.pending_drag.is_pending()
    }

    /// Total time passed to [`advance`](Self::advance).
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock
    }

    /// Number of checked-changed notifications fired so far.
    #[must_use]
    pub const fn notification_count(&self) -> u64 {
        self.notifications
    }

    /// Returns and clears the pending redraw flag.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::replace(&mut self.redraw_requested, false)
    }

    /// Whether a redraw is pending, without clearing it.
    #[must_use]
    pub const fn needs_redraw(&self) -> bool {
        self.redraw_requested
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Subscribe to checked-changed notifications.
    ///
    /// Listeners run in registration order and receive the controller itself.
    /// Changing the checked value from inside a listener fails with
    /// [`SwitchError::ReentrantToggle`].
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&mut Self, bool) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Enable or disable the switch. Disabled switches ignore input and toggles.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            event!(Level::DEBUG, enabled, "switch enabled state changed");
            self.enabled = enabled;
            self.request_redraw();
        }
    }

    /// Apply new geometry after a re-layout.
    ///
    /// A timed toggle or settle in flight completes on the spot (its
    /// notification fires), any other transition is dropped, and the snapshot
    /// snaps to the rest state of the checked value.
    pub fn set_geometry(&mut self, geometry: SwitchGeometry) {
        if geometry == self.geometry {
            return;
        }
        if matches!(
            self.phase,
            AnimationPhase::Switching | AnimationPhase::PendingSettle
        ) {
            self.on_animation_complete();
        }
        self.geometry = geometry;
        self.animator.cancel();
        self.phase = AnimationPhase::Idle;
        self.snap_to_rest();
    }

    /// Replace the configuration, keeping listeners, geometry bounds and the
    /// enabled flag. The checked value is taken from `config`.
    pub(crate) fn reconfigure(&mut self, config: SwitchConfig) {
        self.geometry = SwitchGeometry::from_bounds(self.geometry.bounds, &config.palette);
        self.animator = Animator::new(config.animation_duration()).with_easing(config.easing);
        self.pending_drag.cancel();
        self.phase = AnimationPhase::Idle;
        self.checked = config.checked;
        self.config = config;
        self.snap_to_rest();
    }

    /// Set the checked value without animating or notifying.
    pub(crate) fn reset_checked(&mut self, checked: bool) {
        self.animator.cancel();
        self.phase = AnimationPhase::Idle;
        self.checked = checked;
        self.config.checked = checked;
        self.snap_to_rest();
    }

    // =========================================================================
    // Toggling
    // =========================================================================

    /// Move to `checked`, animating when the config enables it.
    ///
    /// Asking for the value the switch is already heading toward only requests
    /// a redraw.
    pub fn set_checked(&mut self, checked: bool) -> Result<(), SwitchError> {
        if checked == self.target_checked() {
            self.request_redraw();
            return Ok(());
        }
        self.toggle(self.config.enable_animation)
    }

    /// Flip the checked value.
    ///
    /// Without animation the flip and its notification happen immediately.
    /// With animation the switch enters [`AnimationPhase::Switching`] and both
    /// happen when the transition completes. Toggling while a switch is in
    /// flight reverses it through [`AnimationPhase::PendingReset`]: nothing
    /// was committed, so nothing is notified. Pointer moves steer the knob
    /// during the reversal like any other reset.
    pub fn toggle(&mut self, animate: bool) -> Result<(), SwitchError> {
        if !self.enabled {
            event!(Level::DEBUG, "toggle ignored: switch disabled");
            return Ok(());
        }
        if self.broadcasting {
            event!(Level::WARN, "toggle rejected: called from a checked-changed listener");
            return Err(SwitchError::ReentrantToggle);
        }

        let animate = animate && self.config.enable_animation;
        let interrupted = self.interrupt();

        if interrupted == AnimationPhase::Switching {
            if animate {
                self.start_transition(AnimationPhase::PendingReset, self.checked);
            } else {
                self.snap_to_rest();
            }
            return Ok(());
        }

        if animate {
            self.start_transition(AnimationPhase::Switching, !self.checked);
        } else {
            self.checked = !self.checked;
            self.snap_to_rest();
            self.broadcast();
        }
        Ok(())
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Pointer pressed at controller time `at`.
    ///
    /// Interrupts an in-flight timed toggle without notifying and schedules
    /// the drag entry.
    pub fn on_pointer_down(&mut self, at: Duration) {
        if !self.enabled {
            event!(Level::DEBUG, "pointer down ignored: switch disabled");
            return;
        }
        if self.phase == AnimationPhase::Switching {
            self.animator.cancel();
            self.phase = AnimationPhase::Idle;
            event!(Level::DEBUG, button_x = self.current.button_x, "switch interrupted by pointer");
        }
        self.touch_down_at = Some(at);
        self.touch_active = true;
        self.pending_drag.schedule(PENDING_DRAG_DELAY);
    }

    /// Pointer moved to `x`, relative to a view `view_width` wide.
    pub fn on_pointer_move(&mut self, x: f32, view_width: f32) {
        if !self.enabled {
            return;
        }
        let fraction = pointer_fraction(x, view_width);
        if self.phase.is_pending_drag() {
            self.current.button_x = self.geometry.button_x_at(fraction);
        } else if self.phase == AnimationPhase::Dragging {
            let palette = &self.config.palette;
            self.current.button_x = self.geometry.button_x_at(fraction);
            self.current.fill_color = palette.uncheck_color.lerp(&palette.checked_color, fraction);
        } else {
            return;
        }
        self.request_redraw();
    }

    /// Pointer released at controller time `at` and position `x`.
    ///
    /// A release within [`TAP_THRESHOLD`] of the press is a tap and toggles
    /// with animation, whatever dragging happened. Otherwise a drag commits
    /// when the knob ends on the other half.
    pub fn on_pointer_up(&mut self, at: Duration, x: f32, view_width: f32) -> Result<(), SwitchError> {
        if !self.enabled {
            event!(Level::DEBUG, "pointer up ignored: switch disabled");
            return Ok(());
        }
        self.touch_active = false;
        self.pending_drag.cancel();

        let held = self.touch_down_at.map(|down| at.saturating_sub(down));
        if held.is_some_and(|held| held <= TAP_THRESHOLD) {
            event!(Level::DEBUG, ?held, "tap");
            return self.toggle(true);
        }

        match self.phase {
            AnimationPhase::Dragging => {
                let new_checked = pointer_fraction(x, view_width) > 0.5;
                if new_checked == self.checked {
                    self.start_transition(AnimationPhase::PendingReset, self.checked);
                } else {
                    self.checked = new_checked;
                    self.start_transition(AnimationPhase::PendingSettle, new_checked);
                }
            }
            AnimationPhase::PendingDrag => {
                self.start_transition(AnimationPhase::PendingReset, self.checked);
            }
            // Left mid-track by an interrupted switch
            AnimationPhase::Idle if !self.is_at_rest() => {
                self.start_transition(AnimationPhase::PendingReset, self.checked);
            }
            AnimationPhase::Idle
            | AnimationPhase::PendingReset
            | AnimationPhase::PendingSettle
            | AnimationPhase::Switching => {}
        }
        Ok(())
    }

    /// Gesture taken away from the switch.
    ///
    /// Leaves the touch flagged as active, matching pointer down.
    pub fn on_pointer_cancel(&mut self) {
        if !self.enabled {
            return;
        }
        self.touch_active = true;
        self.pending_drag.cancel();
        let dragging = matches!(
            self.phase,
            AnimationPhase::PendingDrag | AnimationPhase::Dragging
        );
        if dragging || (self.phase == AnimationPhase::Idle && !self.is_at_rest()) {
            self.start_transition(AnimationPhase::PendingReset, self.checked);
        }
    }

    // =========================================================================
    // Timing
    // =========================================================================

    /// Advance controller time by `dt`, firing the deferred drag entry and
    /// stepping the running transition.
    pub fn advance(&mut self, dt: Duration) {
        self.clock += dt;

        if let Some(step) = self.animator.advance(dt) {
            self.apply_step(step);
        }

        if let Some(overshoot) = self.pending_drag.advance(dt) {
            if self.enter_pending_drag() && !overshoot.is_zero() {
                if let Some(step) = self.animator.advance(overshoot) {
                    self.apply_step(step);
                }
            }
        }
    }

    /// Per-frame update of the active timed phase with eased progress.
    pub fn on_animation_tick(&mut self, progress: f32) {
        let t = progress.clamp(0.0, 1.0);
        match self.phase {
            AnimationPhase::PendingDrag => {
                // Knob position and fill stay where input left them.
                self.current.indicator_color =
                    self.before.indicator_color.lerp(&self.after.indicator_color, t);
                self.current.corner_radius =
                    f32::interpolate(&self.before.corner_radius, &self.after.corner_radius, t);
            }
            AnimationPhase::PendingReset | AnimationPhase::PendingSettle => {
                self.current = self.before.lerp(&self.after, t);
            }
            AnimationPhase::Switching => {
                let button_x = self.before.lerp(&self.after, t).button_x;
                let fraction = self.geometry.fraction_of(button_x).unwrap_or(
                    if self.target_checked() { t } else { 1.0 - t },
                );
                let palette = &self.config.palette;
                self.current = VisualState {
                    button_x,
                    fill_color: palette.uncheck_color.lerp(&palette.checked_color, fraction),
                    indicator_color: Color::TRANSPARENT.lerp(&palette.check_line_color, fraction),
                    corner_radius: fraction * self.geometry.view_radius,
                };
            }
            AnimationPhase::Idle | AnimationPhase::Dragging => return,
        }
        self.request_redraw();
    }

    /// Finish the active timed phase.
    pub fn on_animation_complete(&mut self) {
        self.animator.cancel();
        let finished = self.phase;
        match finished {
            AnimationPhase::PendingDrag => {
                self.phase = AnimationPhase::Dragging;
                self.current.indicator_color = Color::TRANSPARENT;
                self.current.corner_radius = self.geometry.view_radius;
            }
            AnimationPhase::PendingReset | AnimationPhase::PendingSettle => {
                self.current = self.after;
                self.phase = AnimationPhase::Idle;
            }
            AnimationPhase::Switching => {
                self.current = self.after;
                self.checked = !self.checked;
                self.phase = AnimationPhase::Idle;
            }
            AnimationPhase::Idle | AnimationPhase::Dragging => return,
        }
        event!(Level::DEBUG, from = ?finished, to = ?self.phase, "transition complete");
        self.request_redraw();
        if matches!(
            finished,
            AnimationPhase::PendingSettle | AnimationPhase::Switching
        ) {
            self.broadcast();
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply_step(&mut self, step: AnimatorStep) {
        self.on_animation_tick(step.progress);
        if step.finished {
            self.on_animation_complete();
        }
    }

    fn terminal(&self, checked: bool) -> VisualState {
        VisualState::terminal(checked, &self.geometry, &self.config.palette)
    }

    fn is_at_rest(&self) -> bool {
        self.current == self.terminal(self.checked)
    }

    fn snap_to_rest(&mut self) {
        self.current = self.terminal(self.checked);
        self.before = self.current;
        self.after = self.current;
        self.request_redraw();
    }

    /// Stop whatever is in flight and return to idle. A settle already
    /// committed its value, so it still owes a notification.
    fn interrupt(&mut self) -> AnimationPhase {
        self.animator.cancel();
        let interrupted = std::mem::replace(&mut self.phase, AnimationPhase::Idle);
        if interrupted != AnimationPhase::Idle {
            event!(Level::DEBUG, phase = ?interrupted, "transition interrupted");
        }
        if interrupted == AnimationPhase::PendingSettle {
            self.broadcast();
        }
        interrupted
    }

    fn start_transition(&mut self, phase: AnimationPhase, target_checked: bool) {
        self.animator.cancel();
        self.phase = phase;
        self.before = self.current;
        self.after = self.terminal(target_checked);
        self.animator.start();
        event!(Level::DEBUG, ?phase, target_checked, "transition started");
        self.request_redraw();
    }

    /// Deferred entry into the drag look. Only taken while at rest with the
    /// pointer still down.
    fn enter_pending_drag(&mut self) -> bool {
        if self.phase.is_animating() || !self.touch_active {
            return false;
        }
        self.animator.cancel();
        self.phase = AnimationPhase::PendingDrag;
        self.before = self.current;
        self.after = self.current;

        let palette = &self.config.palette;
        if self.checked {
            self.after.fill_color = palette.checked_color;
            self.after.button_x = self.geometry.button_max_x;
            self.after.indicator_color = palette.checked_color;
        } else {
            self.after.fill_color = palette.uncheck_color;
            self.after.button_x = self.geometry.button_min_x;
            self.after.corner_radius = self.geometry.view_radius;
        }
        self.animator.start();
        event!(Level::DEBUG, checked = self.checked, "drag pending");
        true
    }

    fn broadcast(&mut self) {
        self.notifications += 1;
        let checked = self.checked;
        event!(Level::DEBUG, checked, listeners = self.listeners.len(), "checked changed");

        let was_broadcasting = std::mem::replace(&mut self.broadcasting, true);
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener(self, checked);
        }
        // Keep listeners registered during the broadcast, after the existing ones.
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
        self.broadcasting = was_broadcasting;
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}

impl Default for SwitchController {
    fn default() -> Self {
        Self::new(SwitchConfig::default())
    }
}

impl fmt::Debug for SwitchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchController")
            .field("checked", &self.checked)
            .field("enabled", &self.enabled)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("touch_active", &self.touch_active)
            .field("clock", &self.clock)
            .field("notifications", &self.notifications)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const FRAME: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> SwitchController {
        SwitchController::new(SwitchConfig::default())
    }

    fn rest(ctrl: &SwitchController, checked: bool) -> VisualState {
        VisualState::terminal(checked, ctrl.geometry(), &ctrl.config().palette)
    }

    fn run_frames(ctrl: &mut SwitchController, total: Duration) {
        let mut left = total;
        while !left.is_zero() {
            let dt = left.min(FRAME);
            ctrl.advance(dt);
            left -= dt;
        }
    }

    /// Press and hold until the switch is `Dragging`.
    fn start_drag(ctrl: &mut SwitchController) {
        ctrl.on_pointer_down(ctrl.now());
        ctrl.advance(ms(100));
        assert_eq!(ctrl.phase(), AnimationPhase::PendingDrag);
        ctrl.advance(ms(300));
        assert_eq!(ctrl.phase(), AnimationPhase::Dragging);
    }

    // ===== Construction Tests =====

    #[test]
    fn test_new_rests_unchecked() {
        let ctrl = controller();
        assert!(!ctrl.is_checked());
        assert!(ctrl.is_enabled());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
        assert_eq!(ctrl.notification_count(), 0);
        assert_eq!(ctrl.now(), Duration::ZERO);
    }

    #[test]
    fn test_new_checked_from_config() {
        let ctrl = SwitchController::new(SwitchConfig::default().checked(true));
        assert!(ctrl.is_checked());
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, true));
    }

    #[test]
    fn test_debug_output() {
        let debug_str = format!("{:?}", controller());
        assert!(debug_str.contains("SwitchController"));
        assert!(debug_str.contains("Idle"));
    }

    // ===== Toggle Tests =====

    #[test]
    fn test_toggle_immediate_notifies_synchronously() {
        let mut ctrl = controller();
        ctrl.toggle(false).unwrap();
        assert!(ctrl.is_checked());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, true));
        assert_eq!(ctrl.notification_count(), 1);
    }

    #[test]
    fn test_toggle_animated_commits_at_completion() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::Switching);
        assert!(!ctrl.is_checked());
        assert!(ctrl.target_checked());

        ctrl.advance(ms(150));
        assert!(!ctrl.is_checked());
        assert_eq!(ctrl.notification_count(), 0);

        ctrl.advance(ms(150));
        assert!(ctrl.is_checked());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.notification_count(), 1);
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, true));
    }

    #[test]
    fn test_toggle_animation_disabled_in_config() {
        let mut ctrl = SwitchController::new(SwitchConfig::default().enable_animation(false));
        ctrl.toggle(true).unwrap();
        assert!(ctrl.is_checked());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.notification_count(), 1);
    }

    #[test]
    fn test_switching_midpoint_derives_from_knob_position() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(150));

        let g = *ctrl.geometry();
        let state = ctrl.current_visual_state();
        assert!((state.button_x - 29.0).abs() < 1e-4);
        assert!((state.corner_radius - g.view_radius * 0.5).abs() < 1e-4);
        assert!((state.indicator_color.a - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_toggle_while_switching_reverses_without_notifying() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(100));
        ctrl.toggle(true).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::PendingReset);
        assert!(!ctrl.target_checked());

        run_frames(&mut ctrl, ms(400));
        assert!(!ctrl.is_checked());
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_pointer_steers_reversed_switch() {
        let mut ctrl = controller();
        let width = ctrl.geometry().bounds.width;
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(100));
        ctrl.toggle(true).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::PendingReset);

        ctrl.on_pointer_move(width * 0.75, width);
        assert_eq!(
            ctrl.current_visual_state().button_x,
            ctrl.geometry().button_x_at(0.75)
        );

        run_frames(&mut ctrl, ms(400));
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_immediate_toggle_while_switching_snaps_back() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(100));
        ctrl.toggle(false).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert!(!ctrl.is_checked());
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_toggle_during_settle_notifies_committed_value() {
        let mut ctrl = controller();
        start_drag(&mut ctrl);
        let width = ctrl.geometry().bounds.width;
        ctrl.on_pointer_up(ctrl.now(), width, width).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::PendingSettle);
        assert!(ctrl.is_checked());

        ctrl.toggle(false).unwrap();
        assert!(!ctrl.is_checked());
        assert_eq!(ctrl.notification_count(), 2);
    }

    // ===== set_checked Tests =====

    #[test]
    fn test_set_checked_same_value_requests_redraw() {
        let mut ctrl = controller();
        ctrl.take_redraw_request();
        ctrl.set_checked(false).unwrap();
        assert!(ctrl.take_redraw_request());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_set_checked_animates_per_config() {
        let mut ctrl = controller();
        ctrl.set_checked(true).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::Switching);

        let mut ctrl = SwitchController::new(SwitchConfig::default().enable_animation(false));
        ctrl.set_checked(true).unwrap();
        assert!(ctrl.is_checked());
        assert_eq!(ctrl.notification_count(), 1);
    }

    #[test]
    fn test_set_checked_matching_target_keeps_switching() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        ctrl.set_checked(true).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::Switching);
    }

    // ===== Listener Tests =====

    #[test]
    fn test_listeners_run_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut ctrl = controller();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            ctrl.add_listener(move |_, checked| seen.lock().unwrap().push((tag, checked)));
        }
        ctrl.toggle(false).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", true), ("second", true)]
        );
        assert_eq!(ctrl.listener_count(), 2);
    }

    #[test]
    fn test_listener_added_during_broadcast_is_kept() {
        let calls = Arc::new(AtomicUsize::new(0));
        let added = Arc::new(AtomicBool::new(false));
        let mut ctrl = controller();
        let inner_calls = Arc::clone(&calls);
        ctrl.add_listener(move |ctrl, _| {
            if !added.swap(true, Ordering::SeqCst) {
                let calls = Arc::clone(&inner_calls);
                ctrl.add_listener(move |_, _| {
                    calls.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        ctrl.toggle(false).unwrap();
        assert_eq!(ctrl.listener_count(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        ctrl.toggle(false).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_read_state() {
        let observed = Arc::new(Mutex::new(None));
        let mut ctrl = controller();
        let sink = Arc::clone(&observed);
        ctrl.add_listener(move |ctrl, checked| {
            *sink.lock().unwrap() = Some((checked, ctrl.is_checked(), ctrl.phase()));
        });
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(300));
        assert_eq!(
            *observed.lock().unwrap(),
            Some((true, true, AnimationPhase::Idle))
        );
    }

    // ===== Pointer Tests =====

    #[test]
    fn test_pointer_down_schedules_drag_entry() {
        let mut ctrl = controller();
        ctrl.on_pointer_down(Duration::ZERO);
        assert!(ctrl.is_touch_active());
        assert!(ctrl.is_drag_pending());

        ctrl.advance(ms(99));
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        ctrl.advance(ms(1));
        assert_eq!(ctrl.phase(), AnimationPhase::PendingDrag);
        assert!(!ctrl.is_drag_pending());
    }

    #[test]
    fn test_drag_entry_skipped_while_animating() {
        let mut ctrl = controller();
        let width = ctrl.geometry().bounds.width;
        start_drag(&mut ctrl);
        ctrl.on_pointer_up(ctrl.now(), 0.0, width).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::PendingReset);

        ctrl.on_pointer_down(ctrl.now());
        ctrl.advance(ms(100));
        assert_eq!(ctrl.phase(), AnimationPhase::PendingReset);
    }

    #[test]
    fn test_drag_entry_overshoot_steps_animation() {
        let mut ctrl = controller();
        ctrl.on_pointer_down(Duration::ZERO);
        ctrl.advance(ms(250));
        assert_eq!(ctrl.phase(), AnimationPhase::PendingDrag);
        // 150ms of the 300ms entry elapsed
        let radius = ctrl.current_visual_state().corner_radius;
        assert!((radius - ctrl.geometry().view_radius * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_pending_drag_tick_keeps_knob_and_fill() {
        let mut ctrl = controller();
        let width = ctrl.geometry().bounds.width;
        ctrl.on_pointer_down(Duration::ZERO);
        ctrl.advance(ms(100));
        ctrl.on_pointer_move(width * 0.75, width);

        let moved = ctrl.current_visual_state();
        assert_eq!(moved.button_x, ctrl.geometry().button_x_at(0.75));
        assert_eq!(moved.fill_color, ctrl.config().palette.uncheck_color);

        ctrl.advance(ms(100));
        let ticked = ctrl.current_visual_state();
        assert_eq!(ticked.button_x, moved.button_x);
        assert_eq!(ticked.fill_color, moved.fill_color);
    }

    #[test]
    fn test_pending_drag_completes_into_dragging() {
        let mut ctrl = controller();
        start_drag(&mut ctrl);
        let state = ctrl.current_visual_state();
        assert_eq!(state.indicator_color, Color::TRANSPARENT);
        assert_eq!(state.corner_radius, ctrl.geometry().view_radius);
        assert!(!ctrl.is_animating());
    }

    #[test]
    fn test_dragging_move_updates_knob_and_fill() {
        let mut ctrl = controller();
        let width = ctrl.geometry().bounds.width;
        start_drag(&mut ctrl);
        ctrl.on_pointer_move(width * 0.5, width);

        let palette = &ctrl.config().palette;
        let state = ctrl.current_visual_state();
        assert_eq!(state.button_x, ctrl.geometry().button_x_at(0.5));
        assert_eq!(
            state.fill_color,
            palette.uncheck_color.lerp(&palette.checked_color, 0.5)
        );
    }

    #[test]
    fn test_move_clamps_out_of_range_input() {
        let mut ctrl = controller();
        let width = ctrl.geometry().bounds.width;
        start_drag(&mut ctrl);

        ctrl.on_pointer_move(-500.0, width);
        assert_eq!(ctrl.current_visual_state().button_x, ctrl.geometry().button_min_x);
        ctrl.on_pointer_move(500.0, width);
        assert_eq!(ctrl.current_visual_state().button_x, ctrl.geometry().button_max_x);
    }

    #[test]
    fn test_move_with_unusable_width_pins_knob_to_start() {
        let mut ctrl = controller();
        start_drag(&mut ctrl);

        ctrl.on_pointer_move(10.0, f32::NAN);
        let state = ctrl.current_visual_state();
        assert_eq!(state.button_x, ctrl.geometry().button_min_x);
        assert_eq!(state.fill_color, ctrl.config().palette.uncheck_color);

        ctrl.on_pointer_move(10.0, f32::INFINITY);
        assert_eq!(ctrl.current_visual_state().button_x, ctrl.geometry().button_min_x);
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut ctrl = controller();
        ctrl.on_pointer_move(50.0, 58.0);
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
    }

    #[test]
    fn test_long_press_without_drag_resets() {
        let mut ctrl = controller();
        ctrl.on_pointer_down(Duration::ZERO);
        ctrl.advance(ms(200));
        assert_eq!(ctrl.phase(), AnimationPhase::PendingDrag);

        ctrl.advance(ms(150));
        ctrl.on_pointer_up(ctrl.now(), 0.0, 58.0).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::PendingReset);
        assert!(!ctrl.is_touch_active());

        ctrl.advance(ms(300));
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_pointer_up_cancels_drag_entry() {
        let mut ctrl = controller();
        ctrl.on_pointer_down(Duration::ZERO);
        ctrl.advance(ms(50));
        ctrl.on_pointer_up(ctrl.now(), 0.0, 58.0).unwrap();
        assert!(!ctrl.is_drag_pending());
        assert_eq!(ctrl.phase(), AnimationPhase::Switching);

        ctrl.advance(ms(100));
        assert_eq!(ctrl.phase(), AnimationPhase::Switching);
    }

    #[test]
    fn test_pointer_cancel_keeps_touch_active_and_resets() {
        let mut ctrl = controller();
        let width = ctrl.geometry().bounds.width;
        start_drag(&mut ctrl);
        ctrl.on_pointer_move(width * 0.4, width);

        ctrl.on_pointer_cancel();
        assert!(ctrl.is_touch_active());
        assert_eq!(ctrl.phase(), AnimationPhase::PendingReset);

        ctrl.advance(ms(300));
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_pointer_cancel_before_drag_entry() {
        let mut ctrl = controller();
        ctrl.on_pointer_down(Duration::ZERO);
        ctrl.on_pointer_cancel();
        assert!(!ctrl.is_drag_pending());
        ctrl.advance(ms(200));
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_cancel_after_interrupt_returns_to_rest() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(150));
        ctrl.on_pointer_down(ctrl.now());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);

        ctrl.on_pointer_cancel();
        assert_eq!(ctrl.phase(), AnimationPhase::PendingReset);
        ctrl.advance(ms(300));
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, false));
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_up_without_down_is_not_a_tap() {
        let mut ctrl = controller();
        ctrl.on_pointer_up(Duration::ZERO, 0.0, 58.0).unwrap();
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.notification_count(), 0);
    }

    // ===== Disabled Tests =====

    #[test]
    fn test_disabled_ignores_everything() {
        let mut ctrl = controller();
        ctrl.set_enabled(false);

        ctrl.toggle(false).unwrap();
        ctrl.set_checked(true).unwrap();
        ctrl.on_pointer_down(Duration::ZERO);
        ctrl.on_pointer_up(ms(50), 0.0, 58.0).unwrap();
        ctrl.on_pointer_cancel();
        ctrl.advance(ms(500));

        assert!(!ctrl.is_checked());
        assert!(!ctrl.is_touch_active());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.notification_count(), 0);
    }

    // ===== Tick/Complete Tests =====

    #[test]
    fn test_tick_and_complete_are_noops_when_idle() {
        let mut ctrl = controller();
        ctrl.take_redraw_request();
        ctrl.on_animation_tick(0.5);
        ctrl.on_animation_complete();
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert!(!ctrl.take_redraw_request());
        assert_eq!(ctrl.notification_count(), 0);
    }

    #[test]
    fn test_manual_tick_drives_switching() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        ctrl.on_animation_tick(1.0);
        assert_eq!(ctrl.current_visual_state().button_x, ctrl.geometry().button_max_x);
        ctrl.on_animation_complete();
        assert!(ctrl.is_checked());
        assert!(!ctrl.is_animating());
        assert_eq!(ctrl.notification_count(), 1);
    }

    #[test]
    fn test_easing_shapes_progress() {
        let config = SwitchConfig::default().easing(flick_core::Easing::EaseIn);
        let mut ctrl = SwitchController::new(config);
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(150));
        // ease-in at t=0.5 covers a quarter of the travel
        let expected = ctrl.geometry().button_x_at(0.25);
        assert!((ctrl.current_visual_state().button_x - expected).abs() < 1e-4);
    }

    // ===== Geometry Tests =====

    #[test]
    fn test_set_geometry_snaps_to_rest() {
        let mut ctrl = controller();
        let geometry = SwitchGeometry::from_bounds(
            Rect::new(10.0, 10.0, 80.0, 40.0),
            &ctrl.config().palette,
        );
        ctrl.set_geometry(geometry);
        assert_eq!(ctrl.current_visual_state().button_x, geometry.button_min_x);
    }

    #[test]
    fn test_set_geometry_completes_switch() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(100));
        let geometry = SwitchGeometry::from_bounds(
            Rect::new(0.0, 0.0, 100.0, 40.0),
            &ctrl.config().palette,
        );
        ctrl.set_geometry(geometry);
        assert!(ctrl.is_checked());
        assert_eq!(ctrl.phase(), AnimationPhase::Idle);
        assert_eq!(ctrl.notification_count(), 1);
        assert_eq!(ctrl.current_visual_state().button_x, geometry.button_max_x);
    }

    #[test]
    fn test_set_same_geometry_is_noop() {
        let mut ctrl = controller();
        ctrl.toggle(true).unwrap();
        let geometry = *ctrl.geometry();
        ctrl.set_geometry(geometry);
        assert_eq!(ctrl.phase(), AnimationPhase::Switching);
    }

    // ===== Reconfigure Tests =====

    #[test]
    fn test_reconfigure_keeps_listeners() {
        let mut ctrl = controller();
        ctrl.add_listener(|_, _| {});
        ctrl.reconfigure(SwitchConfig::default().checked(true).animation_duration_ms(50));
        assert!(ctrl.is_checked());
        assert_eq!(ctrl.listener_count(), 1);

        ctrl.toggle(true).unwrap();
        ctrl.advance(ms(50));
        assert!(!ctrl.is_checked());
    }

    #[test]
    fn test_reset_checked_does_not_notify() {
        let mut ctrl = controller();
        ctrl.reset_checked(true);
        assert!(ctrl.is_checked());
        assert!(ctrl.config().checked);
        assert_eq!(ctrl.notification_count(), 0);
        assert_eq!(ctrl.current_visual_state(), rest(&ctrl, true));
    }
}
