//! Frame-driven timing primitives: easing curves, interpolation, a
//! single-track [`Animator`] and a cancellable [`DelayedAction`].
//!
//! Nothing here owns a clock. Hosts call `advance(dt)` once per frame and act
//! on what comes back, which keeps every timed behavior deterministic under
//! test.

use crate::geometry::Point;
use crate::Color;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Easing Functions
// =============================================================================

/// Standard easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    EaseOut,
    /// Ease in and out (slow start and end)
    EaseInOut,
    /// Cosine-shaped acceleration then deceleration
    AccelerateDecelerate,
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
                }
            }
            Self::AccelerateDecelerate => ((t + 1.0) * std::f64::consts::PI).cos() / 2.0 + 0.5,
        }
    }
}

// =============================================================================
// Interpolate Trait
// =============================================================================

/// Trait for types that can be interpolated.
pub trait Interpolate {
    /// Interpolate between two values.
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        (*to - *from).mul_add(t, *from)
    }
}

impl Interpolate for f64 {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        (to - from).mul_add(f64::from(t), *from)
    }
}

impl Interpolate for Point {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

impl Interpolate for Color {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

// =============================================================================
// Animator - single timed 0..1 track
// =============================================================================

/// One frame of a running [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorStep {
    /// Eased progress in [0.0, 1.0]
    pub progress: f32,
    /// Whether this step ended the animation
    pub finished: bool,
}

/// A restartable 0→1 timeline with a fixed duration.
///
/// Starting while running restarts from zero; there is never more than one
/// track in flight.
///
/// ```
/// use flick_core::Animator;
/// use std::time::Duration;
///
/// let mut animator = Animator::new(Duration::from_millis(300));
/// animator.start();
///
/// let step = animator.advance(Duration::from_millis(150)).unwrap();
/// assert!((step.progress - 0.5).abs() < 1e-6);
/// assert!(!step.finished);
///
/// let step = animator.advance(Duration::from_millis(150)).unwrap();
/// assert!(step.finished);
/// assert!(!animator.is_running());
/// ```
#[derive(Debug, Clone)]
pub struct Animator {
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
    running: bool,
}

impl Animator {
    /// Create an idle animator.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            easing: Easing::Linear,
            running: false,
        }
    }

    /// Set easing function.
    #[must_use]
    pub const fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Total duration of one run.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Easing applied to progress.
    #[must_use]
    pub const fn easing(&self) -> Easing {
        self.easing
    }

    /// Start (or restart) from zero.
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Stop without completing. Returns whether a run was in flight.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Whether a run is in flight.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Eased progress of the current (or last) run.
    #[must_use]
    pub fn progress(&self) -> f32 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            self.elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        self.easing.apply(t) as f32
    }

    /// Advance by `dt`. Returns `None` when idle.
    pub fn advance(&mut self, dt: Duration) -> Option<AnimatorStep> {
        if !self.running {
            return None;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let finished = self.elapsed >= self.duration;
        if finished {
            self.running = false;
        }
        Some(AnimatorStep {
            progress: self.progress(),
            finished,
        })
    }
}

// =============================================================================
// DelayedAction - cancellable one-shot timer
// =============================================================================

/// A one-shot timer that fires once after a delay unless cancelled.
#[derive(Debug, Clone, Default)]
pub struct DelayedAction {
    remaining: Option<Duration>,
}

impl DelayedAction {
    /// Create an unscheduled timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { remaining: None }
    }

    /// Schedule to fire after `delay`, replacing any pending schedule.
    pub fn schedule(&mut self, delay: Duration) {
        self.remaining = Some(delay);
    }

    /// Drop the pending schedule. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    /// Whether the timer is scheduled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by `dt`. When the timer fires, returns how far `dt` overshot
    /// the deadline.
    pub fn advance(&mut self, dt: Duration) -> Option<Duration> {
        let remaining = self.remaining?;
        if dt >= remaining {
            self.remaining = None;
            Some(dt - remaining)
        } else {
            self.remaining = Some(remaining - dt);
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
