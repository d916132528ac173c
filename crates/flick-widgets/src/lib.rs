//! Widgets for the Flick toolkit.
//!
//! Currently a single widget: the animated [`SwitchButton`] and the
//! [`SwitchController`] state machine that drives it.

pub mod switch;

pub use switch::{
    AnimationPhase, SwitchButton, SwitchChanged, SwitchConfig, SwitchController, SwitchError,
    SwitchGeometry, SwitchPalette, VisualState, DEFAULT_HEIGHT, DEFAULT_WIDTH, PENDING_DRAG_DELAY,
    TAP_THRESHOLD,
};
