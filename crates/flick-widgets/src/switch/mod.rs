//! Animated toggle switch.
//!
//! [`SwitchController`] is the state machine: it owns the checked value, the
//! [`AnimationPhase`] and the [`VisualState`] snapshot. [`SwitchButton`] wraps
//! it in a [`Widget`](flick_core::Widget) that lays out, paints and routes
//! pointer input.

mod button;
mod config;
mod controller;
mod error;
mod state;

pub use button::{SwitchButton, SwitchChanged};
pub use config::{
    SwitchConfig, SwitchPalette, DEFAULT_HEIGHT, DEFAULT_WIDTH, PENDING_DRAG_DELAY, TAP_THRESHOLD,
};
pub use controller::SwitchController;
pub use error::SwitchError;
pub use state::{AnimationPhase, SwitchGeometry, VisualState};
