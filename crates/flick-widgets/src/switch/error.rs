//! Error types for the switch.

use thiserror::Error;

/// Errors raised by [`SwitchController`](super::SwitchController) and
/// [`SwitchConfig`](super::SwitchConfig).
#[derive(Debug, Error)]
pub enum SwitchError {
    /// A checked-changed listener tried to change the switch it observes.
    #[error("switch state must not change from inside a checked-changed listener")]
    ReentrantToggle,

    /// Configuration document failed to parse.
    #[error("invalid switch config: {0}")]
    Config(#[from] toml::de::Error),
}
