//! Core types and traits for the Flick widget toolkit.
//!
//! This crate provides foundational types used by Flick widgets:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`], [`CornerRadius`]
//! - Color representation: [`Color`] with packed ARGB and hex conversions
//! - Layout constraints: [`Constraints`]
//! - Input: [`Event`]
//! - Rendering: the [`Canvas`] trait, [`DrawCommand`] and [`RecordingCanvas`]
//! - Timing: [`Animator`], [`DelayedAction`], [`Easing`], [`Interpolate`]

pub mod animation;
mod canvas;
pub mod color;
mod constraints;
pub mod draw;
mod event;
mod geometry;
pub mod widget;

pub use animation::{Animator, AnimatorStep, DelayedAction, Easing, Interpolate};
pub use canvas::RecordingCanvas;
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use draw::{BoxStyle, DrawCommand, LineCap, Shadow, StrokeStyle};
pub use event::{Event, MouseButton, PointerId, PointerType};
pub use geometry::{CornerRadius, Point, Rect, Size};
pub use widget::{AccessibleRole, Canvas, LayoutResult, TypeId, Widget};
