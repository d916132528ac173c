//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle:
//!
//! 1. **Measure**: Compute intrinsic size given constraints
//! 2. **Layout**: Position self within allocated bounds
//! 3. **Paint**: Issue drawing calls against a [`Canvas`]
//!
//! Animated widgets additionally receive [`Widget::tick`] once per frame.
//!
//! # Examples
//!
//! ```
//! use flick_core::TypeId;
//!
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//! ```

use crate::constraints::Constraints;
use crate::draw::Shadow;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::time::Duration;

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
pub trait Widget: Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Issue drawing calls for the current state.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle input events. Returns a message when the widget's value changed.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Advance time-based state by `dt`. Returns a message when the widget's
    /// value changed as a result.
    fn tick(&mut self, _dt: Duration) -> Option<Box<dyn Any + Send>> {
        None
    }

    /// Whether the widget has pending visual changes to present.
    fn needs_repaint(&self) -> bool {
        false
    }

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the rendering backend. Angles are in
/// radians, measured clockwise from the positive x axis.
pub trait Canvas {
    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw a filled rounded rectangle.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Draw a stroked rounded rectangle. The stroke is centered on `rect`'s edge.
    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32);

    /// Draw a line between two points.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);

    /// Draw a filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Draw a filled circle casting a drop shadow.
    fn fill_circle_with_shadow(&mut self, center: Point, radius: f32, color: Color, shadow: Shadow);

    /// Draw a stroked circle.
    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32);

    /// Draw a filled arc (pie slice).
    fn fill_arc(
        &mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    );
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Push button
    Button,
    /// Checkbox
    Checkbox,
    /// On/off switch
    Switch,
}
