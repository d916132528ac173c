//! Draw commands recorded by canvases.
//!
//! All widget painting reduces to these primitives.

use crate::{Color, CornerRadius, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stroke style for outlines and lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
    /// Line cap style
    pub cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            cap: LineCap::Butt,
        }
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    /// Flat cap at endpoint
    #[default]
    Butt,
    /// Rounded cap
    Round,
    /// Square cap extending beyond endpoint
    Square,
}

/// Box style for rectangles and circles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Fill color (None = no fill)
    pub fill: Option<Color>,
    /// Stroke style (None = no stroke)
    pub stroke: Option<StrokeStyle>,
    /// Shadow (None = no shadow)
    pub shadow: Option<Shadow>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self::fill(Color::WHITE)
    }
}

impl BoxStyle {
    /// Create a box with only fill color.
    #[must_use]
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            shadow: None,
        }
    }

    /// Create a box with only stroke.
    #[must_use]
    pub const fn stroke(style: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(style),
            shadow: None,
        }
    }

    /// Add a shadow to the box.
    #[must_use]
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }
}

/// Drop shadow configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Shadow color
    pub color: Color,
    /// Horizontal offset
    pub offset_x: f32,
    /// Vertical offset
    pub offset_y: f32,
    /// Blur radius
    pub blur: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::new(0.0, 0.0, 0.0, 0.2),
            offset_x: 0.0,
            offset_y: 1.5,
            blur: 2.5,
        }
    }
}

/// Drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw a polyline
    Path {
        /// Points defining the path
        points: Vec<Point>,
        /// Whether the path is closed
        closed: bool,
        /// Stroke style
        style: StrokeStyle,
    },

    /// Draw a (possibly rounded) rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Corner radius
        radius: CornerRadius,
        /// Box style
        style: BoxStyle,
    },

    /// Draw a circle
    Circle {
        /// Center point
        center: Point,
        /// Radius
        radius: f32,
        /// Box style
        style: BoxStyle,
    },

    /// Draw a filled pie slice
    Arc {
        /// Center point
        center: Point,
        /// Radius
        radius: f32,
        /// Start angle in radians
        start_angle: f32,
        /// End angle in radians
        end_angle: f32,
        /// Fill color
        color: Color,
    },
}

impl DrawCommand {
    /// Create a filled rectangle.
    #[must_use]
    pub const fn filled_rect(bounds: Rect, color: Color) -> Self {
        Self::Rect {
            bounds,
            radius: CornerRadius::ZERO,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a filled rounded rectangle.
    #[must_use]
    pub const fn rounded_rect(bounds: Rect, radius: f32, color: Color) -> Self {
        Self::Rect {
            bounds,
            radius: CornerRadius::uniform(radius),
            style: BoxStyle::fill(color),
        }
    }

    /// Create a filled circle.
    #[must_use]
    pub const fn filled_circle(center: Point, radius: f32, color: Color) -> Self {
        Self::Circle {
            center,
            radius,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a line between two points.
    #[must_use]
    pub fn line(from: Point, to: Point, style: StrokeStyle) -> Self {
        Self::Path {
            points: vec![from, to],
            closed: false,
            style,
        }
    }

    /// Fill color of the command, if it fills anything.
    #[must_use]
    pub fn fill_color(&self) -> Option<Color> {
        match self {
            Self::Rect { style, .. } | Self::Circle { style, .. } => style.fill,
            Self::Arc { color, .. } => Some(*color),
            Self::Path { .. } => None,
        }
    }

    /// Stroke style of the command, if it strokes anything.
    #[must_use]
    pub fn stroke_style(&self) -> Option<&StrokeStyle> {
        match self {
            Self::Rect { style, .. } | Self::Circle { style, .. } => style.stroke.as_ref(),
            Self::Path { style, .. } => Some(style),
            Self::Arc { .. } => None,
        }
    }
}
