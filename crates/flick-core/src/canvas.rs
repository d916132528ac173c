//! Canvas implementations for rendering.

use crate::draw::{BoxStyle, DrawCommand, Shadow, StrokeStyle};
use crate::widget::Canvas;
use crate::{Color, CornerRadius, Point, Rect};

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// Useful for testing what a widget painted, or for shipping commands to a
/// backend that rasterizes them later.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Get the number of recorded commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clear all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    fn stroke(color: Color, width: f32) -> StrokeStyle {
        StrokeStyle {
            color,
            width,
            ..Default::default()
        }
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::filled_rect(rect, color));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.commands
            .push(DrawCommand::rounded_rect(rect, radius, color));
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::Rect {
            bounds: rect,
            radius: CornerRadius::uniform(radius),
            style: BoxStyle::stroke(Self::stroke(color, width)),
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands
            .push(DrawCommand::line(from, to, Self::stroke(color, width)));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands
            .push(DrawCommand::filled_circle(center, radius, color));
    }

    fn fill_circle_with_shadow(&mut self, center: Point, radius: f32, color: Color, shadow: Shadow) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: BoxStyle::fill(color).with_shadow(shadow),
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: BoxStyle::stroke(Self::stroke(color, width)),
        });
    }

    fn fill_arc(
        &mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
    ) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            color,
        });
    }
}
