//! Pointer and touch input.
//!
//! Mouse events already carry coordinates relative to the surface. Touch
//! events carry client coordinates, so they are shifted by the surface's
//! bounding-rect origin. Only the first touch is considered.

use serde::{Deserialize, Serialize};

use super::stroke::Point;

/// Normalized input consumed by the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

/// One active touch, in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// Top-left corner of the surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
}

/// Raw input as sent by the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    TouchStart { touches: Vec<TouchPoint>, rect: SurfaceRect },
    TouchMove { touches: Vec<TouchPoint>, rect: SurfaceRect },
    TouchEnd,
}

impl InputEvent {
    /// Map to surface-relative pointer input.
    ///
    /// Returns `None` for touch start/move events without any touch point,
    /// and for positions that are not finite.
    pub fn normalize(&self) -> Option<PointerEvent> {
        match self {
            InputEvent::PointerDown { x, y } => finite(*x, *y).map(PointerEvent::Down),
            InputEvent::PointerMove { x, y } => finite(*x, *y).map(PointerEvent::Move),
            InputEvent::PointerUp | InputEvent::TouchEnd => Some(PointerEvent::Up),
            InputEvent::PointerLeave => Some(PointerEvent::Leave),
            InputEvent::TouchStart { touches, rect } => {
                first_touch(touches, rect).map(PointerEvent::Down)
            }
            InputEvent::TouchMove { touches, rect } => {
                first_touch(touches, rect).map(PointerEvent::Move)
            }
        }
    }
}

fn finite(x: f32, y: f32) -> Option<Point> {
    (x.is_finite() && y.is_finite()).then(|| Point::new(x, y))
}

fn first_touch(touches: &[TouchPoint], rect: &SurfaceRect) -> Option<Point> {
    touches
        .first()
        .and_then(|t| finite(t.client_x - rect.left, t.client_y - rect.top))
}
