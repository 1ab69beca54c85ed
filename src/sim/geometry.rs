//! Axis-aligned rectangles and overlap testing
//!
//! Screen convention: x grows to the right, y grows downward, so `top < bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Box for an entity resting on or above the ground line (y = 0)
    ///
    /// `origin.x` is the left edge, `origin.y` the height above ground.
    pub fn from_ground(origin: Vec2, size: Vec2) -> Self {
        Self {
            left: origin.x,
            right: origin.x + size.x,
            top: -(origin.y + size.y),
            bottom: -origin.y,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// True when `a` and `b` overlap
///
/// Touching horizontal edges count as overlap, touching vertical edges do not.
#[inline]
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.right >= b.left && a.left <= b.right && a.bottom > b.top && a.top < b.bottom
}
