//! Math utilities and types
//!
//! Provides the fundamental math types for the 2D scene runtime. Pointer
//! and canvas coordinates are doubles, so everything here is `f64`.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// Width and height of a viewport or canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Dimension {
    /// Create a new dimension
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box in scene coordinates
///
/// Rotation is ignored throughout the runtime: hit-testing and collision
/// both operate on unrotated boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
}

impl Rect {
    /// Create a new rect from its top-left corner and size
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the point lies inside the box, edges included
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Whether two boxes overlap on both axes (touching edges do not count)
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Signed penetration depth along X (non-positive when separated)
    #[must_use]
    pub fn overlap_x(&self, other: &Self) -> f64 {
        self.right().min(other.right()) - self.x.max(other.x)
    }

    /// Signed penetration depth along Y (non-positive when separated)
    #[must_use]
    pub fn overlap_y(&self, other: &Self) -> f64 {
        self.bottom().min(other.bottom()) - self.y.max(other.y)
    }
}
