//! Point-in-time object snapshots exchanged with workers

use super::{ObjectId, Style};
use crate::foundation::math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Immutable copy of an object's worker-relevant attributes
///
/// Produced at the serialization boundary, so `width` and `height` are
/// always resolved pixel values. A snapshot reflects the object state at
/// the moment the batch was built; by the time a worker reply arrives the
/// authoritative object may have moved on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Stable id of the source object
    pub id: ObjectId,
    /// Paint layer (higher = frontmost)
    pub layer: i32,
    /// Position of the top-left corner
    pub position: Vec2,
    /// Velocity in pixels per step
    pub velocity: Vec2,
    /// Rotation in radians; collision and hit tests ignore it
    pub rotation: f64,
    /// Resolved width in pixels
    pub width: f64,
    /// Resolved height in pixels
    pub height: f64,
    /// Corner/circle radius; cosmetic, like `style`
    pub radius: f64,
    /// Participates in collision queries
    pub collisionable: bool,
    /// Can be moved by pointer drags
    pub draggable: bool,
    /// Simulated by the physics engine
    pub physics: bool,
    /// Cosmetic attributes, carried through untouched
    pub style: Style,
}

impl Snapshot {
    /// The snapshot's unrotated bounding box
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }
}
