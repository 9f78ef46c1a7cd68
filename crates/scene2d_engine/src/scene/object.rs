//! Authoritative scene objects
//!
//! A [`SceneObject`] is the live, mutable entity owned exclusively by the
//! [`Scene`](super::Scene). Workers never see one; they receive
//! [`Snapshot`](super::Snapshot) copies produced here.

use super::{ObjectId, SceneError, Snapshot};
use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// An extent that is either a fixed pixel size or resolved externally
///
/// `Auto` extents are used by text-like objects whose size comes from a
/// layout pass outside this crate; the measurement is recorded on the object
/// before its snapshot can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extent {
    /// Resolved by an external measurement
    Auto,
    /// Fixed size in pixels
    Px(f64),
}

/// Cosmetic attributes carried opaquely through the runtime
///
/// Nothing in physics or hit-testing reads these; they ride along on
/// snapshots so a render backend sees the full object description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Foreground color
    pub color: String,
    /// Fill color
    pub background: String,
    /// Border color
    pub border_color: String,
    /// Border width in pixels
    pub border_size: f64,
    /// Corner radius in pixels
    pub border_radius: f64,
    /// Shadow color
    pub shadow_color: String,
    /// Shadow blur radius
    pub shadow_blur: f64,
    /// Shadow offset along X
    pub shadow_offset_x: f64,
    /// Shadow offset along Y
    pub shadow_offset_y: f64,
    /// Padding: top, right, bottom, left
    pub padding: [f64; 4],
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: "white".to_string(),
            background: "transparent".to_string(),
            border_color: "transparent".to_string(),
            border_size: 0.0,
            border_radius: 0.0,
            shadow_color: String::new(),
            shadow_blur: 0.0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            padding: [0.0; 4],
        }
    }
}

/// Creation parameters for a scene object
#[derive(Debug, Clone)]
pub struct ObjectSpec {
    /// Paint layer (higher = frontmost)
    pub layer: i32,
    /// Initial position
    pub position: Vec2,
    /// Initial velocity
    pub velocity: Vec2,
    /// Rotation in radians; ignored by collision and hit tests
    pub rotation: f64,
    /// Horizontal extent
    pub width: Extent,
    /// Vertical extent
    pub height: Extent,
    /// Corner/circle radius
    pub radius: f64,
    /// Cosmetic style
    pub style: Style,
    /// Participates in collision queries
    pub collisionable: bool,
    /// Can be moved by pointer drags
    pub draggable: bool,
    /// Simulated by the physics engine
    pub physics: bool,
    /// Externally measured pixel size backing `auto` extents
    pub measured: Option<(f64, f64)>,
}

impl Default for ObjectSpec {
    fn default() -> Self {
        Self {
            layer: 0,
            position: Vec2::new(0.0, 0.0),
            velocity: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            width: Extent::Auto,
            height: Extent::Auto,
            radius: 0.0,
            style: Style::default(),
            collisionable: true,
            draggable: false,
            physics: false,
            measured: None,
        }
    }
}

/// A live scene object
///
/// Fields are crate-private; mutations go through [`Scene`](super::Scene)
/// setters so the snapshot cache stays consistent with every change.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub(super) id: ObjectId,
    pub(super) layer: i32,
    pub(super) position: Vec2,
    pub(super) velocity: Vec2,
    pub(super) rotation: f64,
    pub(super) width: Extent,
    pub(super) height: Extent,
    pub(super) radius: f64,
    pub(super) style: Style,
    pub(super) collisionable: bool,
    pub(super) draggable: bool,
    pub(super) physics: bool,
    pub(super) measured: Option<(f64, f64)>,
}

impl SceneObject {
    pub(super) fn from_spec(id: ObjectId, spec: ObjectSpec) -> Self {
        Self {
            id,
            layer: spec.layer,
            position: spec.position,
            velocity: spec.velocity,
            rotation: spec.rotation,
            width: spec.width,
            height: spec.height,
            radius: spec.radius,
            style: spec.style,
            collisionable: spec.collisionable,
            draggable: spec.draggable,
            physics: spec.physics,
            measured: spec.measured,
        }
    }

    /// The object's stable id
    #[must_use]
    pub const fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Paint layer
    #[must_use]
    pub const fn layer(&self) -> i32 {
        self.layer
    }

    /// Current position
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether pointer drags may move this object
    #[must_use]
    pub const fn draggable(&self) -> bool {
        self.draggable
    }

    /// Whether the physics engine simulates this object
    #[must_use]
    pub const fn physics(&self) -> bool {
        self.physics
    }

    /// Whether the object participates in collision queries
    #[must_use]
    pub const fn collisionable(&self) -> bool {
        self.collisionable
    }

    /// Corner/circle radius
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Cosmetic style
    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    /// Produce an immutable snapshot of the worker-relevant attributes
    ///
    /// This is the serialization boundary: an `auto` extent with no recorded
    /// measurement fails here with [`SceneError::MissingAttribute`] rather
    /// than shipping a non-numeric size into a worker.
    pub fn snapshot(&self) -> Result<Snapshot, SceneError> {
        let width = self.resolve_extent(self.width, self.measured.map(|m| m.0), "width")?;
        let height = self.resolve_extent(self.height, self.measured.map(|m| m.1), "height")?;

        Ok(Snapshot {
            id: self.id.clone(),
            layer: self.layer,
            position: self.position,
            velocity: self.velocity,
            rotation: self.rotation,
            width,
            height,
            radius: self.radius,
            collisionable: self.collisionable,
            draggable: self.draggable,
            physics: self.physics,
            style: self.style.clone(),
        })
    }

    fn resolve_extent(
        &self,
        extent: Extent,
        measured: Option<f64>,
        attribute: &'static str,
    ) -> Result<f64, SceneError> {
        match extent {
            Extent::Px(value) => Ok(value),
            Extent::Auto => measured.ok_or_else(|| SceneError::MissingAttribute {
                id: self.id.clone(),
                attribute,
            }),
        }
    }
}
