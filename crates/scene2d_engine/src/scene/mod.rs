//! Scene state: authoritative objects plus the layer-ordered snapshot cache
//!
//! The [`Scene`] is the sole owner of object state. Every other component
//! holds an [`ObjectId`] and resolves it through the scene; workers only ever
//! receive copied-out [`Snapshot`]s, never references. Each attribute
//! mutation re-mirrors the object into the [`SceneCache`] so batches shipped
//! to workers always reflect the latest committed state.

mod cache;
mod object;
mod snapshot;

pub use cache::SceneCache;
pub use object::{Extent, ObjectSpec, SceneObject, Style};
pub use snapshot::Snapshot;

use crate::foundation::math::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Stable unique identifier of a scene object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// View the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Scene-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An object attribute needed at the worker boundary is not numeric.
    ///
    /// Raised when a snapshot is produced for an object whose `auto` extent
    /// has no recorded measurement, instead of letting a non-numeric size
    /// propagate into the physics or hit-test kernels.
    #[error("object `{id}` has no numeric `{attribute}`; measure it before snapshotting")]
    MissingAttribute {
        /// The object the snapshot was produced for
        id: ObjectId,
        /// The attribute that could not be resolved
        attribute: &'static str,
    },

    /// A mutation referenced an id with no live object
    #[error("unknown object `{0}`")]
    UnknownObject(ObjectId),
}

/// Authoritative object store plus its mirrored snapshot cache
///
/// Constructed explicitly per scene and passed to the components that need
/// it; there is no process-wide instance.
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    cache: SceneCache,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            cache: SceneCache::new(),
            next_id: 0,
        }
    }

    /// Create an object from the given spec and mirror it into the cache
    ///
    /// Fails with [`SceneError::MissingAttribute`] when the spec's extents
    /// cannot be resolved to pixels.
    pub fn create(&mut self, spec: ObjectSpec) -> Result<ObjectId, SceneError> {
        let id = ObjectId(format!("obj-{:x}", self.next_id));
        self.next_id += 1;

        let object = SceneObject::from_spec(id.clone(), spec);
        let snapshot = object.snapshot()?;

        self.objects.insert(id.clone(), object);
        self.cache.upsert(snapshot);
        log::debug!("created object {id}");
        Ok(id)
    }

    /// Destroy an object, removing it from the store and the cache
    ///
    /// Destroying an absent id is a no-op.
    pub fn destroy(&mut self, id: &ObjectId) {
        if self.objects.remove(id).is_some() {
            self.cache.remove(id);
            log::debug!("destroyed object {id}");
        }
    }

    /// Resolve an id against the authoritative store
    #[must_use]
    pub fn lookup(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Number of live objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The layer-ordered snapshot cache
    #[must_use]
    pub const fn cache(&self) -> &SceneCache {
        &self.cache
    }

    /// Remove every object and cache entry
    pub fn clear(&mut self) {
        self.objects.clear();
        self.cache.clear();
    }

    /// Set an object's position
    pub fn set_position(&mut self, id: &ObjectId, position: Vec2) -> Result<(), SceneError> {
        self.mutate(id, |object| object.position = position)
    }

    /// Set an object's velocity
    pub fn set_velocity(&mut self, id: &ObjectId, velocity: Vec2) -> Result<(), SceneError> {
        self.mutate(id, |object| object.velocity = velocity)
    }

    /// Set an object's paint layer
    pub fn set_layer(&mut self, id: &ObjectId, layer: i32) -> Result<(), SceneError> {
        self.mutate(id, |object| object.layer = layer)
    }

    /// Set an object's extents
    pub fn set_size(&mut self, id: &ObjectId, width: Extent, height: Extent) -> Result<(), SceneError> {
        self.mutate(id, |object| {
            object.width = width;
            object.height = height;
        })
    }

    /// Record an externally measured pixel size for `auto` extents
    pub fn set_measured(&mut self, id: &ObjectId, width: f64, height: f64) -> Result<(), SceneError> {
        self.mutate(id, |object| object.measured = Some((width, height)))
    }

    /// Toggle whether the object can be dragged
    pub fn set_draggable(&mut self, id: &ObjectId, draggable: bool) -> Result<(), SceneError> {
        self.mutate(id, |object| object.draggable = draggable)
    }

    /// Toggle physics simulation for the object
    pub fn set_physics(&mut self, id: &ObjectId, physics: bool) -> Result<(), SceneError> {
        self.mutate(id, |object| object.physics = physics)
    }

    /// Toggle collision participation for the object
    pub fn set_collisionable(&mut self, id: &ObjectId, collisionable: bool) -> Result<(), SceneError> {
        self.mutate(id, |object| object.collisionable = collisionable)
    }

    /// Set the object's corner/circle radius
    pub fn set_radius(&mut self, id: &ObjectId, radius: f64) -> Result<(), SceneError> {
        self.mutate(id, |object| object.radius = radius)
    }

    /// Replace the object's cosmetic style
    pub fn set_style(&mut self, id: &ObjectId, style: Style) -> Result<(), SceneError> {
        self.mutate(id, |object| object.style = style)
    }

    /// Write back position and velocity from a physics reply
    ///
    /// Returns `false` without touching anything when the id no longer
    /// resolves; a reply can outlive the object it was computed for.
    pub fn apply_motion(
        &mut self,
        id: &ObjectId,
        position: Vec2,
        velocity: Vec2,
    ) -> Result<bool, SceneError> {
        if !self.objects.contains_key(id) {
            return Ok(false);
        }
        self.mutate(id, |object| {
            object.position = position;
            object.velocity = velocity;
        })?;
        Ok(true)
    }

    /// Apply a mutation and re-mirror the object's snapshot into the cache
    fn mutate<F>(&mut self, id: &ObjectId, apply: F) -> Result<(), SceneError>
    where
        F: FnOnce(&mut SceneObject),
    {
        let object = self
            .objects
            .get_mut(id)
            .ok_or_else(|| SceneError::UnknownObject(id.clone()))?;
        apply(object);
        let snapshot = object.snapshot()?;
        self.cache.upsert(snapshot);
        Ok(())
    }
}
