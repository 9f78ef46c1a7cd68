//! Worker message bodies
//!
//! The wire envelope is `{type, data}`: the request and reply enums are
//! serde-tagged so `type` selects the variant and `data` carries the body.
//! Field names match the protocol (`elementClick`, `elementDrag`).

use crate::foundation::math::Dimension;
use crate::scene::{ObjectId, Snapshot};
use serde::{Deserialize, Serialize};

/// A request shipped to a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SceneRequest {
    /// Step a batch of snapshots
    Physics(PhysicsBatch),
    /// Find the frontmost object under a click point
    Click(PointQuery),
    /// Find the frontmost object under a pointer-down point
    Dragstart(PointQuery),
}

impl SceneRequest {
    /// Wire name of the message type
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Physics(_) => "physics",
            Self::Click(_) => "click",
            Self::Dragstart(_) => "dragstart",
        }
    }
}

/// A reply shipped back from a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SceneReply {
    /// Stepped node batch
    Physics(PhysicsResult),
    /// Result of a click hit-test
    Click(ClickHit),
    /// Result of a pointer-down hit-test
    Dragstart(DragHit),
}

/// Snapshot batch plus simulation parameters for one physics step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsBatch {
    /// Snapshots in ascending layer order
    pub nodes: Vec<Snapshot>,
    /// Gravity constant in pixels/step^2
    pub gravity: f64,
    /// Timestep scale (1.0 = one nominal frame)
    pub dt: f64,
    /// Simulation bounds
    pub dimension: Dimension,
}

/// Stepped snapshots; non-motion fields pass through unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsResult {
    /// Updated snapshots in request order
    pub nodes: Vec<Snapshot>,
}

/// Snapshot batch in reverse layer order plus the queried point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointQuery {
    /// Snapshots, topmost layer first
    pub nodes: Vec<Snapshot>,
    /// Queried X coordinate
    pub x: f64,
    /// Queried Y coordinate
    pub y: f64,
}

/// Frontmost object under a click point, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickHit {
    /// Id of the hit object
    #[serde(rename = "elementClick", default, skip_serializing_if = "Option::is_none")]
    pub element_click: Option<ObjectId>,
    /// Echoed X coordinate
    pub x: f64,
    /// Echoed Y coordinate
    pub y: f64,
}

/// Frontmost object under a pointer-down point, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragHit {
    /// Id of the hit object
    #[serde(rename = "elementDrag", default, skip_serializing_if = "Option::is_none")]
    pub element_drag: Option<ObjectId>,
    /// Echoed X coordinate
    pub x: f64,
    /// Echoed Y coordinate
    pub y: f64,
}
