//! Pointer-event state machine
//!
//! Hit-testing happens on a worker, so pointer-down and click are split
//! into an issue phase (ship a reverse-layer batch plus the point) and a
//! resolve phase (match the reply by correlation id, re-resolve the hit id
//! against the authoritative store, then notify). The store may have moved
//! on between the two phases; a reply whose id no longer resolves is
//! dropped silently.

use super::{EventBus, EventKind, SceneEvent};
use crate::foundation::math::Vec2;
use crate::scene::{ObjectId, Scene, SceneError};
use crate::workers::{Envelope, PointQuery, RequestId, SceneReply, SceneRequest, WorkerError, WorkerHandle};
use std::collections::HashMap;

/// Transient state of one in-progress drag interaction
///
/// Exists only between a resolved pointer-down and the next pointer-up.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Id of the dragged object
    pub target_id: ObjectId,
    /// Object position when the drag began
    pub origin_object_position: Vec2,
    /// Pointer position when the drag began
    pub origin_pointer_position: Vec2,
}

/// What an outstanding hit-test request will resolve into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingHit {
    Click,
    DragStart,
}

/// Pointer-event state machine: Idle until a pointer-down resolves onto an
/// object, Dragging until the next pointer-up
#[derive(Default)]
pub struct EventDispatcher {
    pending: HashMap<RequestId, PendingHit>,
    session: Option<DragSession>,
}

impl EventDispatcher {
    /// Create a dispatcher in the Idle state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag session is active
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// The active drag session, if any
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Handle a pointer click: issue a hit-test request at the click point
    pub fn pointer_click(
        &mut self,
        x: f64,
        y: f64,
        scene: &Scene,
        hit_worker: &mut WorkerHandle,
    ) -> Result<(), WorkerError> {
        let request = hit_worker.send(SceneRequest::Click(PointQuery {
            nodes: scene.cache().reverse_ordered_view(),
            x,
            y,
        }))?;
        self.pending.insert(request, PendingHit::Click);
        Ok(())
    }

    /// Handle a pointer-down: issue a hit-test request at the down point
    ///
    /// Ignored while a drag session is already active.
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        scene: &Scene,
        hit_worker: &mut WorkerHandle,
    ) -> Result<(), WorkerError> {
        if self.session.is_some() {
            return Ok(());
        }
        let request = hit_worker.send(SceneRequest::Dragstart(PointQuery {
            nodes: scene.cache().reverse_ordered_view(),
            x,
            y,
        }))?;
        self.pending.insert(request, PendingHit::DragStart);
        Ok(())
    }

    /// Handle a pointer move while a drag session is active
    ///
    /// The new position is always computed from the drag origin rather than
    /// the previous move, so replies and moves cannot accumulate drift. The
    /// `dragmove` notification is emitted even for non-draggable targets.
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        scene: &mut Scene,
        bus: &mut EventBus,
    ) -> Result<(), SceneError> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };

        if scene.lookup(&session.target_id).is_some_and(crate::scene::SceneObject::draggable) {
            let delta = Vec2::new(x, y) - session.origin_pointer_position;
            scene.set_position(&session.target_id, session.origin_object_position + delta)?;
        }

        bus.emit(&SceneEvent {
            kind: EventKind::DragMove,
            x,
            y,
            target: session.target_id,
        });
        Ok(())
    }

    /// Handle a pointer-up: end the drag session, if one exists
    ///
    /// `dragend` is only emitted when a session recorded a target; a
    /// pointer-up that never entered Dragging just settles back to Idle.
    pub fn pointer_up(&mut self, x: f64, y: f64, bus: &mut EventBus) {
        if let Some(session) = self.session.take() {
            bus.emit(&SceneEvent {
                kind: EventKind::DragEnd,
                x,
                y,
                target: session.target_id,
            });
        }
    }

    /// Resolve a hit-test reply against the pending-request map
    ///
    /// Replies with no pending entry (or whose hit id no longer resolves in
    /// the store) are dropped silently.
    pub fn handle_reply(&mut self, envelope: Envelope<SceneReply>, scene: &Scene, bus: &mut EventBus) {
        let Some(pending) = self.pending.remove(&envelope.request) else {
            log::debug!("dropping unsolicited hit-test reply {}", envelope.request);
            return;
        };

        match (pending, envelope.payload) {
            (PendingHit::Click, SceneReply::Click(hit)) => {
                let Some(id) = hit.element_click else { return };
                if scene.lookup(&id).is_some() {
                    bus.emit(&SceneEvent { kind: EventKind::Click, x: hit.x, y: hit.y, target: id });
                }
            }
            (PendingHit::DragStart, SceneReply::Dragstart(hit)) => {
                let Some(id) = hit.element_drag else { return };
                let Some(object) = scene.lookup(&id) else { return };

                self.session = Some(DragSession {
                    target_id: id.clone(),
                    origin_object_position: object.position(),
                    origin_pointer_position: Vec2::new(hit.x, hit.y),
                });
                bus.emit(&SceneEvent { kind: EventKind::DragStart, x: hit.x, y: hit.y, target: id });
            }
            _ => {
                log::warn!("hit-test reply {} does not match its request kind", envelope.request);
            }
        }
    }
}
