//! Isolated worker contexts and their message protocol
//!
//! Physics and hit-testing run on dedicated threads with no shared memory;
//! the only way in or out is asynchronous message passing over channels.
//! Every request carries a correlation id and replies echo it, so any
//! number of requests may be in flight without racing for a single reply
//! handler. Sends are fire-and-forget; the main context drains replies on
//! its own schedule and never blocks on a worker.

mod handle;
mod messages;

pub use handle::{Envelope, RequestId, WorkerError, WorkerHandle};
pub use messages::{ClickHit, DragHit, PhysicsBatch, PhysicsResult, PointQuery, SceneReply, SceneRequest};

use crate::hit_test;
use crate::physics::{self, PhysicsParams};

/// Spawn the physics worker
///
/// The worker answers `physics` requests with stepped node batches and
/// ignores anything else.
pub fn spawn_physics_worker() -> Result<WorkerHandle, WorkerError> {
    WorkerHandle::spawn("physics-worker", |request| match request {
        SceneRequest::Physics(mut batch) => {
            let params = PhysicsParams {
                gravity: batch.gravity,
                dt: batch.dt,
                dimension: batch.dimension,
            };
            physics::step(&mut batch.nodes, &params);
            Some(SceneReply::Physics(PhysicsResult { nodes: batch.nodes }))
        }
        other => {
            log::warn!("physics worker ignoring `{}` request", other.kind());
            None
        }
    })
}

/// Spawn the hit-test worker
///
/// The worker answers `click` and `dragstart` requests with the frontmost
/// hit under the queried point, if any.
pub fn spawn_hit_test_worker() -> Result<WorkerHandle, WorkerError> {
    WorkerHandle::spawn("hit-test-worker", |request| match request {
        SceneRequest::Click(query) => Some(SceneReply::Click(ClickHit {
            element_click: hit_test::hit_test(&query.nodes, query.x, query.y),
            x: query.x,
            y: query.y,
        })),
        SceneRequest::Dragstart(query) => Some(SceneReply::Dragstart(DragHit {
            element_drag: hit_test::hit_test(&query.nodes, query.x, query.y),
            x: query.x,
            y: query.y,
        })),
        other => {
            log::warn!("hit-test worker ignoring `{}` request", other.kind());
            None
        }
    })
}
