//! Runtime loop: owns the scene, the workers, and the paint cadence
//!
//! [`SceneRuntime`] is the single mutable context the embedder drives.
//! Each [`update`](SceneRuntime::update) tick drains worker replies,
//! writes physics results back into the store, keeps exactly one physics
//! request in flight, and paints when the quality tier's frame interval
//! has elapsed. The loop is self-paced: it never blocks on a worker, and
//! a slow physics step simply means the next request goes out later.

use crate::config::RuntimeConfig;
use crate::events::{EventBus, EventDispatcher, EventKind, ListenerId, SceneEvent};
use crate::foundation::time::{FpsCounter, Timer};
use crate::render::{is_visible, RenderBackend};
use crate::scene::{Scene, SceneError};
use crate::workers::{
    spawn_hit_test_worker, spawn_physics_worker, PhysicsBatch, RequestId, SceneReply, SceneRequest,
    WorkerError, WorkerHandle,
};
use std::time::Instant;
use thiserror::Error;

/// Pointer input fed into the runtime by the embedder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// A click at the given point
    Click {
        /// Pointer X
        x: f64,
        /// Pointer Y
        y: f64,
    },
    /// The pointer went down at the given point
    Down {
        /// Pointer X
        x: f64,
        /// Pointer Y
        y: f64,
    },
    /// The pointer moved to the given point
    Move {
        /// Pointer X
        x: f64,
        /// Pointer Y
        y: f64,
    },
    /// The pointer was released at the given point
    Up {
        /// Pointer X
        x: f64,
        /// Pointer Y
        y: f64,
    },
}

/// Errors surfaced by the runtime loop
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A worker channel failed
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// A scene store operation failed
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// A point-in-time view of runtime health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Frames counted over the last rolling second
    pub fps: u32,
    /// Objects currently in the store
    pub objects: usize,
    /// Ticks since the runtime started
    pub frames: u64,
}

/// The main-context scene runtime
pub struct SceneRuntime {
    config: RuntimeConfig,
    scene: Scene,
    bus: EventBus,
    dispatcher: EventDispatcher,
    physics_worker: WorkerHandle,
    hit_worker: WorkerHandle,
    timer: Timer,
    fps: FpsCounter,
    physics_in_flight: Option<RequestId>,
    last_paint: Option<Instant>,
    running: bool,
}

impl SceneRuntime {
    /// Create a runtime and spawn its workers
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let physics_worker = spawn_physics_worker()?;
        let hit_worker = spawn_hit_test_worker()?;

        Ok(Self {
            config,
            scene: Scene::new(),
            bus: EventBus::new(),
            dispatcher: EventDispatcher::new(),
            physics_worker,
            hit_worker,
            timer: Timer::new(),
            fps: FpsCounter::new(),
            physics_in_flight: None,
            last_paint: None,
            running: false,
        })
    }

    /// The runtime configuration
    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The scene store
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene store, mutably
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Whether the loop is running
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Register a listener for one event kind
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&SceneEvent) + 'static,
    {
        self.bus.on(kind, listener)
    }

    /// Remove a listener; returns whether it was registered
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.bus.off(kind, id)
    }

    /// Start the loop: reset clocks and ship the first physics request
    pub fn start(&mut self) -> Result<(), RuntimeError> {
        if self.running {
            return Ok(());
        }
        self.running = true;
        self.timer.reset();
        self.fps.reset();
        self.last_paint = None;
        log::info!(
            "runtime started: quality {:?}, {} objects",
            self.config.quality,
            self.scene.len()
        );
        self.send_physics_request()?;
        Ok(())
    }

    /// Stop the loop; in-flight replies are dropped on the next start
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.physics_in_flight = None;
            log::info!("runtime stopped after {} ticks", self.timer.frame_count());
        }
    }

    /// Feed one pointer input into the dispatcher
    pub fn pointer(&mut self, input: PointerInput) -> Result<(), RuntimeError> {
        if !self.running {
            return Ok(());
        }
        match input {
            PointerInput::Click { x, y } => {
                self.dispatcher.pointer_click(x, y, &self.scene, &mut self.hit_worker)?;
            }
            PointerInput::Down { x, y } => {
                self.dispatcher.pointer_down(x, y, &self.scene, &mut self.hit_worker)?;
            }
            PointerInput::Move { x, y } => {
                self.dispatcher.pointer_move(x, y, &mut self.scene, &mut self.bus)?;
            }
            PointerInput::Up { x, y } => {
                self.dispatcher.pointer_up(x, y, &mut self.bus);
            }
        }
        Ok(())
    }

    /// Run one tick: drain replies, step physics, paint if due
    pub fn update<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), RuntimeError> {
        if !self.running {
            return Ok(());
        }
        self.timer.update();
        self.fps.frame();

        for envelope in self.hit_worker.drain_replies() {
            self.dispatcher.handle_reply(envelope, &self.scene, &mut self.bus);
        }

        self.apply_physics_replies()?;
        if self.physics_in_flight.is_none() {
            self.send_physics_request()?;
        }

        if self.config.logs {
            log::debug!(
                "tick {}: {} objects, {} fps, physics request pending: {}",
                self.timer.frame_count(),
                self.scene.len(),
                self.fps.fps(),
                self.physics_in_flight.is_some()
            );
        }

        if self.paint_due() {
            self.paint(backend);
            self.last_paint = Some(Instant::now());
        }
        Ok(())
    }

    /// Current runtime health
    #[must_use]
    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            fps: self.fps.fps(),
            objects: self.scene.len(),
            frames: self.timer.frame_count(),
        }
    }

    fn apply_physics_replies(&mut self) -> Result<(), RuntimeError> {
        for envelope in self.physics_worker.drain_replies() {
            if self.physics_in_flight != Some(envelope.request) {
                log::debug!("dropping stale physics reply {}", envelope.request);
                continue;
            }
            self.physics_in_flight = None;

            let SceneReply::Physics(result) = envelope.payload else {
                log::warn!("physics reply {} has the wrong body", envelope.request);
                continue;
            };
            for node in result.nodes {
                // Objects destroyed while the step was in flight are skipped.
                if !self.scene.apply_motion(&node.id, node.position, node.velocity)? {
                    log::debug!("skipping write-back for destroyed object {}", node.id);
                }
            }
        }
        Ok(())
    }

    fn send_physics_request(&mut self) -> Result<(), RuntimeError> {
        let nodes = self.scene.cache().ordered_view();
        let dt = f64::from(self.fps.fps()) / f64::from(FpsCounter::NOMINAL_FPS);
        let request = self.physics_worker.send(SceneRequest::Physics(PhysicsBatch {
            nodes,
            gravity: self.config.gravity,
            dt,
            dimension: self.config.viewport,
        }))?;
        self.physics_in_flight = Some(request);
        Ok(())
    }

    fn paint_due(&self) -> bool {
        self.last_paint
            .is_none_or(|at| at.elapsed() >= self.config.quality.min_frame_interval())
    }

    fn paint<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        backend.begin_frame(self.config.viewport);
        for snapshot in self.scene.cache().iter() {
            if is_visible(&snapshot.rect(), self.config.viewport) {
                backend.draw(snapshot);
            }
        }
        backend.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::render::{NullBackend, RecordingBackend};
    use crate::scene::{Extent, ObjectSpec};
    use crate::workers::PointQuery;
    use approx::assert_relative_eq;
    use std::thread;
    use std::time::{Duration, Instant};

    fn physics_spec(x: f64, y: f64) -> ObjectSpec {
        ObjectSpec {
            position: Vec2::new(x, y),
            width: Extent::Px(10.0),
            height: Extent::Px(10.0),
            physics: true,
            ..ObjectSpec::default()
        }
    }

    fn tick_until<F: Fn(&SceneRuntime) -> bool>(runtime: &mut SceneRuntime, done: F) {
        let mut backend = NullBackend;
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(runtime) {
            assert!(Instant::now() < deadline, "runtime condition timed out");
            runtime.update(&mut backend).unwrap();
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_start_puts_one_physics_request_in_flight() {
        let mut runtime = SceneRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.scene_mut().create(physics_spec(0.0, 0.0)).unwrap();

        assert!(runtime.physics_in_flight.is_none());
        runtime.start().unwrap();
        assert!(runtime.physics_in_flight.is_some());
    }

    #[test]
    fn test_occupied_flight_slot_blocks_reissue() {
        let mut runtime = SceneRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.scene_mut().create(physics_spec(0.0, 0.0)).unwrap();
        runtime.start().unwrap();

        // Occupy the slot with a request the physics worker never answers,
        // so the guard has to hold across ticks. The reply to the request
        // issued by start() arrives stale and is dropped.
        let blocked = runtime
            .physics_worker
            .send(SceneRequest::Click(PointQuery { nodes: vec![], x: 0.0, y: 0.0 }))
            .unwrap();
        runtime.physics_in_flight = Some(blocked);

        let mut backend = NullBackend;
        for _ in 0..5 {
            runtime.update(&mut backend).unwrap();
            thread::sleep(Duration::from_millis(2));
            assert_eq!(runtime.physics_in_flight, Some(blocked));
        }

        // Once the slot frees, the next tick issues a fresh request.
        runtime.physics_in_flight = None;
        runtime.update(&mut backend).unwrap();
        let reissued = runtime.physics_in_flight;
        assert!(reissued.is_some());
        assert_ne!(reissued, Some(blocked));
    }

    #[test]
    fn test_per_frame_logging_keeps_the_loop_intact() {
        let config = RuntimeConfig { logs: true, ..RuntimeConfig::default() };
        let mut runtime = SceneRuntime::new(config).unwrap();
        let id = runtime.scene_mut().create(physics_spec(0.0, 0.0)).unwrap();
        runtime.start().unwrap();

        tick_until(&mut runtime, |rt| {
            rt.scene().lookup(&id).map(|o| o.position()) != Some(Vec2::new(0.0, 0.0))
        });

        assert!(runtime.stats().frames > 0);
    }

    #[test]
    fn test_one_step_writes_gravity_and_motion_back() {
        let mut runtime = SceneRuntime::new(RuntimeConfig::default()).unwrap();
        let id = runtime.scene_mut().create(physics_spec(0.0, 0.0)).unwrap();
        runtime.start().unwrap();

        tick_until(&mut runtime, |rt| {
            rt.scene().lookup(&id).map(|o| o.position()) != Some(Vec2::new(0.0, 0.0))
        });

        // Default gravity 0.8 at nominal dt 1.0 from velocity (1, 1).
        let object = runtime.scene().lookup(&id).unwrap();
        assert_relative_eq!(object.position().x, 1.0);
        assert_relative_eq!(object.position().y, 1.8);
        assert_relative_eq!(object.velocity().y, 1.8);
    }

    #[test]
    fn test_reply_for_destroyed_object_is_skipped() {
        let mut runtime = SceneRuntime::new(RuntimeConfig::default()).unwrap();
        let doomed = runtime.scene_mut().create(physics_spec(0.0, 0.0)).unwrap();
        let kept = runtime.scene_mut().create(physics_spec(500.0, 0.0)).unwrap();
        runtime.start().unwrap();

        // The batch is in flight; the object dies before the reply lands.
        runtime.scene_mut().destroy(&doomed);
        tick_until(&mut runtime, |rt| {
            rt.scene().lookup(&kept).map(|o| o.position()) != Some(Vec2::new(500.0, 0.0))
        });

        assert!(runtime.scene().lookup(&doomed).is_none());
        assert_eq!(runtime.scene().len(), 1);
    }

    #[test]
    fn test_update_is_a_no_op_before_start() {
        let mut runtime = SceneRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.scene_mut().create(physics_spec(0.0, 0.0)).unwrap();

        let mut backend = RecordingBackend::new();
        runtime.update(&mut backend).unwrap();

        assert!(backend.frames.is_empty());
        assert_eq!(runtime.stats().frames, 0);
    }

    #[test]
    fn test_paint_draws_visible_objects_back_to_front() {
        let mut runtime = SceneRuntime::new(RuntimeConfig::default()).unwrap();
        let scene = runtime.scene_mut();
        let back = scene
            .create(ObjectSpec {
                layer: 1,
                width: Extent::Px(10.0),
                height: Extent::Px(10.0),
                ..ObjectSpec::default()
            })
            .unwrap();
        let front = scene
            .create(ObjectSpec {
                layer: 5,
                width: Extent::Px(10.0),
                height: Extent::Px(10.0),
                ..ObjectSpec::default()
            })
            .unwrap();
        scene
            .create(ObjectSpec {
                position: Vec2::new(-500.0, -500.0),
                width: Extent::Px(10.0),
                height: Extent::Px(10.0),
                ..ObjectSpec::default()
            })
            .unwrap();
        runtime.start().unwrap();

        let mut backend = RecordingBackend::new();
        runtime.update(&mut backend).unwrap();

        assert_eq!(backend.last_frame(), [back.as_str(), front.as_str()]);
    }

    #[test]
    fn test_stop_halts_ticking_and_clears_the_flight_slot() {
        let mut runtime = SceneRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.scene_mut().create(physics_spec(0.0, 0.0)).unwrap();
        runtime.start().unwrap();
        runtime.stop();

        assert!(!runtime.is_running());
        assert!(runtime.physics_in_flight.is_none());

        let frames = runtime.stats().frames;
        runtime.update(&mut NullBackend).unwrap();
        assert_eq!(runtime.stats().frames, frames);
    }
}
