//! # Scene2D Engine
//!
//! A 2D scene runtime that keeps a live set of visual objects ordered by
//! paint layer, dispatches pointer interactions against them, and runs a
//! gravity + collision simulation without stalling the render loop.
//!
//! ## Architecture
//!
//! - **Scene** owns the authoritative objects and mirrors every mutation
//!   into a layer-ordered snapshot cache.
//! - **Workers**: physics stepping and pointer hit-testing run on isolated
//!   worker threads reached only through asynchronous message passing; the
//!   main context never blocks on them.
//! - **EventDispatcher** reconciles asynchronous hit-test replies with the
//!   authoritative store and drives click/drag notifications.
//! - **SceneRuntime** is the per-frame scheduler: it paces physics stepping
//!   by worker round-trip latency and gates paint passes by quality level.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene2d_engine::prelude::*;
//!
//! fn main() -> Result<(), RuntimeError> {
//!     let mut runtime = SceneRuntime::new(RuntimeConfig::default())?;
//!
//!     let spec = ObjectSpec {
//!         position: Vec2::new(100.0, 50.0),
//!         width: Extent::Px(40.0),
//!         height: Extent::Px(40.0),
//!         physics: true,
//!         ..ObjectSpec::default()
//!     };
//!     runtime.scene_mut().create(spec)?;
//!
//!     runtime.on(EventKind::Click, |ev| {
//!         println!("clicked {} at ({}, {})", ev.target, ev.x, ev.y);
//!     });
//!
//!     runtime.start()?;
//!     let mut backend = NullBackend;
//!     loop {
//!         runtime.update(&mut backend)?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod events;
pub mod foundation;
pub mod hit_test;
pub mod physics;
pub mod render;
pub mod runtime;
pub mod scene;
pub mod workers;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, Quality, RuntimeConfig},
        events::{EventBus, EventKind, SceneEvent},
        foundation::math::{Dimension, Rect, Vec2},
        render::{NullBackend, RenderBackend},
        runtime::{PointerInput, RuntimeError, SceneRuntime},
        scene::{Extent, ObjectId, ObjectSpec, Scene, SceneError, Snapshot},
    };
}
