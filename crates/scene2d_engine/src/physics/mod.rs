//! Physics simulation
//!
//! A pure kernel over a batch of snapshots: gravity integration with a
//! floor clamp, followed by a bounded pairwise separation pass. It holds no
//! state of its own and performs no I/O, which is what lets it run on an
//! isolated worker thread.

mod solver;

pub use solver::{aabb_overlap, step, PhysicsParams, RESTITUTION, SEPARATION_ITERATIONS};
