//! Gravity integration and bounded collision separation
//!
//! The kernel does no defensive validation: snapshot sizes are resolved to
//! numbers before a batch is built, so every node here has a numeric box.

use crate::foundation::math::Dimension;
use crate::scene::Snapshot;
use serde::{Deserialize, Serialize};

/// Energy retained by the vertical bounce off the floor
pub const RESTITUTION: f64 = 0.2;

/// Fixed number of pairwise separation sweeps per step
///
/// Deliberately not run to convergence: dense configurations may keep
/// residual overlap after the final sweep, and that is accepted.
pub const SEPARATION_ITERATIONS: usize = 2;

/// Per-step simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Gravity constant in pixels/step^2
    pub gravity: f64,
    /// Timestep scale (1.0 = one nominal frame)
    pub dt: f64,
    /// Simulation bounds; the bottom edge acts as the floor
    pub dimension: Dimension,
}

/// Advance a batch of snapshots by one step
///
/// Only nodes with `physics` set are touched; everything else passes
/// through unchanged.
pub fn step(nodes: &mut [Snapshot], params: &PhysicsParams) {
    integrate(nodes, params);
    separate(nodes);
}

/// Whether two nodes' boxes overlap on both axes
#[must_use]
pub fn aabb_overlap(a: &Snapshot, b: &Snapshot) -> bool {
    a.rect().overlaps(&b.rect())
}

/// Gravity integration with a floor clamp
///
/// A node whose stepped position would breach the floor is clamped to rest
/// on it with its vertical velocity reflected and damped; the horizontal
/// component and stepped X are kept.
fn integrate(nodes: &mut [Snapshot], params: &PhysicsParams) {
    for node in nodes.iter_mut().filter(|n| n.physics) {
        let vx = node.velocity.x;
        let vy = node.velocity.y + params.gravity * params.dt;

        let next_x = node.position.x + vx * params.dt;
        let next_y = node.position.y + vy * params.dt;

        if next_y + node.height > params.dimension.height {
            node.position.x = next_x;
            node.position.y = params.dimension.height - node.height;
            node.velocity.y = -vy * RESTITUTION;
            continue;
        }

        node.position.x = next_x;
        node.position.y = next_y;
        node.velocity.x = vx;
        node.velocity.y = vy;
    }
}

/// Push overlapping physics pairs apart along the axis of least penetration
///
/// The overlap is split in half between the two nodes and both velocity
/// components along the resolved axis are zeroed; the other axis is left
/// alone. Ties between the axes resolve along X.
fn separate(nodes: &mut [Snapshot]) {
    for _ in 0..SEPARATION_ITERATIONS {
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if !nodes[i].physics || !nodes[j].physics {
                    continue;
                }
                if !aabb_overlap(&nodes[i], &nodes[j]) {
                    continue;
                }

                let (a_rect, b_rect) = (nodes[i].rect(), nodes[j].rect());
                let overlap_x = a_rect.overlap_x(&b_rect);
                let overlap_y = a_rect.overlap_y(&b_rect);
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }

                let (a, b) = split_pair(nodes, i, j);
                if overlap_x <= overlap_y {
                    let dx = if a.position.x < b.position.x {
                        -overlap_x / 2.0
                    } else {
                        overlap_x / 2.0
                    };
                    a.position.x += dx;
                    b.position.x -= dx;
                    a.velocity.x = 0.0;
                    b.velocity.x = 0.0;
                } else {
                    let dy = if a.position.y < b.position.y {
                        -overlap_y / 2.0
                    } else {
                        overlap_y / 2.0
                    };
                    a.position.y += dy;
                    b.position.y -= dy;
                    a.velocity.y = 0.0;
                    b.velocity.y = 0.0;
                }
            }
        }
    }
}

/// Mutable references to two distinct slice elements, `i < j`
fn split_pair(nodes: &mut [Snapshot], i: usize, j: usize) -> (&mut Snapshot, &mut Snapshot) {
    debug_assert!(i < j, "pair indices must be ordered");
    let (head, tail) = nodes.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::scene::{ObjectId, Style};
    use approx::assert_relative_eq;

    fn node(id: &str, x: f64, y: f64, w: f64, h: f64, physics: bool) -> Snapshot {
        Snapshot {
            id: ObjectId::from(id),
            layer: 0,
            position: Vec2::new(x, y),
            velocity: Vec2::new(0.0, 0.0),
            rotation: 0.0,
            width: w,
            height: h,
            radius: 0.0,
            collisionable: true,
            draggable: false,
            physics,
            style: Style::default(),
        }
    }

    fn params(gravity: f64, dt: f64, height: f64) -> PhysicsParams {
        PhysicsParams {
            gravity,
            dt,
            dimension: Dimension::new(1000.0, height),
        }
    }

    #[test]
    fn test_integration_applies_gravity_and_velocity() {
        let mut nodes = vec![node("a", 0.0, 0.0, 10.0, 10.0, true)];
        nodes[0].velocity = Vec2::new(2.0, 1.0);

        step(&mut nodes, &params(0.5, 1.0, 1000.0));

        assert_relative_eq!(nodes[0].position.x, 2.0);
        assert_relative_eq!(nodes[0].position.y, 1.5);
        assert_relative_eq!(nodes[0].velocity.y, 1.5);
    }

    #[test]
    fn test_non_physics_nodes_pass_through() {
        let mut nodes = vec![node("a", 3.0, 4.0, 10.0, 10.0, false)];
        nodes[0].velocity = Vec2::new(5.0, 5.0);

        step(&mut nodes, &params(0.8, 1.0, 100.0));

        assert_relative_eq!(nodes[0].position.x, 3.0);
        assert_relative_eq!(nodes[0].position.y, 4.0);
    }

    #[test]
    fn test_floor_breach_clamps_and_damps_bounce() {
        // height 10, floor at 100, starting at y=85 with vy=0 and gravity 10:
        // vy' = 10, stepped y = 95, bottom edge 105 breaches the floor.
        let mut nodes = vec![node("a", 0.0, 85.0, 10.0, 10.0, true)];
        nodes[0].velocity = Vec2::new(3.0, 0.0);

        step(&mut nodes, &params(10.0, 1.0, 100.0));

        assert_relative_eq!(nodes[0].position.y, 90.0); // dimension.height - height
        assert_relative_eq!(nodes[0].velocity.y, -2.0); // -vy' * 0.2
        assert_relative_eq!(nodes[0].velocity.x, 3.0); // horizontal kept
        assert_relative_eq!(nodes[0].position.x, 3.0); // stepped X kept
    }

    #[test]
    fn test_overlapping_pair_separates_along_least_penetration() {
        // Overlap 4 on X, 10 on Y: resolved along X, split in half.
        let mut nodes = vec![
            node("a", 0.0, 0.0, 10.0, 10.0, true),
            node("b", 6.0, 0.0, 10.0, 10.0, true),
        ];
        nodes[0].velocity = Vec2::new(4.0, 0.0);
        nodes[1].velocity = Vec2::new(-4.0, 0.0);

        step(&mut nodes, &params(0.0, 0.0, 1000.0));

        assert!(!aabb_overlap(&nodes[0], &nodes[1]));
        assert_relative_eq!(nodes[0].position.x, -2.0);
        assert_relative_eq!(nodes[1].position.x, 8.0);
        assert_relative_eq!(nodes[0].velocity.x, 0.0);
        assert_relative_eq!(nodes[1].velocity.x, 0.0);
    }

    #[test]
    fn test_pairs_with_non_physics_member_are_skipped() {
        let mut nodes = vec![
            node("a", 0.0, 0.0, 10.0, 10.0, true),
            node("b", 2.0, 0.0, 10.0, 10.0, false),
        ];

        step(&mut nodes, &params(0.0, 0.0, 1000.0));

        assert_relative_eq!(nodes[1].position.x, 2.0);
        assert!(aabb_overlap(&nodes[0], &nodes[1]));
    }

    #[test]
    fn test_dense_stack_keeps_residual_overlap_after_capped_sweeps() {
        // Three coincident boxes cannot be fully separated in two sweeps;
        // the cap is part of the contract, so some pair must still overlap.
        let mut nodes = vec![
            node("a", 0.0, 0.0, 10.0, 10.0, true),
            node("b", 0.0, 0.0, 10.0, 10.0, true),
            node("c", 0.0, 0.0, 10.0, 10.0, true),
        ];

        step(&mut nodes, &params(0.0, 0.0, 1000.0));

        let residual = aabb_overlap(&nodes[0], &nodes[1])
            || aabb_overlap(&nodes[0], &nodes[2])
            || aabb_overlap(&nodes[1], &nodes[2]);
        assert!(residual, "two sweeps must not fully resolve a dense stack");
    }
}
