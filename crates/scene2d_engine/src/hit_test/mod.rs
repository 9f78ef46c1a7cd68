//! Pointer hit-testing
//!
//! A pure kernel over a batch of snapshots and a point. Batches arrive in
//! reverse layer order (topmost first), so the first containing box is the
//! frontmost object and the scan stops there. Boxes are tested unrotated;
//! ignoring rotation is a documented approximation.

use crate::foundation::math::Dimension;
use crate::scene::{ObjectId, Snapshot};

/// Whether the point lies inside the node's box, edges included
#[must_use]
pub fn contains_point(node: &Snapshot, x: f64, y: f64) -> bool {
    node.rect().contains(x, y)
}

/// Id of the first node whose box contains the point
///
/// Scans in input order and stops at the first match; with a reverse-layer
/// batch that is the frontmost object under the pointer.
#[must_use]
pub fn hit_test(nodes: &[Snapshot], x: f64, y: f64) -> Option<ObjectId> {
    nodes
        .iter()
        .find(|node| contains_point(node, x, y))
        .map(|node| node.id.clone())
}

/// Whether the node's bottom edge is at or beyond the floor
#[must_use]
pub fn check_limit_collision(node: &Snapshot, dimension: &Dimension) -> bool {
    node.position.y + node.height >= dimension.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::scene::Style;

    fn node(id: &str, layer: i32, x: f64, y: f64, w: f64, h: f64) -> Snapshot {
        Snapshot {
            id: ObjectId::from(id),
            layer,
            position: Vec2::new(x, y),
            velocity: Vec2::new(0.0, 0.0),
            rotation: 0.0,
            width: w,
            height: h,
            radius: 0.0,
            collisionable: true,
            draggable: false,
            physics: false,
            style: Style::default(),
        }
    }

    #[test]
    fn test_frontmost_wins_on_overlap() {
        // Reverse layer order: topmost first.
        let nodes = vec![
            node("high", 5, 0.0, 0.0, 20.0, 20.0),
            node("low", 1, 0.0, 0.0, 20.0, 20.0),
        ];

        let hit = hit_test(&nodes, 10.0, 10.0);
        assert_eq!(hit, Some(ObjectId::from("high")));
    }

    #[test]
    fn test_miss_returns_none() {
        let nodes = vec![node("a", 0, 0.0, 0.0, 10.0, 10.0)];
        assert_eq!(hit_test(&nodes, 50.0, 50.0), None);
        assert_eq!(hit_test(&[], 1.0, 1.0), None);
    }

    #[test]
    fn test_edges_are_inclusive() {
        let nodes = vec![node("a", 0, 10.0, 10.0, 20.0, 20.0)];
        assert_eq!(hit_test(&nodes, 10.0, 10.0), Some(ObjectId::from("a")));
        assert_eq!(hit_test(&nodes, 30.0, 30.0), Some(ObjectId::from("a")));
        assert_eq!(hit_test(&nodes, 30.01, 30.0), None);
    }

    #[test]
    fn test_scan_continues_past_non_containing_nodes() {
        let nodes = vec![
            node("top", 9, 100.0, 100.0, 10.0, 10.0),
            node("under", 1, 0.0, 0.0, 10.0, 10.0),
        ];
        assert_eq!(hit_test(&nodes, 5.0, 5.0), Some(ObjectId::from("under")));
    }

    #[test]
    fn test_limit_collision_at_and_beyond_floor() {
        let dimension = Dimension::new(100.0, 100.0);

        let resting = node("a", 0, 0.0, 90.0, 10.0, 10.0);
        assert!(check_limit_collision(&resting, &dimension));

        let sunk = node("b", 0, 0.0, 95.0, 10.0, 10.0);
        assert!(check_limit_collision(&sunk, &dimension));

        let airborne = node("c", 0, 0.0, 50.0, 10.0, 10.0);
        assert!(!check_limit_collision(&airborne, &dimension));
    }
}
