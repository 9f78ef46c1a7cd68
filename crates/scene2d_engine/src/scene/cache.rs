//! Layer-ordered snapshot cache
//!
//! Keeps one snapshot per object id, ordered ascending by paint layer. The
//! ordered sequence is what render and physics batches are built from; the
//! reverse view feeds hit-testing so the first match is the frontmost
//! object. An id-to-index side map makes removal cheap on the mutation hot
//! path instead of scanning the sequence.

use super::{ObjectId, Snapshot};
use std::collections::HashMap;

/// Id-unique, layer-ordered index of object snapshots
#[derive(Debug, Default)]
pub struct SceneCache {
    ordered: Vec<Snapshot>,
    index: HashMap<ObjectId, usize>,
}

impl SceneCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the snapshot for an id
    ///
    /// An existing entry is removed first, then the new snapshot is placed
    /// at the lower bound of its layer. Among equal layers this orders the
    /// most recent upsert first; callers must not rely on any other order
    /// between equal-layer entries.
    pub fn upsert(&mut self, snapshot: Snapshot) {
        if self.index.contains_key(&snapshot.id) {
            self.remove(&snapshot.id);
        }

        let at = self.ordered.partition_point(|e| e.layer < snapshot.layer);
        self.ordered.insert(at, snapshot);
        self.reindex_from(at);
    }

    /// Remove the entry for an id; absent ids are a no-op
    pub fn remove(&mut self, id: &ObjectId) {
        if let Some(at) = self.index.remove(id) {
            self.ordered.remove(at);
            self.reindex_from(at);
        }
    }

    /// Look up a snapshot by id
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&Snapshot> {
        self.index.get(id).map(|&at| &self.ordered[at])
    }

    /// Copy of the entries, ascending by layer
    #[must_use]
    pub fn ordered_view(&self) -> Vec<Snapshot> {
        self.ordered.clone()
    }

    /// Copy of the entries, topmost layer first
    ///
    /// Exact reverse of [`ordered_view`](Self::ordered_view); used for
    /// hit-testing so the first containing box wins.
    #[must_use]
    pub fn reverse_ordered_view(&self) -> Vec<Snapshot> {
        let mut view = self.ordered.clone();
        view.reverse();
        view
    }

    /// Iterate the entries in ascending layer order
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.ordered.iter()
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.ordered.clear();
        self.index.clear();
    }

    /// Rebuild index entries from `at` to the end of the sequence
    fn reindex_from(&mut self, at: usize) {
        for i in at..self.ordered.len() {
            self.index.insert(self.ordered[i].id.clone(), i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::scene::Style;

    fn snapshot(id: &str, layer: i32) -> Snapshot {
        Snapshot {
            id: ObjectId::from(id),
            layer,
            position: Vec2::new(0.0, 0.0),
            velocity: Vec2::new(0.0, 0.0),
            rotation: 0.0,
            width: 10.0,
            height: 10.0,
            radius: 0.0,
            collisionable: true,
            draggable: false,
            physics: false,
            style: Style::default(),
        }
    }

    fn ids(view: &[Snapshot]) -> Vec<&str> {
        view.iter().map(|s| s.id.as_str()).collect()
    }

    fn assert_sorted_by_layer(cache: &SceneCache) {
        let view = cache.ordered_view();
        for pair in view.windows(2) {
            assert!(
                pair[0].layer <= pair[1].layer,
                "layers out of order: {} > {}",
                pair[0].layer,
                pair[1].layer
            );
        }
    }

    #[test]
    fn test_ordering_invariant_over_interleaved_mutations() {
        let mut cache = SceneCache::new();
        let ops: &[(&str, i32)] = &[
            ("a", 5), ("b", 1), ("c", 9), ("d", 1), ("e", -3),
            ("a", 2), ("f", 9), ("b", 7), ("g", 0),
        ];

        for &(id, layer) in ops {
            cache.upsert(snapshot(id, layer));
            assert_sorted_by_layer(&cache);
        }

        cache.remove(&ObjectId::from("c"));
        cache.remove(&ObjectId::from("e"));
        assert_sorted_by_layer(&cache);

        cache.upsert(snapshot("h", 4));
        assert_sorted_by_layer(&cache);
    }

    #[test]
    fn test_upsert_is_id_unique() {
        let mut cache = SceneCache::new();
        cache.upsert(snapshot("a", 1));
        cache.upsert(snapshot("a", 8));

        assert_eq!(cache.len(), 1);
        let entry = cache.get(&ObjectId::from("a")).unwrap();
        assert_eq!(entry.layer, 8);
    }

    #[test]
    fn test_reverse_view_is_exact_reverse() {
        let mut cache = SceneCache::new();
        for (id, layer) in [("a", 3), ("b", 1), ("c", 2), ("d", 1)] {
            cache.upsert(snapshot(id, layer));

            let mut forward = cache.ordered_view();
            forward.reverse();
            assert_eq!(ids(&forward), ids(&cache.reverse_ordered_view()));
        }
    }

    #[test]
    fn test_equal_layer_ties_order_most_recent_first() {
        let mut cache = SceneCache::new();
        cache.upsert(snapshot("a1", 0));
        cache.upsert(snapshot("b1", 5));
        cache.upsert(snapshot("c1", 5));

        assert_eq!(ids(&cache.ordered_view()), vec!["a1", "c1", "b1"]);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cache = SceneCache::new();
        cache.upsert(snapshot("a", 0));
        cache.remove(&ObjectId::from("missing"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_index_stays_consistent_after_removal() {
        let mut cache = SceneCache::new();
        for (id, layer) in [("a", 0), ("b", 1), ("c", 2), ("d", 3)] {
            cache.upsert(snapshot(id, layer));
        }
        cache.remove(&ObjectId::from("b"));

        assert_eq!(cache.get(&ObjectId::from("c")).unwrap().layer, 2);
        assert_eq!(cache.get(&ObjectId::from("d")).unwrap().layer, 3);
        assert!(cache.get(&ObjectId::from("b")).is_none());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut cache = SceneCache::new();
        cache.upsert(snapshot("a", 0));
        cache.upsert(snapshot("b", 1));
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get(&ObjectId::from("a")).is_none());
    }
}
