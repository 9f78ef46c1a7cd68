//! Paint abstraction
//!
//! The runtime drives a [`RenderBackend`] once per paint: `begin_frame`,
//! one `draw` per visible snapshot in ascending layer order, `end_frame`.
//! The engine ships no rasterizer of its own; embedders implement the
//! trait over whatever surface they target. [`NullBackend`] discards
//! everything and is what headless hosts and benchmarks use.

use crate::foundation::math::{Dimension, Rect};
use crate::scene::Snapshot;

/// Receiver for one painted frame
pub trait RenderBackend {
    /// Start a frame over the given viewport
    fn begin_frame(&mut self, viewport: Dimension);

    /// Paint one snapshot; calls arrive back-to-front
    fn draw(&mut self, snapshot: &Snapshot);

    /// Finish the frame
    fn end_frame(&mut self);
}

/// Backend that discards every call
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn begin_frame(&mut self, _viewport: Dimension) {}
    fn draw(&mut self, _snapshot: &Snapshot) {}
    fn end_frame(&mut self) {}
}

/// Backend that records draw order, for assertions in tests and demos
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Ids drawn in each completed or in-progress frame
    pub frames: Vec<Vec<String>>,
}

impl RecordingBackend {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids drawn in the most recent frame
    #[must_use]
    pub fn last_frame(&self) -> &[String] {
        self.frames.last().map_or(&[], Vec::as_slice)
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_frame(&mut self, _viewport: Dimension) {
        self.frames.push(Vec::new());
    }

    fn draw(&mut self, snapshot: &Snapshot) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(snapshot.id.as_str().to_string());
        }
    }

    fn end_frame(&mut self) {}
}

/// Whether a rect intersects the viewport at all
///
/// Edge-touching rects count as visible so objects resting on the floor
/// still paint.
#[must_use]
pub fn is_visible(rect: &Rect, viewport: Dimension) -> bool {
    rect.right() >= 0.0 && rect.x <= viewport.width && rect.bottom() >= 0.0 && rect.y <= viewport.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::scene::{ObjectId, Style};

    fn snapshot(id: &str, x: f64, y: f64) -> Snapshot {
        Snapshot {
            id: ObjectId::from(id),
            layer: 0,
            position: Vec2::new(x, y),
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

    #[test]
    fn test_visibility_against_viewport() {
        let viewport = Dimension::new(100.0, 100.0);

        assert!(is_visible(&Rect::new(50.0, 50.0, 10.0, 10.0), viewport));
        assert!(is_visible(&Rect::new(-10.0, 0.0, 10.0, 10.0), viewport), "edge-touching on the left");
        assert!(is_visible(&Rect::new(0.0, 100.0, 10.0, 10.0), viewport), "resting on the floor");
        assert!(!is_visible(&Rect::new(-20.0, 0.0, 10.0, 10.0), viewport));
        assert!(!is_visible(&Rect::new(0.0, 111.0, 10.0, 10.0), viewport));
    }

    #[test]
    fn test_recording_backend_keeps_draw_order() {
        let mut backend = RecordingBackend::new();
        backend.begin_frame(Dimension::new(100.0, 100.0));
        backend.draw(&snapshot("back", 0.0, 0.0));
        backend.draw(&snapshot("front", 0.0, 0.0));
        backend.end_frame();

        assert_eq!(backend.last_frame(), ["back", "front"]);
    }
}
