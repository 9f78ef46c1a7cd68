//! Pointer interaction events
//!
//! The [`EventBus`] is the notification sink the runtime emits into and
//! external code subscribes to. The [`EventDispatcher`] is the pointer
//! state machine that produces those notifications from asynchronous
//! hit-test replies.

mod dispatcher;

pub use dispatcher::{DragSession, EventDispatcher};

use crate::scene::ObjectId;
use std::collections::HashMap;

/// The notification kinds the runtime emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer click resolved onto an object
    Click,
    /// A drag session began on an object
    DragStart,
    /// The pointer moved during a drag session
    DragMove,
    /// The drag session ended
    DragEnd,
}

/// A pointer interaction notification
#[derive(Debug, Clone, PartialEq)]
pub struct SceneEvent {
    /// Notification kind
    pub kind: EventKind,
    /// Pointer X at the time of the interaction
    pub x: f64,
    /// Pointer Y at the time of the interaction
    pub y: f64,
    /// Id of the interacted object
    pub target: ObjectId,
}

/// Handle returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&SceneEvent)>;

/// Subscribe/unsubscribe/emit notification sink
///
/// Only listeners registered for an event's kind are invoked.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_listener: u64,
}

impl EventBus {
    /// Create an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&SceneEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let Some(handlers) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Deliver an event to every listener of its kind
    pub fn emit(&mut self, event: &SceneEvent) {
        if let Some(handlers) = self.listeners.get_mut(&event.kind) {
            for (_, handler) in handlers.iter_mut() {
                handler(event);
            }
        }
    }
}
