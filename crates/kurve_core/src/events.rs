//! Pointer event dispatch
//!
//! Drag gestures reach draggable widgets as [`Event`]s. Coordinates are relative
//! to the container the widget lives in.

use rustc_hash::FxHashMap;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    /// Drag ended (mouse up after drag)
    pub const DRAG_END: EventType = 7;
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: u64, // Widget ID
    pub data: EventData,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer {
        x: f32,
        y: f32,
        button: u8,
    },
    None,
}

impl Event {
    /// Create an event that carries no data
    pub fn new(event_type: EventType, target: u64) -> Self {
        Self {
            event_type,
            target,
            data: EventData::None,
            propagation_stopped: false,
        }
    }

    /// Create a pointer event for a widget
    pub fn pointer(event_type: EventType, target: u64, x: f32, y: f32) -> Self {
        Self {
            event_type,
            target,
            data: EventData::Pointer { x, y, button: 0 },
            propagation_stopped: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event handler function type
pub type EventHandler = Box<dyn Fn(&Event)>;

/// Dispatches events to registered handlers
pub struct EventDispatcher {
    handlers: FxHashMap<(u64, EventType), Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register an event handler for a widget and event type
    pub fn register<F>(&mut self, widget_id: u64, event_type: EventType, handler: F)
    where
        F: Fn(&Event) + 'static,
    {
        self.handlers
            .entry((widget_id, event_type))
            .or_default()
            .push(Box::new(handler));
    }

    /// Dispatch an event to all registered handlers
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, event: &mut Event) -> usize {
        let mut invoked = 0;
        if let Some(handlers) = self.handlers.get(&(event.target, event.event_type)) {
            for handler in handlers {
                if event.propagation_stopped {
                    break;
                }
                handler(event);
                invoked += 1;
            }
        }
        invoked
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
