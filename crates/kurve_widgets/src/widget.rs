//! Base widget trait and types

use kurve_core::Event;
use slotmap::{new_key_type, Key};

new_key_type! {
    pub struct WidgetId;
}

impl WidgetId {
    /// Value used as [`Event::target`] for events aimed at this widget
    pub fn event_target(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Base trait for all widgets
pub trait Widget {
    /// Get the widget's unique ID
    fn id(&self) -> WidgetId;

    /// Handle an event
    fn handle_event(&self, event: &Event);
}
