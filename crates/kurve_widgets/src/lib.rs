//! Kurve Widget Library
//!
//! Draggable control points and the layer that routes pointer events to them.

pub mod drag_point;
pub mod layer;
pub mod widget;

pub use drag_point::{DragPoint, DragPointConfig};
pub use layer::DragLayer;
pub use widget::{Widget, WidgetId};
